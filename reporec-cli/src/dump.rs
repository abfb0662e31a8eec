use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use log::info;
use reporec::{PreferenceProvider, Preferences};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CliError;

/// One document of a grouped dump, e.g. `{"_id": "alice", "repos": ["a/b", "c/d"], "count": 2}`.
#[derive(Deserialize)]
struct DumpRecord {
    #[serde(rename = "_id")]
    id: String,
    #[serde(flatten)]
    fields: serde_json::Map<String, Value>,
}

/// Reads preferences from a JSON array of grouped documents. Each document's
/// `_id` is the entity and the array under `key` holds its items.
pub struct JsonDumpProvider {
    path: PathBuf,
    key: String,
}

impl JsonDumpProvider {
    pub fn new<P: AsRef<Path>>(path: P, key: &str) -> Self {
        JsonDumpProvider {
            path: path.as_ref().to_path_buf(),
            key: key.to_owned(),
        }
    }

    fn read_records(&self) -> Result<Vec<DumpRecord>, CliError> {
        let file = File::open(&self.path).map_err(|source| CliError::Io {
            path: self.path.clone(),
            source: source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Json {
            path: self.path.clone(),
            source: source,
        })
    }

    fn parse(&self, records: Vec<DumpRecord>) -> Result<Preferences, CliError> {
        let mut prefs = Preferences::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let format_error = |reason: String| CliError::Format {
                path: self.path.clone(),
                index: index,
                reason: reason,
            };
            let items = match record.fields.get(&self.key) {
                Some(Value::Array(items)) => items,
                Some(_) => return Err(format_error(format!("`{}` is not an array", self.key))),
                None => return Err(format_error(format!("missing `{}`", self.key))),
            };
            let set = prefs.entry(record.id).or_default();
            for item in items {
                match item.as_str() {
                    Some(item) => {
                        set.insert(item.to_owned());
                    }
                    None => return Err(format_error(format!("non-string item {}", item))),
                }
            }
        }
        Ok(prefs)
    }
}

impl PreferenceProvider for JsonDumpProvider {
    type Error = CliError;

    fn preferences(&self) -> Result<Preferences, CliError> {
        let start = Instant::now();
        let prefs = self.parse(self.read_records()?)?;
        info!("Parsed: {} {} from {} in {:?}", prefs.len(), self.key, self.path.display(), start.elapsed());
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use reporec::PreferenceProvider;
    use super::JsonDumpProvider;
    use crate::error::CliError;

    fn write_dump(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("reporec-{}-{}.json", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_dump() {
        let path = write_dump("ok", r#"[
            {"_id": "alice", "repos": ["serega/gaoya", "rayon-rs/rayon"], "count": 2},
            {"_id": "bob", "repos": ["rayon-rs/rayon"], "count": 1}
        ]"#);
        let prefs = JsonDumpProvider::new(&path, "repos").preferences().unwrap();
        assert_eq!(prefs.len(), 2);
        assert!(prefs["alice"].contains("serega/gaoya"));
        assert_eq!(prefs["bob"].len(), 1);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_key() {
        let path = write_dump("missing-key", r#"[{"_id": "alice", "users": ["bob"]}]"#);
        let err = JsonDumpProvider::new(&path, "repos").preferences().unwrap_err();
        assert!(matches!(err, CliError::Format { index: 0, .. }));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = JsonDumpProvider::new("/nonexistent/userToRepos.json", "repos").preferences().unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
