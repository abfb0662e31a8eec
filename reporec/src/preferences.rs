use ahash::{AHashMap, AHashSet};

use crate::error::{RecError, Result};

/// Entity identifier to the set of item identifiers it holds,
/// e.g. a user to the repositories they starred.
pub type Preferences = AHashMap<String, AHashSet<String>>;

/// Source of the preference mapping. Where the mapping comes from
/// (a database aggregation, a JSON dump, a flat file) is up to the implementor.
pub trait PreferenceProvider {
    type Error: From<RecError>;

    fn preferences(&self) -> std::result::Result<Preferences, Self::Error>;
}

impl PreferenceProvider for Preferences {
    type Error = RecError;

    fn preferences(&self) -> Result<Preferences> {
        Ok(self.clone())
    }
}

/// Builds a preference mapping from `(entity, items)` pairs.
/// Repeated entities are merged.
///
/// ```
/// use reporec::preferences_from;
///
/// let prefs = preferences_from(vec![("alice", vec!["r1", "r2"]), ("alice", vec!["r3"])]);
/// assert_eq!(prefs["alice"].len(), 3);
/// ```
pub fn preferences_from<I, E, J, T>(entries: I) -> Preferences
where
    I: IntoIterator<Item = (E, J)>,
    E: Into<String>,
    J: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut prefs = Preferences::new();
    for (entity, items) in entries {
        prefs.entry(entity.into())
            .or_insert_with(AHashSet::new)
            .extend(items.into_iter().map(|item| item.into()));
    }
    prefs
}

/// Swaps entities and items: every item maps to the entities that hold it.
/// Turns user -> repositories into repository -> users.
pub fn invert_preferences(prefs: &Preferences) -> Preferences {
    let mut result = Preferences::new();
    for (entity, items) in prefs.iter() {
        for item in items {
            result.entry(item.clone())
                .or_insert_with(AHashSet::new)
                .insert(entity.clone());
        }
    }
    result
}

/// Keeps only the entities holding more than `min_items` items.
pub fn filter_min_size(prefs: &Preferences, min_items: usize) -> Preferences {
    prefs.iter()
        .filter(|(_, items)| items.len() > min_items)
        .map(|(entity, items)| (entity.clone(), items.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_min_size, invert_preferences, preferences_from, PreferenceProvider};

    #[test]
    fn test_invert() {
        let user_repos = preferences_from(vec![
            ("alice", vec!["r1", "r2"]),
            ("bob", vec!["r2", "r3"]),
        ]);
        let repo_users = invert_preferences(&user_repos);
        assert_eq!(repo_users.len(), 3);
        assert!(repo_users["r1"].contains("alice"));
        assert_eq!(repo_users["r2"].len(), 2);
        assert!(repo_users["r3"].contains("bob"));

        // inverting twice gives the original mapping back
        assert_eq!(invert_preferences(&repo_users), user_repos);
    }

    #[test]
    fn test_filter_min_size() {
        let prefs = preferences_from(vec![
            ("alice", vec!["r1", "r2", "r3"]),
            ("bob", vec!["r2"]),
            ("carol", vec!["r1", "r2"]),
        ]);
        let filtered = filter_min_size(&prefs, 1);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.contains_key("alice"));
        assert!(filtered.contains_key("carol"));
        assert!(!filtered.contains_key("bob"));
        assert_eq!(filter_min_size(&prefs, 3).len(), 0);
    }

    #[test]
    fn test_in_memory_provider() {
        let prefs = preferences_from(vec![("alice", vec!["r1"])]);
        assert_eq!(prefs.preferences().unwrap(), prefs);
    }
}
