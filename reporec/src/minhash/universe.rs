use ahash::AHashMap;
use itertools::Itertools;

use crate::error::{RecError, Result};
use crate::preferences::Preferences;

/// Dense index of every item that can appear in an entity's set.
///
/// Each distinct item gets the next free index in the order it is first seen,
/// so indices are dense (`0..len`) and unique. The index is only meaningful for
/// the run that built it.
#[derive(Debug, Clone, Default)]
pub struct ItemUniverse {
    index: AHashMap<String, usize>,
    items: Vec<String>,
}

impl ItemUniverse {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut universe = ItemUniverse::default();
        for item in items {
            let item = item.as_ref();
            if !universe.index.contains_key(item) {
                universe.index.insert(item.to_owned(), universe.items.len());
                universe.items.push(item.to_owned());
            }
        }
        universe
    }

    /// Builds the universe from every item held by any entity.
    /// Items are sorted first, so the same preferences always give the same indices.
    pub fn from_preferences(prefs: &Preferences) -> Self {
        let items = prefs.values()
            .flat_map(|items| items.iter())
            .sorted()
            .dedup();
        ItemUniverse::new(items)
    }

    #[inline]
    pub fn index_of(&self, item: &str) -> Option<usize> {
        self.index.get(item).copied()
    }

    pub fn item(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(|item| item.as_str())
    }

    /// Maps the items of `entity` to their indices.
    pub fn indices_of<'a, I>(&self, entity: &str, items: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = &'a String>,
    {
        items.into_iter()
            .map(|item| {
                self.index_of(item).ok_or_else(|| RecError::UnknownItem {
                    entity: entity.to_owned(),
                    item: item.clone(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ItemUniverse;
    use crate::error::RecError;
    use crate::preferences::preferences_from;

    #[test]
    fn test_indices_are_dense_and_unique() {
        let universe = ItemUniverse::new(["r1", "r2", "r1", "r3", "r2"]);
        assert_eq!(universe.len(), 3);
        assert_eq!(universe.index_of("r1"), Some(0));
        assert_eq!(universe.index_of("r2"), Some(1));
        assert_eq!(universe.index_of("r3"), Some(2));
        assert_eq!(universe.index_of("r4"), None);
        assert_eq!(universe.item(2), Some("r3"));
        assert_eq!(universe.iter().collect::<Vec<_>>(), vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_from_preferences_is_sorted() {
        let prefs = preferences_from(vec![
            ("alice", vec!["c", "a"]),
            ("bob", vec!["b", "a"]),
        ]);
        let universe = ItemUniverse::from_preferences(&prefs);
        assert_eq!(universe.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_item() {
        let universe = ItemUniverse::new(["a", "b"]);
        let items = vec!["a".to_owned(), "z".to_owned()];
        let err = universe.indices_of("alice", items.iter()).unwrap_err();
        assert_eq!(err, RecError::UnknownItem { entity: "alice".to_owned(), item: "z".to_owned() });

        let items = vec!["b".to_owned(), "a".to_owned()];
        assert_eq!(universe.indices_of("alice", items.iter()).unwrap(), vec![1, 0]);
    }
}
