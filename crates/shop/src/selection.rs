use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The user's checkbox state at purchase time, keyed by item name.
///
/// A name with no entry counts as unselected, as does a `false` entry. Keys
/// that name no catalog item (e.g. left over from an older render) are ignored
/// by the purchase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<String, bool>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: mark `name` as selected.
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.set(name, true);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, selected: bool) {
        self.0.insert(name.into(), selected);
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for Selection {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<BTreeMap<String, bool>> for Selection {
    fn from(value: BTreeMap<String, bool>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_false_keys_are_unselected() {
        let selection: Selection = [("A", true), ("B", false)].into_iter().collect();
        assert!(selection.is_selected("A"));
        assert!(!selection.is_selected("B"));
        assert!(!selection.is_selected("C"));
    }

    #[test]
    fn deserializes_from_plain_object() {
        let selection: Selection =
            serde_json::from_str(r#"{"Space Cat": true, "Blue Dragon": false}"#).unwrap();

        let mut expected = Selection::new().with("Space Cat");
        expected.set("Blue Dragon", false);
        assert_eq!(selection, expected);
    }
}
