//! Free-form sandbox mappings.
//!
//! Sandboxes hold unconstrained JSON-compatible data: annotator details,
//! external identifier schemes, tool-specific scratch fields. Validation
//! only inspects sandbox content where a namespace explicitly declares
//! annotator metadata fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered free-form mapping of string keys to JSON values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sandbox(pub BTreeMap<String, Value>);

impl Sandbox {
    /// Creates an empty sandbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key, replacing any existing value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks up a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Merges another sandbox into this one; the other side wins on
    /// conflicting keys.
    pub fn update(&mut self, other: &Sandbox) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the sandbox holds nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Sandbox {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_get() {
        let mut sandbox = Sandbox::new();
        sandbox.insert("instrument", "guitar");
        sandbox.insert("years", 7);

        assert_eq!(sandbox.get("instrument"), Some(&json!("guitar")));
        assert_eq!(sandbox.get("years"), Some(&json!(7)));
        assert_eq!(sandbox.get("missing"), None);
        assert_eq!(sandbox.len(), 2);
    }

    #[test]
    fn test_update_merges_with_other_side_winning() {
        let mut base: Sandbox = [("a", 1), ("b", 2)].into_iter().collect();
        let other: Sandbox = [("b", 20), ("c", 30)].into_iter().collect();

        base.update(&other);

        assert_eq!(base.get("a"), Some(&json!(1)));
        assert_eq!(base.get("b"), Some(&json!(20)));
        assert_eq!(base.get("c"), Some(&json!(30)));
    }

    #[test]
    fn test_serde_transparency() {
        let sandbox: Sandbox = [("musicbrainz", "1f9a")].into_iter().collect();
        let json = serde_json::to_string(&sandbox).unwrap();

        assert_eq!(json, r#"{"musicbrainz":"1f9a"}"#);
        let restored: Sandbox = serde_json::from_str(&json).unwrap();
        assert_eq!(sandbox, restored);
    }
}
