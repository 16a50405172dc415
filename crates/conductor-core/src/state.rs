//! Workflow state accumulators.
//!
//! A run accumulates state by folding each step's patch into the current
//! value. The merge rule is the same for every implementation: fields present
//! in the patch overwrite, fields absent from it persist. Nothing a previous
//! step wrote can be removed by a later one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// State accumulated across the steps of one run.
pub trait WorkflowState: Clone + Send + Sync + 'static {
    /// Partial update produced by a single step.
    type Patch: Send + 'static;

    /// Fold a patch into the state. Later patches win on conflicting fields.
    fn merge(&mut self, patch: Self::Patch);
}

/// An open key/value state bag backed by a JSON object.
///
/// Merging is a shallow, top-level key overwrite. Nested objects are
/// replaced as a whole, never merged recursively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateMap(Map<String, Value>);

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Build a state map from a JSON value.
    ///
    /// Returns `None` unless the value is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }
}

impl WorkflowState for StateMap {
    type Patch = StateMap;

    fn merge(&mut self, patch: StateMap) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }
}

impl From<Map<String, Value>> for StateMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<StateMap> for Value {
    fn from(state: StateMap) -> Self {
        state.into_value()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StateMap {
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
    fn test_merge_overwrites_and_keeps() {
        let mut state = StateMap::new().with("topic", "rust").with("draft", "v1");
        state.merge(StateMap::new().with("draft", "v2").with("seo", 87));

        assert_eq!(
            state.into_value(),
            json!({"topic": "rust", "draft": "v2", "seo": 87})
        );
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut state = StateMap::new().with("research", json!({"summary": "a", "sources": 3}));
        state.merge(StateMap::new().with("research", json!({"summary": "b"})));

        assert_eq!(state.get("research"), Some(&json!({"summary": "b"})));
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut state = StateMap::new().with("topic", "rust");
        state.merge(StateMap::new());
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_from_value_requires_object() {
        assert!(StateMap::from_value(json!({"a": 1})).is_some());
        assert!(StateMap::from_value(json!([1, 2])).is_none());
    }
}
