//! Per-step execution context.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Free-form caller metadata attached to a run.
pub type Metadata = Map<String, Value>;

/// Identifies one step invocation inside one workflow run.
///
/// A context is built once per step. Retries of the same step reuse it.
/// The metadata map is shared read-only by every step of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub workflow_id: String,
    pub step_id: String,
    pub agent: String,
    pub metadata: Arc<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExecutionContext {
    pub fn new(
        workflow_id: impl Into<String>,
        step_id: impl Into<String>,
        agent: impl Into<String>,
        metadata: Arc<Metadata>,
    ) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            step_id: step_id.into(),
            agent: agent.into(),
            metadata,
            notes: None,
        }
    }

    /// Attach free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Look up a metadata value.
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Look up a metadata value that is expected to be a string.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}
