//! Step outcome types.

use serde::{Deserialize, Serialize};

use crate::tool::ToolInvocation;

/// Outcome tag of one step attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// The step did its job.
    Success,
    /// The step hit a recoverable condition. The pipeline continues.
    Pending,
    /// The step failed softly. Remaining steps are skipped.
    Error,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Success => "success",
            AgentStatus::Pending => "pending",
            AgentStatus::Error => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AgentStatus::Success)
    }

    /// Whether the pipeline stops after a step with this status.
    pub fn halts_pipeline(&self) -> bool {
        matches!(self, AgentStatus::Error)
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional measurements reported by an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

impl StepMetrics {
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_tokens_used(mut self, tokens: u64) -> Self {
        self.tokens_used = Some(tokens);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }
}

/// The outcome of one step attempt, generic over the state patch type.
#[derive(Debug, Clone)]
pub struct AgentResult<P> {
    pub status: AgentStatus,
    pub payload: Option<P>,
    pub error: Option<String>,
    pub metrics: Option<StepMetrics>,
    pub tool_invocations: Vec<ToolInvocation>,
}

impl<P> AgentResult<P> {
    fn with_status(status: AgentStatus) -> Self {
        Self {
            status,
            payload: None,
            error: None,
            metrics: None,
            tool_invocations: Vec::new(),
        }
    }

    /// A successful result carrying a patch.
    pub fn success(payload: P) -> Self {
        Self::with_status(AgentStatus::Success).payload(payload)
    }

    /// A successful result with nothing to merge.
    pub fn empty_success() -> Self {
        Self::with_status(AgentStatus::Success)
    }

    /// A recoverable outcome. The message describes what needs attention.
    pub fn pending(message: impl Into<String>) -> Self {
        Self::with_status(AgentStatus::Pending).error_message(message)
    }

    /// A soft failure that stops the pipeline.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::with_status(AgentStatus::Error).error_message(message)
    }

    pub fn payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn metrics(mut self, metrics: StepMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn tool_invocation(mut self, invocation: ToolInvocation) -> Self {
        self.tool_invocations.push(invocation);
        self
    }

    pub fn tool_invocations(mut self, invocations: impl IntoIterator<Item = ToolInvocation>) -> Self {
        self.tool_invocations.extend(invocations);
        self
    }
}
