//! Error types shared by the workflow engine.
//!
//! Three failure classes exist and each has its own type:
//!
//! - [`WorkflowError::DuplicateStep`] is a configuration error raised at
//!   registration time.
//! - A step returning [`AgentStatus::Error`](crate::AgentStatus::Error) is a
//!   soft failure. It is not an error value at all; it only stops the run.
//! - [`StepError`] is what an agent (or a tool dispatch) raises. The retry
//!   executor absorbs it up to the attempt cap, after which the coordinator
//!   surfaces it as [`WorkflowError::StepFailed`].

use thiserror::Error;

/// Errors raised by an agent while running a step.
///
/// Raising is reserved for exceptional, retry-worthy conditions. Recoverable
/// conditions should be reported through a `Pending` result instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    /// A call to an external service failed at the transport level.
    #[error("Network error: {0}")]
    Network(String),

    /// An external call did not complete in time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// An external service answered with an error.
    #[error("Service error: {0}")]
    Service(String),

    /// A tool invocation could not be routed.
    #[error("Tool dispatch failed for '{tool}': {message}")]
    ToolDispatch { tool: String, message: String },

    /// The agent received state it cannot work with.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StepError {
    /// Check if this error is transient in nature.
    ///
    /// The coordinator retries every raised error regardless; this is a hint
    /// for hosts and agents that want to decide on their own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StepError::Network(_)
                | StepError::Timeout(_)
                | StepError::Service(_)
                | StepError::ToolDispatch { .. }
        )
    }

    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            StepError::Network(_) => "NETWORK_ERROR",
            StepError::Timeout(_) => "TIMEOUT",
            StepError::Service(_) => "SERVICE_ERROR",
            StepError::ToolDispatch { .. } => "TOOL_DISPATCH_ERROR",
            StepError::InvalidInput(_) => "INVALID_INPUT",
            StepError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ToolDispatchError> for StepError {
    fn from(err: ToolDispatchError) -> Self {
        StepError::ToolDispatch {
            tool: err.tool,
            message: err.message,
        }
    }
}

impl From<serde_json::Error> for StepError {
    fn from(err: serde_json::Error) -> Self {
        StepError::Internal(format!("Serialization error: {}", err))
    }
}

/// Failure reported by a [`ToolRouter`](crate::ToolRouter).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Tool '{tool}' failed: {message}")]
pub struct ToolDispatchError {
    pub tool: String,
    pub message: String,
}

impl ToolDispatchError {
    pub fn new(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the workflow coordinator.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Two steps were registered under the same id.
    #[error("Duplicate workflow step id: {0}")]
    DuplicateStep(String),

    /// A step kept raising until the retry budget ran out.
    #[error("Step '{step_id}' of workflow '{workflow_id}' failed after {attempts} attempts: {source}")]
    StepFailed {
        workflow_id: String,
        step_id: String,
        attempts: u32,
        #[source]
        source: StepError,
    },

    /// The retry executor finished without ever capturing an error.
    #[error("Unknown retry error in step '{step_id}' of workflow '{workflow_id}'")]
    RetryUnknown {
        workflow_id: String,
        step_id: String,
    },
}

impl WorkflowError {
    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            WorkflowError::DuplicateStep(_) => "DUPLICATE_STEP",
            WorkflowError::StepFailed { .. } => "STEP_FAILED",
            WorkflowError::RetryUnknown { .. } => "RETRY_UNKNOWN",
        }
    }
}

/// Result type for agent step execution.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for coordinator operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StepError::Network("connection reset".to_string());
        assert_eq!(err.to_string(), "Network error: connection reset");

        let err = WorkflowError::DuplicateStep("research".to_string());
        assert_eq!(err.to_string(), "Duplicate workflow step id: research");
    }

    #[test]
    fn test_is_retryable() {
        assert!(StepError::Network("failed".to_string()).is_retryable());
        assert!(StepError::Timeout("slow".to_string()).is_retryable());
        assert!(!StepError::InvalidInput("missing draft".to_string()).is_retryable());
    }

    #[test]
    fn test_tool_dispatch_conversion() {
        let err: StepError = ToolDispatchError::new("publish", "queue full").into();
        assert_eq!(err.error_code(), "TOOL_DISPATCH_ERROR");
        assert_eq!(
            err.to_string(),
            "Tool dispatch failed for 'publish': queue full"
        );
    }

    #[test]
    fn test_step_failed_keeps_source() {
        use std::error::Error as _;

        let err = WorkflowError::StepFailed {
            workflow_id: "wf-1".to_string(),
            step_id: "research".to_string(),
            attempts: 3,
            source: StepError::Timeout("search".to_string()),
        };
        assert_eq!(err.error_code(), "STEP_FAILED");
        assert!(err.source().is_some());
    }
}
