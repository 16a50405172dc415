//! The capability contract every worker implements.

use async_trait::async_trait;

use crate::context::ExecutionContext;
use crate::error::StepResult;
use crate::result::AgentResult;
use crate::state::WorkflowState;

/// A worker that a workflow step delegates to.
///
/// `run` must not return `Err` for ordinary recoverable conditions. Those
/// are reported as [`AgentStatus::Pending`](crate::AgentStatus::Pending)
/// with a diagnostic payload. `Err` is for exceptional, retry-worthy
/// failures such as network errors.
///
/// A step may be retried, so `run` must be safe to call more than once with
/// the same context and state. The engine does not deduplicate side effects.
#[async_trait]
pub trait Agent<S: WorkflowState>: Send + Sync {
    /// Stable name identifying this agent.
    fn name(&self) -> &str;

    /// Execute one step attempt against a snapshot of the run state.
    async fn run(&self, ctx: &ExecutionContext, state: &S) -> StepResult<AgentResult<S::Patch>>;

    /// Prepare resources before the first run. Never called by the coordinator.
    async fn warmup(&self) -> StepResult<()> {
        Ok(())
    }

    /// Release resources. Never called by the coordinator.
    async fn shutdown(&self) -> StepResult<()> {
        Ok(())
    }
}
