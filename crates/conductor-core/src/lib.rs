//! # Conductor Core
//!
//! Shared contracts for the Conductor workflow engine: the agent capability
//! trait, step results and tool invocations, state accumulators, the retry
//! executor and the context-aware structured logger.
//!
//! The coordinator that drives these lives in the `conductor` crate.

pub mod agent;
pub mod context;
pub mod error;
pub mod logger;
pub mod result;
pub mod retry;
pub mod state;
pub mod tool;
pub mod workflow;

pub use agent::Agent;
pub use context::{ExecutionContext, Metadata};
pub use error::{StepError, StepResult, ToolDispatchError, WorkflowError, WorkflowResult};
pub use logger::{EventSink, LogEvent, LogLevel, Logger, NullSink, TracingSink};
pub use result::{AgentResult, AgentStatus, StepMetrics};
pub use retry::{Retry, RetryError, RetryPolicy, with_retries};
pub use state::{StateMap, WorkflowState};
pub use tool::{FnRouter, NoopRouter, ToolInvocation, ToolRouter, router_fn};
pub use workflow::{StateObserver, WorkflowRun, WorkflowStep};
