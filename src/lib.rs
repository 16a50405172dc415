//! # Conductor
//!
//! An in-process agent workflow engine. A [`WorkflowCoordinator`] runs an
//! ordered list of steps, each bound to one [`Agent`], folds every step's
//! patch into a per-run state, retries raised step failures with linear
//! backoff, and routes the tool invocations steps emit to a host-supplied
//! [`ToolRouter`].
//!
//! The shared contracts live in `conductor-core` and are re-exported here.

pub mod runtime;

pub use conductor_core::{
    Agent, AgentResult, AgentStatus, EventSink, ExecutionContext, LogEvent, LogLevel, Logger,
    Metadata, NoopRouter, NullSink, Retry, RetryError, RetryPolicy, StateMap, StateObserver,
    StepError, StepMetrics, StepResult, ToolDispatchError, ToolInvocation, ToolRouter,
    TracingSink, WorkflowError, WorkflowResult, WorkflowRun, WorkflowState, WorkflowStep,
    logger, router_fn, with_retries,
};
pub use runtime::{ConfigError, CoordinatorConfig, CoordinatorConfigBuilder, WorkflowCoordinator};
