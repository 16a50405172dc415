//! # Runtime Module
//!
//! The execution runtime for Conductor workflows. The [`WorkflowCoordinator`]
//! holds the step registry and the run table, and drives each run through
//! its steps with retries, state merging and tool dispatch.
//!
//! ## Usage Pattern
//!
//! ```rust,ignore
//! use conductor::{Logger, Metadata, NoopRouter, StateMap, WorkflowCoordinator, WorkflowStep};
//! use std::sync::Arc;
//!
//! let mut coordinator = WorkflowCoordinator::new(Logger::tracing(), Arc::new(NoopRouter));
//! coordinator.register_workflow(vec![
//!     WorkflowStep::new("research", research_agent),
//!     WorkflowStep::new("writing", writing_agent),
//! ])?;
//!
//! let run = coordinator
//!     .execute_workflow("wf-1", StateMap::new().with("topic", "rust"), Metadata::new())
//!     .await?;
//! assert!(run.completed);
//! ```

pub mod config;
/// Central coordinator for step execution, retries and tool dispatch.
pub mod coordinator;

pub use config::{ConfigError, CoordinatorConfig, CoordinatorConfigBuilder};
pub use coordinator::WorkflowCoordinator;
