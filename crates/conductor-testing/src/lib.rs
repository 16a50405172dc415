//! # Conductor Testing
//!
//! Test doubles for exercising the workflow coordinator:
//!
//! - [`ScriptedAgent`]: replays scripted results and raised errors
//! - [`ToolEmittingAgent`]: succeeds while emitting tool invocations
//! - [`RecordingSink`]: captures log events
//! - [`RecordingRouter`]: captures tool dispatches, can fail or delay them
//! - [`StateRecorder`]: captures state observer snapshots

pub mod mock_agents;
pub mod recorders;

pub use mock_agents::{Reply, ScriptedAgent, ToolEmittingAgent, VisitLog, visit_log};
pub use recorders::{RecordingRouter, RecordingSink, RoutedCall, StateRecorder};
