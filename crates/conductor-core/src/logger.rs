//! Context-aware structured logging.
//!
//! A [`Logger`] is a thin forwarding handle over an [`EventSink`]. It holds
//! nothing but an optional bound [`ExecutionContext`] and never filters,
//! buffers or writes on its own. Deriving a child with
//! [`Logger::with_context`] leaves the parent untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::context::ExecutionContext;

/// Event name every log entry is emitted under.
pub const LOG_EVENT: &str = "workflow.log";

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(label)
    }
}

/// A single structured log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ExecutionContext>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            data: None,
            timestamp: Utc::now(),
            context: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Destination for log events. Filtering and I/O belong here.
pub trait EventSink: Send + Sync {
    fn emit(&self, event_name: &str, event: &LogEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event_name: &str, _event: &LogEvent) {}
}

/// Sink that forwards events to `tracing` at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event_name: &str, event: &LogEvent) {
        let ctx = event.context.as_ref();
        let workflow_id = ctx.map(|c| c.workflow_id.as_str()).unwrap_or("");
        let step_id = ctx.map(|c| c.step_id.as_str()).unwrap_or("");
        let agent = ctx.map(|c| c.agent.as_str()).unwrap_or("");
        let data = event
            .data
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default();

        match event.level {
            LogLevel::Debug => tracing::debug!(
                event = event_name,
                workflow_id,
                step_id,
                agent,
                data = %data,
                "{}",
                event.message
            ),
            LogLevel::Info => tracing::info!(
                event = event_name,
                workflow_id,
                step_id,
                agent,
                data = %data,
                "{}",
                event.message
            ),
            LogLevel::Warn => tracing::warn!(
                event = event_name,
                workflow_id,
                step_id,
                agent,
                data = %data,
                "{}",
                event.message
            ),
            LogLevel::Error => tracing::error!(
                event = event_name,
                workflow_id,
                step_id,
                agent,
                data = %data,
                "{}",
                event.message
            ),
        }
    }
}

/// Forwarding logger with an optional bound execution context.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn EventSink>,
    context: Option<Arc<ExecutionContext>>,
}

impl Logger {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            context: None,
        }
    }

    /// Logger backed by [`TracingSink`].
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Logger that discards everything.
    pub fn null() -> Self {
        Self::new(Arc::new(NullSink))
    }

    /// Derive a logger that stamps `context` into events lacking one.
    pub fn with_context(&self, context: ExecutionContext) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            context: Some(Arc::new(context)),
        }
    }

    pub fn context(&self) -> Option<&ExecutionContext> {
        self.context.as_deref()
    }

    pub fn log(&self, mut event: LogEvent) {
        if event.context.is_none() {
            event.context = self.context.as_deref().cloned();
        }
        self.sink.emit(LOG_EVENT, &event);
    }

    pub fn debug(&self, message: impl Into<String>, data: Option<Value>) {
        self.log_at(LogLevel::Debug, message, data);
    }

    pub fn info(&self, message: impl Into<String>, data: Option<Value>) {
        self.log_at(LogLevel::Info, message, data);
    }

    pub fn warn(&self, message: impl Into<String>, data: Option<Value>) {
        self.log_at(LogLevel::Warn, message, data);
    }

    pub fn error(&self, message: impl Into<String>, data: Option<Value>) {
        self.log_at(LogLevel::Error, message, data);
    }

    fn log_at(&self, level: LogLevel, message: impl Into<String>, data: Option<Value>) {
        let mut event = LogEvent::new(level, message);
        event.data = data;
        self.log(event);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Install the process-wide logger.
///
/// Returns the logger back if one was already installed.
pub fn init_global(logger: Logger) -> Result<(), Logger> {
    GLOBAL_LOGGER.set(logger)
}

/// The process-wide logger. Falls back to a tracing-backed logger.
pub fn global() -> &'static Logger {
    GLOBAL_LOGGER.get_or_init(Logger::tracing)
}
