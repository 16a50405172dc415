//! Recording implementations of the coordinator's outbound interfaces.

use async_trait::async_trait;
use conductor_core::{
    EventSink, LogEvent, LogLevel, Logger, ToolDispatchError, ToolRouter, WorkflowRun,
    WorkflowState,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Sink that keeps every emitted event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, LogEvent)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A logger writing into `sink`.
    pub fn logger(sink: &Arc<Self>) -> Logger {
        Logger::new(sink.clone())
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn at_level(&self, level: LogLevel) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.at_level(level).len()
    }

    /// Events whose message equals `message`.
    pub fn with_message(&self, message: &str) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event_name: &str, event: &LogEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event_name.to_string(), event.clone()));
    }
}

/// One routed tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedCall {
    pub agent: String,
    pub tool: String,
    pub payload: Value,
}

/// Router that records calls and can fail or delay on demand.
#[derive(Debug, Default)]
pub struct RecordingRouter {
    calls: Mutex<Vec<RoutedCall>>,
    fail_first: AtomicUsize,
    failing_tools: Mutex<Vec<String>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `n` calls, whatever the tool.
    pub fn failing_first(self, n: usize) -> Self {
        self.fail_first.store(n, Ordering::SeqCst);
        self
    }

    /// Always fail calls to `tool`.
    pub fn failing_tool(self, tool: impl Into<String>) -> Self {
        self.failing_tools.lock().unwrap().push(tool.into());
        self
    }

    /// Sleep for `delay` inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RoutedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of calls that were in progress at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolRouter for RecordingRouter {
    async fn route(
        &self,
        agent: &str,
        tool: &str,
        payload: Value,
    ) -> Result<Value, ToolDispatchError> {
        self.calls.lock().unwrap().push(RoutedCall {
            agent: agent.to_string(),
            tool: tool.to_string(),
            payload: payload.clone(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let fail_now = self
            .fail_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail_now {
            return Err(ToolDispatchError::new(tool, "scripted failure"));
        }
        if self.failing_tools.lock().unwrap().iter().any(|t| t == tool) {
            return Err(ToolDispatchError::new(tool, "tool unavailable"));
        }

        Ok(payload)
    }
}

/// Collects the snapshots passed to a coordinator's state observer.
pub struct StateRecorder<S> {
    snapshots: Arc<Mutex<Vec<WorkflowRun<S>>>>,
}

impl<S: WorkflowState> StateRecorder<S> {
    pub fn new() -> Self {
        Self {
            snapshots: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Closure suitable for `WorkflowCoordinator::with_state_observer`.
    pub fn observer(&self) -> impl Fn(&WorkflowRun<S>) + Send + Sync + 'static {
        let snapshots = Arc::clone(&self.snapshots);
        move |run: &WorkflowRun<S>| snapshots.lock().unwrap().push(run.clone())
    }

    pub fn snapshots(&self) -> Vec<WorkflowRun<S>> {
        self.snapshots.lock().unwrap().clone()
    }
}

impl<S: WorkflowState> Default for StateRecorder<S> {
    fn default() -> Self {
        Self::new()
    }
}
