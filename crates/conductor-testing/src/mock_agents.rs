//! # Mock Agents for Testing
//!
//! Agents whose outcomes are scripted up front, so coordinator behaviour can
//! be exercised without real services.

use async_trait::async_trait;
use conductor_core::{
    Agent, AgentResult, ExecutionContext, StepError, StepResult, ToolInvocation, WorkflowState,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared record of agent names in the order they ran.
pub type VisitLog = Arc<Mutex<Vec<String>>>;

pub fn visit_log() -> VisitLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply<P> {
    Return(AgentResult<P>),
    Raise(StepError),
}

/// An agent that replays a script of replies, then a fallback forever.
///
/// The default fallback is an empty success.
pub struct ScriptedAgent<S: WorkflowState> {
    name: String,
    script: Mutex<VecDeque<Reply<S::Patch>>>,
    fallback: Reply<S::Patch>,
    calls: AtomicUsize,
    seen_states: Mutex<Vec<S>>,
    contexts: Mutex<Vec<ExecutionContext>>,
    visits: Option<VisitLog>,
}

impl<S: WorkflowState> ScriptedAgent<S>
where
    S::Patch: Clone,
{
    /// Create a new scripted agent with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            fallback: Reply::Return(AgentResult::empty_success()),
            calls: AtomicUsize::new(0),
            seen_states: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
            visits: None,
        }
    }

    /// Queue an arbitrary result
    pub fn then_return(self, result: AgentResult<S::Patch>) -> Self {
        self.push(Reply::Return(result))
    }

    /// Queue a success carrying `patch`
    pub fn then_succeed(self, patch: S::Patch) -> Self {
        self.then_return(AgentResult::success(patch))
    }

    /// Queue a pending result carrying `patch`
    pub fn then_pending(self, message: impl Into<String>, patch: S::Patch) -> Self {
        self.then_return(AgentResult::pending(message).payload(patch))
    }

    /// Queue a soft failure
    pub fn then_soft_fail(self, message: impl Into<String>) -> Self {
        self.then_return(AgentResult::failure(message))
    }

    /// Queue a raised error
    pub fn then_raise(self, error: StepError) -> Self {
        self.push(Reply::Raise(error))
    }

    /// Queue `times` raised errors
    pub fn then_raise_times(mut self, times: usize, error: StepError) -> Self {
        for _ in 0..times {
            self = self.then_raise(error.clone());
        }
        self
    }

    /// Reply used once the script is exhausted
    pub fn always(mut self, result: AgentResult<S::Patch>) -> Self {
        self.fallback = Reply::Return(result);
        self
    }

    /// Raise `error` on every call once the script is exhausted
    pub fn always_raise(mut self, error: StepError) -> Self {
        self.fallback = Reply::Raise(error);
        self
    }

    /// Record every run into `log`
    pub fn with_visit_log(mut self, log: VisitLog) -> Self {
        self.visits = Some(log);
        self
    }

    /// Number of times `run` was called, retries included
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// State snapshots this agent was called with
    pub fn seen_states(&self) -> Vec<S> {
        self.seen_states.lock().unwrap().clone()
    }

    /// Contexts this agent was called with
    pub fn contexts(&self) -> Vec<ExecutionContext> {
        self.contexts.lock().unwrap().clone()
    }

    fn push(self, reply: Reply<S::Patch>) -> Self {
        self.script.lock().unwrap().push_back(reply);
        self
    }
}

#[async_trait]
impl<S: WorkflowState> Agent<S> for ScriptedAgent<S>
where
    S::Patch: Clone + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: &ExecutionContext, state: &S) -> StepResult<AgentResult<S::Patch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_states.lock().unwrap().push(state.clone());
        self.contexts.lock().unwrap().push(ctx.clone());
        if let Some(visits) = &self.visits {
            visits.lock().unwrap().push(self.name.clone());
        }

        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            Reply::Return(result) => Ok(result),
            Reply::Raise(error) => Err(error),
        }
    }
}

/// An agent that emits a fixed set of tool invocations with an empty success.
pub struct ToolEmittingAgent {
    name: String,
    tools: Vec<(String, serde_json::Value)>,
    calls: AtomicUsize,
}

impl ToolEmittingAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>, payload: serde_json::Value) -> Self {
        self.tools.push((tool.into(), payload));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: WorkflowState> Agent<S> for ToolEmittingAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, _ctx: &ExecutionContext, _state: &S) -> StepResult<AgentResult<S::Patch>> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) as u32;
        Ok(AgentResult::empty_success().tool_invocations(
            self.tools
                .iter()
                .map(|(tool, payload)| {
                    ToolInvocation::new(tool.clone(), payload.clone()).with_retry_count(attempt)
                }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_core::{AgentStatus, StateMap};

    fn ctx() -> ExecutionContext {
        ExecutionContext::new("wf", "step", "agent", Arc::default())
    }

    #[tokio::test]
    async fn test_script_then_fallback() {
        let agent: ScriptedAgent<StateMap> = ScriptedAgent::new("a")
            .then_raise(StepError::Network("down".to_string()))
            .then_succeed(StateMap::new().with("k", "v"))
            .always(AgentResult::pending("later"));

        assert!(agent.run(&ctx(), &StateMap::new()).await.is_err());
        let second = agent.run(&ctx(), &StateMap::new()).await.unwrap();
        assert_eq!(second.payload.unwrap().get("k"), Some(&serde_json::json!("v")));
        let third = agent.run(&ctx(), &StateMap::new()).await.unwrap();
        assert_eq!(third.status, AgentStatus::Pending);
        assert_eq!(agent.call_count(), 3);
    }

    #[test]
    fn test_visit_log_records_runs() {
        let log = visit_log();
        let agent: ScriptedAgent<StateMap> = ScriptedAgent::new("writer").with_visit_log(log.clone());

        tokio_test::block_on(agent.run(&ctx(), &StateMap::new())).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["writer".to_string()]);
        assert_eq!(agent.contexts()[0].workflow_id, "wf");
    }
}
