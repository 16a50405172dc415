//! Step registrations and run records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::agent::Agent;
use crate::state::WorkflowState;

/// Static registration of one pipeline step.
pub struct WorkflowStep<S: WorkflowState> {
    pub id: String,
    /// Name of the agent this step is bound to.
    pub agent_name: String,
    pub description: String,
    pub agent: Arc<dyn Agent<S>>,
}

impl<S: WorkflowState> WorkflowStep<S> {
    /// Bind a step to an agent, taking the agent name from the agent itself.
    pub fn new(id: impl Into<String>, agent: Arc<dyn Agent<S>>) -> Self {
        let agent_name = agent.name().to_string();
        Self {
            id: id.into(),
            description: agent_name.clone(),
            agent_name,
            agent,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Override the agent name recorded for this step.
    pub fn with_agent_name(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = agent_name.into();
        self
    }
}

impl<S: WorkflowState> Clone for WorkflowStep<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            agent_name: self.agent_name.clone(),
            description: self.description.clone(),
            agent: Arc::clone(&self.agent),
        }
    }
}

impl<S: WorkflowState> fmt::Debug for WorkflowStep<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowStep")
            .field("id", &self.id)
            .field("agent_name", &self.agent_name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// One execution of the registered step sequence.
///
/// Callers only ever see clones of the coordinator's record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowRun<S> {
    pub workflow_id: String,
    pub state: S,
    /// Agent of the step that most recently finished.
    pub current_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed: bool,
}

impl<S: WorkflowState> WorkflowRun<S> {
    pub fn new(workflow_id: impl Into<String>, initial_state: S) -> Self {
        let now = Utc::now();
        Self {
            workflow_id: workflow_id.into(),
            state: initial_state,
            current_agent: None,
            created_at: now,
            updated_at: now,
            completed: false,
        }
    }

    /// Fold a step patch into the accumulated state.
    pub fn apply(&mut self, patch: S::Patch) {
        self.state.merge(patch);
    }

    /// Record that `agent` finished a step.
    pub fn advance(&mut self, agent: impl Into<String>) {
        self.current_agent = Some(agent.into());
        self.touch();
    }

    /// Mark the run completed and bump `updated_at`.
    pub fn complete(&mut self) {
        self.completed = true;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Observer invoked with a run snapshot after each step and at completion.
pub type StateObserver<S> = Arc<dyn Fn(&WorkflowRun<S>) + Send + Sync>;
