use conductor_core::{
    AgentResult, ExecutionContext, Logger, Metadata, Retry, RetryError, StateObserver, StepError,
    StepResult, ToolInvocation, ToolRouter, WorkflowError, WorkflowResult, WorkflowRun,
    WorkflowState, WorkflowStep,
};
use dashmap::DashMap;
use futures::future::join_all;
use serde_json::json;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::runtime::config::CoordinatorConfig;

/// Drives registered steps over per-workflow runs.
///
/// Steps execute strictly in registration order. Each step runs through the
/// retry executor together with the dispatch of its tool invocations, so a
/// failing dispatch retries the whole step.
///
/// `execute_workflow` takes `&self`: runs under distinct workflow ids can
/// proceed concurrently from a shared `Arc<WorkflowCoordinator<_>>`. Runs
/// under the same id overwrite each other and must be serialized by the
/// caller.
pub struct WorkflowCoordinator<S: WorkflowState> {
    steps: Vec<WorkflowStep<S>>,
    runs: DashMap<String, WorkflowRun<S>>,
    logger: Logger,
    router: Arc<dyn ToolRouter>,
    on_state_update: Option<StateObserver<S>>,
    config: CoordinatorConfig,
}

impl<S: WorkflowState> WorkflowCoordinator<S> {
    pub fn new(logger: Logger, router: Arc<dyn ToolRouter>) -> Self {
        Self {
            steps: Vec::new(),
            runs: DashMap::new(),
            logger,
            router,
            on_state_update: None,
            config: CoordinatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Observer called with a run snapshot after every step and at completion.
    pub fn with_state_observer(
        mut self,
        observer: impl Fn(&WorkflowRun<S>) + Send + Sync + 'static,
    ) -> Self {
        self.on_state_update = Some(Arc::new(observer));
        self
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Append steps to the registry in the given order.
    ///
    /// Fails with [`WorkflowError::DuplicateStep`] if any id is already
    /// registered or repeated within `steps`. Nothing from a rejected batch
    /// is registered.
    pub fn register_workflow(
        &mut self,
        steps: impl IntoIterator<Item = WorkflowStep<S>>,
    ) -> WorkflowResult<()> {
        let steps: Vec<_> = steps.into_iter().collect();

        let mut seen: HashSet<&str> = self.steps.iter().map(|s| s.id.as_str()).collect();
        for step in &steps {
            if !seen.insert(step.id.as_str()) {
                return Err(WorkflowError::DuplicateStep(step.id.clone()));
            }
        }

        for step in &steps {
            self.logger.debug(
                "registered workflow step",
                Some(json!({ "step_id": step.id, "agent": step.agent_name })),
            );
        }
        self.steps.extend(steps);
        Ok(())
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Registered steps in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &WorkflowStep<S>> {
        self.steps.iter()
    }

    /// Ids of every run currently in the run table.
    pub fn run_ids(&self) -> Vec<String> {
        self.runs.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Execute every registered step for `workflow_id`.
    ///
    /// A step returning `Error` stops the loop without raising; the run is
    /// still completed and returned. A step that keeps raising past the retry
    /// budget aborts the run with [`WorkflowError::StepFailed`], leaving the
    /// partial, incomplete record in the run table.
    pub async fn execute_workflow(
        &self,
        workflow_id: impl Into<String>,
        initial_state: S,
        metadata: Metadata,
    ) -> WorkflowResult<WorkflowRun<S>> {
        let workflow_id = workflow_id.into();
        let metadata = Arc::new(metadata);
        let mut run = WorkflowRun::new(workflow_id.clone(), initial_state);
        self.runs.insert(workflow_id.clone(), run.clone());

        for step in &self.steps {
            let ctx = ExecutionContext::new(
                workflow_id.as_str(),
                step.id.as_str(),
                step.agent_name.as_str(),
                Arc::clone(&metadata),
            );
            let step_logger = self.logger.with_context(ctx.clone());
            step_logger.info(
                "starting step",
                Some(json!({ "description": step.description })),
            );

            let retry_logger = step_logger.clone();
            let state = run.state.clone();
            let started = Instant::now();

            let outcome = Retry::new(self.config.retry)
                .on_retry(move |attempt, err: &StepError| {
                    retry_logger.warn(
                        "retrying step",
                        Some(json!({ "attempt": attempt, "error": err.to_string() })),
                    );
                })
                .run(|| self.attempt_step(step, &ctx, &state, &step_logger))
                .await;

            let result = match outcome {
                Ok(result) => result,
                Err(err) => {
                    let error = step_failure(&workflow_id, step, err);
                    step_logger.error(
                        "step failed",
                        Some(json!({ "error": error.to_string(), "code": error.error_code() })),
                    );
                    return Err(error);
                }
            };

            let status = result.status;
            if let Some(patch) = result.payload {
                run.apply(patch);
            }
            if !status.is_success() {
                step_logger.warn(
                    "step did not succeed",
                    Some(json!({ "status": status, "error": result.error })),
                );
            }

            run.advance(step.agent_name.as_str());
            self.publish(&run);
            step_logger.info(
                "finished step",
                Some(json!({
                    "status": status,
                    "duration_ms": started.elapsed().as_millis() as u64,
                })),
            );

            if status.halts_pipeline() {
                break;
            }
        }

        run.complete();
        self.publish(&run);
        self.logger.info(
            "workflow completed",
            Some(json!({ "workflow_id": workflow_id, "current_agent": run.current_agent })),
        );

        Ok(run)
    }

    /// Snapshot of a run, or `None` if no run exists under that id.
    pub fn get_workflow_state(&self, workflow_id: &str) -> Option<WorkflowRun<S>> {
        self.runs.get(workflow_id).map(|entry| entry.value().clone())
    }

    /// Remove a run record. Unknown ids are ignored.
    ///
    /// Resetting a run that is still executing drops it for good; later
    /// steps of that run no longer write to the table.
    pub fn reset_workflow(&self, workflow_id: &str) {
        self.runs.remove(workflow_id);
    }

    /// One retried unit: the agent run plus the dispatch of its tool invocations.
    async fn attempt_step(
        &self,
        step: &WorkflowStep<S>,
        ctx: &ExecutionContext,
        state: &S,
        logger: &Logger,
    ) -> StepResult<AgentResult<S::Patch>> {
        let result = step.agent.run(ctx, state).await?;
        self.dispatch_tools(&step.agent_name, &result.tool_invocations, logger)
            .await?;
        Ok(result)
    }

    /// Route all invocations concurrently and wait for every one to settle.
    async fn dispatch_tools(
        &self,
        agent: &str,
        invocations: &[ToolInvocation],
        logger: &Logger,
    ) -> StepResult<()> {
        if invocations.is_empty() {
            return Ok(());
        }

        let dispatches = invocations.iter().map(|invocation| {
            logger.debug(
                "dispatching tool invocation",
                Some(json!({
                    "tool": invocation.tool_name,
                    "retry_count": invocation.retry_count,
                    "invoked_at": invocation.invoked_at,
                })),
            );
            self.router
                .route(agent, &invocation.tool_name, invocation.payload.clone())
        });

        for outcome in join_all(dispatches).await {
            outcome?;
        }
        Ok(())
    }

    /// Refresh the stored record, unless it was reset mid-run, and notify
    /// the observer.
    fn publish(&self, run: &WorkflowRun<S>) {
        if let Some(mut entry) = self.runs.get_mut(&run.workflow_id) {
            *entry = run.clone();
        }
        if let Some(observer) = &self.on_state_update {
            observer(run);
        }
    }
}

fn step_failure<S: WorkflowState>(
    workflow_id: &str,
    step: &WorkflowStep<S>,
    err: RetryError<StepError>,
) -> WorkflowError {
    let attempts = err.attempts();
    match err.into_source() {
        Some(source) => WorkflowError::StepFailed {
            workflow_id: workflow_id.to_string(),
            step_id: step.id.clone(),
            attempts,
            source,
        },
        None => WorkflowError::RetryUnknown {
            workflow_id: workflow_id.to_string(),
            step_id: step.id.clone(),
        },
    }
}

impl<S: WorkflowState> fmt::Debug for WorkflowCoordinator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowCoordinator")
            .field("steps", &self.steps)
            .field("runs", &self.runs.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conductor_core::{Agent, NoopRouter, StateMap};
    use serde_json::Value;

    struct Static {
        name: &'static str,
        key: &'static str,
        value: &'static str,
    }

    #[async_trait]
    impl Agent<StateMap> for Static {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self, _ctx: &ExecutionContext, _state: &StateMap) -> StepResult<AgentResult<StateMap>> {
            Ok(AgentResult::success(StateMap::new().with(self.key, self.value)))
        }
    }

    fn step(id: &'static str, key: &'static str, value: &'static str) -> WorkflowStep<StateMap> {
        WorkflowStep::new(
            id,
            Arc::new(Static {
                name: id,
                key,
                value,
            }),
        )
    }

    fn coordinator() -> WorkflowCoordinator<StateMap> {
        WorkflowCoordinator::new(Logger::null(), Arc::new(NoopRouter))
    }

    #[tokio::test]
    async fn test_research_then_writing() {
        let mut coordinator = coordinator();
        coordinator
            .register_workflow(vec![
                step("research", "summary", "x"),
                step("writing", "draft", "y"),
            ])
            .unwrap();

        let run = coordinator
            .execute_workflow("wf-1", StateMap::new().with("topic", "t"), Metadata::new())
            .await
            .unwrap();

        assert!(run.completed);
        assert_eq!(run.current_agent.as_deref(), Some("writing"));
        assert_eq!(
            run.state.into_value(),
            json!({"topic": "t", "summary": "x", "draft": "y"})
        );
    }

    #[test]
    fn test_duplicate_registration_rejects_whole_batch() {
        let mut coordinator = coordinator();
        coordinator
            .register_workflow(vec![step("research", "a", "1")])
            .unwrap();

        let err = coordinator
            .register_workflow(vec![step("writing", "b", "2"), step("research", "c", "3")])
            .unwrap_err();

        assert!(matches!(err, WorkflowError::DuplicateStep(ref id) if id == "research"));
        assert_eq!(coordinator.step_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_workflow_lookup_and_reset() {
        let coordinator = coordinator();
        assert!(coordinator.get_workflow_state("missing").is_none());
        coordinator.reset_workflow("missing");
        assert!(coordinator.run_ids().is_empty());
    }

    #[tokio::test]
    async fn test_empty_registry_completes_immediately() {
        let coordinator = coordinator();
        let run = coordinator
            .execute_workflow("wf-empty", StateMap::new(), Metadata::new())
            .await
            .unwrap();

        assert!(run.completed);
        assert!(run.current_agent.is_none());
        assert_eq!(run.state.into_value(), Value::Object(Default::default()));
    }
}
