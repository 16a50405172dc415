use async_trait::async_trait;
use conductor_core::{
    Agent, AgentResult, ExecutionContext, Logger, StepMetrics, StepResult, ToolInvocation, logger,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::services::{SearchService, Summarizer};
use crate::state::{ContentPatch, ContentState, ResearchBrief};

pub const RESEARCH_AGENT: &str = "research";

/// Searches for the topic and summarizes what it finds.
///
/// No results is a recoverable outcome and yields `Pending`. The source URLs
/// are handed to the `store_sources` tool.
pub struct ResearchAgent {
    search: Arc<dyn SearchService>,
    summarizer: Arc<dyn Summarizer>,
    logger: Logger,
}

impl ResearchAgent {
    /// Logs through the process-wide logger until [`with_logger`](Self::with_logger).
    pub fn new(search: Arc<dyn SearchService>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            search,
            summarizer,
            logger: logger::global().clone(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }
}

#[async_trait]
impl Agent<ContentState> for ResearchAgent {
    fn name(&self) -> &str {
        RESEARCH_AGENT
    }

    async fn run(
        &self,
        ctx: &ExecutionContext,
        state: &ContentState,
    ) -> StepResult<AgentResult<ContentPatch>> {
        let started = Instant::now();

        if state.topic.trim().is_empty() {
            return Ok(AgentResult::failure("no topic to research"));
        }

        let hits = self.search.search(&state.topic).await?;
        self.logger.with_context(ctx.clone()).debug(
            "research search finished",
            Some(json!({ "hits": hits.len() })),
        );

        if hits.is_empty() {
            return Ok(AgentResult::pending(format!(
                "no sources found for '{}'",
                state.topic
            )));
        }

        let summary = self.summarizer.summarize(&state.topic, &hits).await?;
        let urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
        let store_sources = ToolInvocation::new(
            "store_sources",
            json!({ "workflow_id": ctx.workflow_id, "topic": state.topic, "urls": urls }),
        );

        Ok(AgentResult::success(ContentPatch::research(ResearchBrief {
            summary,
            sources: hits,
        }))
        .tool_invocation(store_sources)
        .metrics(StepMetrics::default().with_duration_ms(started.elapsed().as_millis() as u64)))
    }
}
