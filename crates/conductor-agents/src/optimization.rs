use async_trait::async_trait;
use conductor_core::{
    Agent, AgentResult, ExecutionContext, StepMetrics, StepResult, ToolInvocation,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::services::SeoAnalyzer;
use crate::state::{ContentPatch, ContentState};

pub const OPTIMIZATION_AGENT: &str = "optimization";

/// Runs SEO analysis on the most refined text and publishes the metadata
/// through the `update_seo_metadata` tool.
pub struct OptimizationAgent {
    seo: Arc<dyn SeoAnalyzer>,
}

impl OptimizationAgent {
    pub fn new(seo: Arc<dyn SeoAnalyzer>) -> Self {
        Self { seo }
    }
}

#[async_trait]
impl Agent<ContentState> for OptimizationAgent {
    fn name(&self) -> &str {
        OPTIMIZATION_AGENT
    }

    async fn run(
        &self,
        ctx: &ExecutionContext,
        state: &ContentState,
    ) -> StepResult<AgentResult<ContentPatch>> {
        let started = Instant::now();

        let Some(text) = state.latest_text() else {
            return Ok(AgentResult::failure("nothing to optimize: no draft"));
        };

        let report = self.seo.analyze(text, &state.topic).await?;
        let update = ToolInvocation::new(
            "update_seo_metadata",
            json!({
                "workflow_id": ctx.workflow_id,
                "score": report.score,
                "keywords": report.keywords,
                "meta_description": report.meta_description,
            }),
        );

        Ok(AgentResult::success(ContentPatch::seo(report))
            .tool_invocation(update)
            .metrics(StepMetrics::default().with_duration_ms(started.elapsed().as_millis() as u64)))
    }
}
