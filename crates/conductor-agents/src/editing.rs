use async_trait::async_trait;
use conductor_core::{
    Agent, AgentResult, ExecutionContext, Logger, StepMetrics, StepResult, logger,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::services::{FactChecker, ToneEnforcer};
use crate::state::{ContentPatch, ContentState, EditorialReview};

pub const EDITING_AGENT: &str = "editing";

/// Enforces tone on the draft, then fact-checks it against the research
/// sources. A failed fact check is `Pending`; the review (with the
/// unsupported claims) is still merged so later steps and humans can see it.
pub struct EditingAgent {
    tone: Arc<dyn ToneEnforcer>,
    fact_checker: Arc<dyn FactChecker>,
    logger: Logger,
}

impl EditingAgent {
    pub fn new(tone: Arc<dyn ToneEnforcer>, fact_checker: Arc<dyn FactChecker>) -> Self {
        Self {
            tone,
            fact_checker,
            logger: logger::global().clone(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }
}

#[async_trait]
impl Agent<ContentState> for EditingAgent {
    fn name(&self) -> &str {
        EDITING_AGENT
    }

    async fn run(
        &self,
        ctx: &ExecutionContext,
        state: &ContentState,
    ) -> StepResult<AgentResult<ContentPatch>> {
        let started = Instant::now();

        let Some(draft) = &state.draft else {
            return Ok(AgentResult::failure("nothing to edit: no draft"));
        };

        let toned = self
            .tone
            .enforce(&draft.body, state.audience.as_deref())
            .await?;
        let sources = state
            .research
            .as_ref()
            .map(|r| r.sources.as_slice())
            .unwrap_or_default();
        let fact_check = self.fact_checker.check(&toned.text, sources).await?;
        self.logger.with_context(ctx.clone()).debug(
            "editing pass finished",
            Some(json!({
                "adjustments": toned.adjustments.len(),
                "passed": fact_check.passed,
            })),
        );

        let passed = fact_check.passed;
        let unsupported = fact_check.unsupported_claims.len();
        let patch = ContentPatch::review(EditorialReview {
            text: toned.text,
            tone_adjustments: toned.adjustments,
            fact_check,
        });
        let metrics = StepMetrics::default().with_duration_ms(started.elapsed().as_millis() as u64);

        if passed {
            Ok(AgentResult::success(patch).metrics(metrics))
        } else {
            Ok(AgentResult::pending(format!(
                "fact check failed: {} unsupported claim(s)",
                unsupported
            ))
            .payload(patch)
            .metrics(metrics))
        }
    }
}
