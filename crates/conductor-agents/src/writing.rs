use async_trait::async_trait;
use conductor_core::{Agent, AgentResult, ExecutionContext, StepMetrics, StepResult};
use std::sync::Arc;
use std::time::Instant;

use crate::services::{DraftRequest, TextGenerator};
use crate::state::{ContentPatch, ContentState, Draft};

pub const WRITING_AGENT: &str = "writing";

/// Drafts an article from the research brief.
pub struct WritingAgent {
    generator: Arc<dyn TextGenerator>,
}

impl WritingAgent {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

fn title_case(topic: &str) -> String {
    topic
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Agent<ContentState> for WritingAgent {
    fn name(&self) -> &str {
        WRITING_AGENT
    }

    async fn run(
        &self,
        _ctx: &ExecutionContext,
        state: &ContentState,
    ) -> StepResult<AgentResult<ContentPatch>> {
        let started = Instant::now();

        let Some(research) = &state.research else {
            return Ok(AgentResult::failure("cannot write without research"));
        };

        let request = DraftRequest {
            topic: &state.topic,
            audience: state.audience.as_deref(),
            summary: &research.summary,
            sources: &research.sources,
        };
        let body = self.generator.generate(&request).await?;
        let draft = Draft::new(title_case(&state.topic), body);

        Ok(AgentResult::success(ContentPatch::draft(draft))
            .metrics(StepMetrics::default().with_duration_ms(started.elapsed().as_millis() as u64)))
    }
}
