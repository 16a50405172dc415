//! Wiring of the four content agents into workflow steps.

use conductor_core::{Logger, WorkflowStep, logger};
use std::sync::Arc;

use crate::editing::EditingAgent;
use crate::in_memory::{
    KeywordSeoAnalyzer, LeadSentenceSummarizer, PhraseListToneEnforcer, SourceFactChecker,
    StaticSearch, TemplateGenerator,
};
use crate::optimization::OptimizationAgent;
use crate::research::ResearchAgent;
use crate::services::{
    FactChecker, SearchService, SeoAnalyzer, Summarizer, TextGenerator, ToneEnforcer,
};
use crate::state::{ContentState, SearchHit};
use crate::writing::WritingAgent;

/// The external services used by the content pipeline.
#[derive(Clone)]
pub struct ContentServices {
    pub search: Arc<dyn SearchService>,
    pub summarizer: Arc<dyn Summarizer>,
    pub generator: Arc<dyn TextGenerator>,
    pub tone: Arc<dyn ToneEnforcer>,
    pub fact_checker: Arc<dyn FactChecker>,
    pub seo: Arc<dyn SeoAnalyzer>,
    /// Logger handed to agents that emit diagnostics.
    pub logger: Logger,
}

impl ContentServices {
    /// In-memory services searching over `corpus`.
    pub fn in_memory(corpus: Vec<SearchHit>) -> Self {
        Self {
            search: Arc::new(StaticSearch::new(corpus)),
            summarizer: Arc::new(LeadSentenceSummarizer::default()),
            generator: Arc::new(TemplateGenerator),
            tone: Arc::new(PhraseListToneEnforcer::default()),
            fact_checker: Arc::new(SourceFactChecker),
            seo: Arc::new(KeywordSeoAnalyzer::default()),
            logger: logger::global().clone(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }
}

/// Steps in order: research, writing, editing, optimization.
pub fn content_pipeline(services: ContentServices) -> Vec<WorkflowStep<ContentState>> {
    vec![
        WorkflowStep::new(
            "research",
            Arc::new(
                ResearchAgent::new(services.search, services.summarizer)
                    .with_logger(services.logger.clone()),
            ),
        )
        .with_description("Search for sources and summarize them"),
        WorkflowStep::new("writing", Arc::new(WritingAgent::new(services.generator)))
            .with_description("Draft the article from the research brief"),
        WorkflowStep::new(
            "editing",
            Arc::new(
                EditingAgent::new(services.tone, services.fact_checker)
                    .with_logger(services.logger),
            ),
        )
        .with_description("Enforce tone and fact-check the draft"),
        WorkflowStep::new("optimization", Arc::new(OptimizationAgent::new(services.seo)))
            .with_description("Analyze SEO and publish metadata"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_core::{Agent, AgentStatus, ExecutionContext, WorkflowState};
    use crate::state::{ContentPatch, ResearchBrief};
    use conductor_core::LogLevel;
    use conductor_testing::RecordingSink;

    fn corpus() -> Vec<SearchHit> {
        vec![
            SearchHit::new(
                "Ownership in Rust",
                "https://example.com/ownership",
                "Rust tracks ownership at compile time. Each value has one owner.",
            ),
            SearchHit::new(
                "Rust releases",
                "https://example.com/releases",
                "Rust ships a release every 6 weeks.",
            ),
        ]
    }

    fn ctx(step: &str) -> ExecutionContext {
        ExecutionContext::new("wf-test", step, step, Arc::default())
    }

    /// Runs the steps by hand, folding each patch, and returns the statuses.
    async fn drive(state: &mut ContentState, services: ContentServices) -> Vec<AgentStatus> {
        let mut statuses = Vec::new();
        for step in content_pipeline(services) {
            let result = step.agent.run(&ctx(&step.id), state).await.unwrap();
            statuses.push(result.status);
            if let Some(patch) = result.payload {
                state.merge(patch);
            }
        }
        statuses
    }

    #[test]
    fn test_pipeline_order() {
        let ids: Vec<String> = content_pipeline(ContentServices::in_memory(vec![]))
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["research", "writing", "editing", "optimization"]);
    }

    #[tokio::test]
    async fn test_full_pipeline_fills_every_field() {
        let mut state = ContentState::new("rust ownership").with_audience("developers");
        let statuses = drive(&mut state, ContentServices::in_memory(corpus())).await;

        assert_eq!(statuses[0], AgentStatus::Success);
        assert_eq!(statuses[1], AgentStatus::Success);
        assert_eq!(statuses[3], AgentStatus::Success);
        assert_eq!(state.research.as_ref().unwrap().sources.len(), 2);
        assert!(state.draft.as_ref().unwrap().body.contains("developers"));
        assert!(state.review.is_some());
        assert!(state.seo.is_some());
    }

    #[tokio::test]
    async fn test_research_emits_store_sources() {
        let services = ContentServices::in_memory(corpus());
        let agent = ResearchAgent::new(services.search, services.summarizer);
        let result = agent
            .run(&ctx("research"), &ContentState::new("rust"))
            .await
            .unwrap();

        assert_eq!(result.tool_invocations.len(), 1);
        assert_eq!(result.tool_invocations[0].tool_name, "store_sources");
        assert_eq!(
            result.tool_invocations[0].payload["urls"][1],
            "https://example.com/releases"
        );
    }

    #[tokio::test]
    async fn test_agent_diagnostics_go_through_injected_logger() {
        let sink = RecordingSink::new();
        let services =
            ContentServices::in_memory(corpus()).with_logger(RecordingSink::logger(&sink));
        let mut state = ContentState::new("rust ownership");
        drive(&mut state, services).await;

        let research = sink.with_message("research search finished");
        assert_eq!(research.len(), 1);
        assert_eq!(research[0].level, LogLevel::Debug);
        assert_eq!(research[0].data.as_ref().unwrap()["hits"], 2);
        let ctx = research[0].context.as_ref().unwrap();
        assert_eq!(ctx.workflow_id, "wf-test");
        assert_eq!(ctx.step_id, "research");

        let editing = sink.with_message("editing pass finished");
        assert_eq!(editing.len(), 1);
        assert_eq!(editing[0].context.as_ref().unwrap().step_id, "editing");
    }

    #[tokio::test]
    async fn test_no_sources_is_pending_then_writing_fails_softly() {
        let mut state = ContentState::new("gardening tips");
        let statuses = drive(&mut state, ContentServices::in_memory(corpus())).await;

        assert_eq!(statuses[0], AgentStatus::Pending);
        assert_eq!(statuses[1], AgentStatus::Error);
        assert!(state.research.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_figure_makes_editing_pending() {
        let mut state = ContentState::new("rust ownership");
        state.merge(ContentPatch::research(ResearchBrief {
            summary: "Rust has 3 rules.".to_string(),
            sources: corpus(),
        }));

        let services = ContentServices::in_memory(corpus());
        let writing = WritingAgent::new(services.generator);
        let draft = writing.run(&ctx("writing"), &state).await.unwrap();
        state.merge(draft.payload.unwrap());

        let editing = EditingAgent::new(services.tone, services.fact_checker);
        let result = editing.run(&ctx("editing"), &state).await.unwrap();

        assert_eq!(result.status, AgentStatus::Pending);
        let review = result.payload.unwrap().review.unwrap();
        assert_eq!(review.fact_check.unsupported_claims, vec!["Rust has 3 rules."]);
    }
}
