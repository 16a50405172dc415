//! External services the content agents call.
//!
//! Each trait is one outbound capability. Implementations return
//! [`StepError`](conductor_core::StepError) only for failures worth
//! retrying; domain outcomes such as a failed fact check are values.

use async_trait::async_trait;
use conductor_core::StepResult;

use crate::state::{FactCheckReport, SearchHit, SeoReport};

#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, query: &str) -> StepResult<Vec<SearchHit>>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, topic: &str, hits: &[SearchHit]) -> StepResult<String>;
}

/// Input for drafting an article.
#[derive(Debug, Clone)]
pub struct DraftRequest<'a> {
    pub topic: &'a str,
    pub audience: Option<&'a str>,
    pub summary: &'a str,
    pub sources: &'a [SearchHit],
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &DraftRequest<'_>) -> StepResult<String>;
}

/// Text after tone enforcement with a description of each change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneResult {
    pub text: String,
    pub adjustments: Vec<String>,
}

#[async_trait]
pub trait ToneEnforcer: Send + Sync {
    async fn enforce(&self, text: &str, audience: Option<&str>) -> StepResult<ToneResult>;
}

#[async_trait]
pub trait FactChecker: Send + Sync {
    async fn check(&self, text: &str, sources: &[SearchHit]) -> StepResult<FactCheckReport>;
}

#[async_trait]
pub trait SeoAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str, topic: &str) -> StepResult<SeoReport>;
}
