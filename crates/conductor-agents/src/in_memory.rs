//! Deterministic, dependency-free service implementations.
//!
//! Useful for local runs of the content pipeline and for tests. None of them
//! perform I/O.

use async_trait::async_trait;
use conductor_core::StepResult;
use std::collections::BTreeSet;

use crate::services::{
    DraftRequest, FactChecker, SearchService, SeoAnalyzer, Summarizer, TextGenerator, ToneEnforcer,
    ToneResult,
};
use crate::state::{FactCheckReport, SearchHit, SeoReport};

const STOPWORDS: &[&str] = &[
    "about", "after", "also", "from", "have", "into", "that", "their", "there", "this", "what",
    "when", "which", "with", "your",
];

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Search over a fixed corpus. A hit matches when its title or snippet
/// contains any query word of four letters or more.
#[derive(Debug, Clone, Default)]
pub struct StaticSearch {
    corpus: Vec<SearchHit>,
}

impl StaticSearch {
    pub fn new(corpus: Vec<SearchHit>) -> Self {
        Self { corpus }
    }
}

#[async_trait]
impl SearchService for StaticSearch {
    async fn search(&self, query: &str) -> StepResult<Vec<SearchHit>> {
        let terms: Vec<String> = words(query).filter(|w| w.len() >= 4).collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .corpus
            .iter()
            .filter(|hit| {
                let haystack = format!("{} {}", hit.title, hit.snippet).to_lowercase();
                terms.iter().any(|t| haystack.contains(t.as_str()))
            })
            .cloned()
            .collect())
    }
}

/// Summary built from the first sentence of each snippet.
#[derive(Debug, Clone)]
pub struct LeadSentenceSummarizer {
    max_sentences: usize,
}

impl LeadSentenceSummarizer {
    pub fn new(max_sentences: usize) -> Self {
        Self { max_sentences }
    }
}

impl Default for LeadSentenceSummarizer {
    fn default() -> Self {
        Self::new(3)
    }
}

#[async_trait]
impl Summarizer for LeadSentenceSummarizer {
    async fn summarize(&self, _topic: &str, hits: &[SearchHit]) -> StepResult<String> {
        Ok(hits
            .iter()
            .filter_map(|hit| sentences(&hit.snippet).next())
            .take(self.max_sentences)
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// Fills a fixed article template from the research summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

#[async_trait]
impl TextGenerator for TemplateGenerator {
    async fn generate(&self, request: &DraftRequest<'_>) -> StepResult<String> {
        let audience = request.audience.unwrap_or("curious readers");
        let mut body = format!(
            "This article introduces {} for {}. {}",
            request.topic, audience, request.summary
        );
        if !request.sources.is_empty() {
            let titles: Vec<&str> = request.sources.iter().map(|s| s.title.as_str()).collect();
            body.push_str(&format!(" Sources consulted: {}.", titles.join(", ")));
        }
        Ok(body)
    }
}

/// Rewrites listed phrases and records each replacement.
#[derive(Debug, Clone)]
pub struct PhraseListToneEnforcer {
    replacements: Vec<(String, String)>,
}

impl PhraseListToneEnforcer {
    pub fn new(replacements: Vec<(String, String)>) -> Self {
        Self { replacements }
    }
}

impl Default for PhraseListToneEnforcer {
    fn default() -> Self {
        Self::new(
            [
                ("very ", ""),
                ("basically ", ""),
                ("utilize", "use"),
                ("in order to", "to"),
            ]
            .into_iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect(),
        )
    }
}

#[async_trait]
impl ToneEnforcer for PhraseListToneEnforcer {
    async fn enforce(&self, text: &str, _audience: Option<&str>) -> StepResult<ToneResult> {
        let mut edited = text.to_string();
        let mut adjustments = Vec::new();

        for (from, to) in &self.replacements {
            let count = edited.matches(from.as_str()).count();
            if count > 0 {
                edited = edited.replace(from.as_str(), to);
                adjustments.push(format!(
                    "replaced '{}' with '{}' ({}x)",
                    from.trim(),
                    to.trim(),
                    count
                ));
            }
        }

        Ok(ToneResult {
            text: edited,
            adjustments,
        })
    }
}

/// Treats every sentence containing a number as a claim. A claim is
/// supported when each of its numbers appears in some source snippet.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceFactChecker;

fn numbers(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl FactChecker for SourceFactChecker {
    async fn check(&self, text: &str, sources: &[SearchHit]) -> StepResult<FactCheckReport> {
        let known: BTreeSet<String> = sources.iter().flat_map(|s| numbers(&s.snippet)).collect();

        let unsupported_claims: Vec<String> = sentences(text)
            .filter(|sentence| {
                let figures = numbers(sentence);
                !figures.is_empty() && figures.iter().any(|n| !known.contains(n))
            })
            .map(str::to_string)
            .collect();

        Ok(FactCheckReport {
            passed: unsupported_claims.is_empty(),
            unsupported_claims,
        })
    }
}

/// Scores topic keyword coverage and length.
#[derive(Debug, Clone)]
pub struct KeywordSeoAnalyzer {
    min_words: usize,
}

impl KeywordSeoAnalyzer {
    pub fn new(min_words: usize) -> Self {
        Self { min_words }
    }
}

impl Default for KeywordSeoAnalyzer {
    fn default() -> Self {
        Self::new(300)
    }
}

const META_DESCRIPTION_LIMIT: usize = 155;

#[async_trait]
impl SeoAnalyzer for KeywordSeoAnalyzer {
    async fn analyze(&self, text: &str, topic: &str) -> StepResult<SeoReport> {
        let mut keywords: Vec<String> = Vec::new();
        for word in words(topic).filter(|w| w.len() > 3 && !STOPWORDS.contains(&w.as_str())) {
            if !keywords.contains(&word) {
                keywords.push(word);
            }
        }

        let text_words: BTreeSet<String> = words(text).collect();
        let mut score: i32 = 100;
        let mut suggestions = Vec::new();

        for keyword in &keywords {
            if !text_words.contains(keyword) {
                score -= 20;
                suggestions.push(format!("mention the keyword '{}'", keyword));
            }
        }

        let word_count = text.split_whitespace().count();
        if word_count < self.min_words {
            score -= 20;
            suggestions.push(format!(
                "expand the text to at least {} words (currently {})",
                self.min_words, word_count
            ));
        }

        let lead = sentences(text).next().unwrap_or("");
        let lead_words: BTreeSet<String> = words(lead).collect();
        if !keywords.is_empty() && !keywords.iter().any(|k| lead_words.contains(k)) {
            score -= 10;
            suggestions.push("introduce the topic in the first sentence".to_string());
        }

        let meta_description: String = lead.chars().take(META_DESCRIPTION_LIMIT).collect();

        Ok(SeoReport {
            score: score.clamp(0, 100) as u8,
            keywords,
            meta_description,
            suggestions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<SearchHit> {
        vec![
            SearchHit::new(
                "Ownership in Rust",
                "https://example.com/ownership",
                "Rust tracks ownership at compile time. Each value has one owner.",
            ),
            SearchHit::new(
                "Async Rust",
                "https://example.com/async",
                "Futures in Rust are lazy. Tokio has over 200 contributors.",
            ),
            SearchHit::new(
                "Gardening",
                "https://example.com/garden",
                "Tomatoes need sun.",
            ),
        ]
    }

    #[tokio::test]
    async fn test_static_search_matches_terms() {
        let search = StaticSearch::new(corpus());
        let hits = search.search("Rust ownership").await.unwrap();
        assert_eq!(hits.len(), 2);

        assert!(search.search("go").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summarizer_takes_lead_sentences() {
        let summary = LeadSentenceSummarizer::new(2)
            .summarize("rust", &corpus())
            .await
            .unwrap();
        assert_eq!(
            summary,
            "Rust tracks ownership at compile time. Futures in Rust are lazy."
        );
    }

    #[tokio::test]
    async fn test_tone_enforcer_records_adjustments() {
        let result = PhraseListToneEnforcer::default()
            .enforce("It is very fast. We utilize it.", None)
            .await
            .unwrap();
        assert_eq!(result.text, "It is fast. We use it.");
        assert_eq!(result.adjustments.len(), 2);
    }

    #[tokio::test]
    async fn test_fact_checker_flags_unknown_numbers() {
        let report = SourceFactChecker
            .check("Tokio has 200 contributors. Rust is 99 years old.", &corpus())
            .await
            .unwrap();
        assert!(!report.passed);
        assert_eq!(report.unsupported_claims, vec!["Rust is 99 years old."]);

        let report = SourceFactChecker
            .check("No figures here.", &corpus())
            .await
            .unwrap();
        assert!(report.passed);
    }

    #[tokio::test]
    async fn test_seo_analyzer_scores_coverage() {
        let analyzer = KeywordSeoAnalyzer::new(5);
        let report = analyzer
            .analyze("Rust ownership keeps memory safe without a collector.", "rust ownership")
            .await
            .unwrap();
        assert_eq!(report.score, 100);
        assert_eq!(report.keywords, vec!["rust", "ownership"]);

        let report = analyzer.analyze("Short text.", "rust ownership").await.unwrap();
        // two missing keywords, too short, topic absent from the lead
        assert_eq!(report.score, 30);
        assert_eq!(report.suggestions.len(), 4);
    }
}
