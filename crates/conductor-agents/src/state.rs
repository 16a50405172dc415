//! Typed state for the content pipeline.
//!
//! [`ContentState`] holds the union of everything the four content agents
//! produce. Each agent returns a [`ContentPatch`] that sets only the fields it
//! owns; merging overwrites set fields and leaves the rest alone.

use conductor_core::WorkflowState;
use serde::{Deserialize, Serialize};

/// One search result used as a research source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchBrief {
    pub summary: String,
    pub sources: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub body: String,
    pub word_count: usize,
}

impl Draft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            title: title.into(),
            word_count: body.split_whitespace().count(),
            body,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckReport {
    pub passed: bool,
    pub unsupported_claims: Vec<String>,
}

/// Output of the editing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorialReview {
    /// Edited text.
    pub text: String,
    pub tone_adjustments: Vec<String>,
    pub fact_check: FactCheckReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoReport {
    /// 0 to 100.
    pub score: u8,
    pub keywords: Vec<String>,
    pub meta_description: String,
    pub suggestions: Vec<String>,
}

/// Accumulated state of a content run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentState {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchBrief>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<Draft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<EditorialReview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoReport>,
}

impl ContentState {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// The most refined text available: edited text, else the draft body.
    pub fn latest_text(&self) -> Option<&str> {
        self.review
            .as_ref()
            .map(|r| r.text.as_str())
            .or_else(|| self.draft.as_ref().map(|d| d.body.as_str()))
    }
}

/// Partial update to a [`ContentState`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentPatch {
    pub topic: Option<String>,
    pub audience: Option<String>,
    pub research: Option<ResearchBrief>,
    pub draft: Option<Draft>,
    pub review: Option<EditorialReview>,
    pub seo: Option<SeoReport>,
}

impl ContentPatch {
    pub fn research(brief: ResearchBrief) -> Self {
        Self {
            research: Some(brief),
            ..Self::default()
        }
    }

    pub fn draft(draft: Draft) -> Self {
        Self {
            draft: Some(draft),
            ..Self::default()
        }
    }

    pub fn review(review: EditorialReview) -> Self {
        Self {
            review: Some(review),
            ..Self::default()
        }
    }

    pub fn seo(report: SeoReport) -> Self {
        Self {
            seo: Some(report),
            ..Self::default()
        }
    }
}

impl WorkflowState for ContentState {
    type Patch = ContentPatch;

    fn merge(&mut self, patch: ContentPatch) {
        if let Some(topic) = patch.topic {
            self.topic = topic;
        }
        if patch.audience.is_some() {
            self.audience = patch.audience;
        }
        if patch.research.is_some() {
            self.research = patch.research;
        }
        if patch.draft.is_some() {
            self.draft = patch.draft;
        }
        if patch.review.is_some() {
            self.review = patch.review;
        }
        if patch.seo.is_some() {
            self.seo = patch.seo;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut state = ContentState::new("rust").with_audience("developers");
        state.merge(ContentPatch::draft(Draft::new("Rust", "one two three")));
        state.merge(ContentPatch::default());

        assert_eq!(state.topic, "rust");
        assert_eq!(state.audience.as_deref(), Some("developers"));
        assert_eq!(state.draft.as_ref().unwrap().word_count, 3);
    }

    #[test]
    fn test_later_patch_wins() {
        let mut state = ContentState::new("rust");
        state.merge(ContentPatch::draft(Draft::new("v1", "first")));
        state.merge(ContentPatch::draft(Draft::new("v2", "second")));
        assert_eq!(state.draft.unwrap().title, "v2");
    }

    #[test]
    fn test_latest_text_prefers_review() {
        let mut state = ContentState::new("rust");
        assert!(state.latest_text().is_none());

        state.merge(ContentPatch::draft(Draft::new("t", "draft body")));
        assert_eq!(state.latest_text(), Some("draft body"));

        state.merge(ContentPatch::review(EditorialReview {
            text: "edited body".to_string(),
            tone_adjustments: vec![],
            fact_check: FactCheckReport {
                passed: true,
                unsupported_claims: vec![],
            },
        }));
        assert_eq!(state.latest_text(), Some("edited body"));
    }
}
