//! # Conductor Agents
//!
//! The four content-pipeline workers and the services they call:
//!
//! - **[`ResearchAgent`]**: search, then summarize
//! - **[`WritingAgent`]**: draft from the research brief
//! - **[`EditingAgent`]**: tone enforcement and fact checking
//! - **[`OptimizationAgent`]**: SEO analysis
//!
//! Agents share the typed [`ContentState`] accumulator. Services sit behind
//! traits in [`services`]; deterministic implementations are in
//! [`in_memory`]. [`content_pipeline`] builds the registered step list.

pub mod editing;
pub mod in_memory;
pub mod optimization;
pub mod pipeline;
pub mod research;
pub mod services;
pub mod state;
pub mod writing;

pub use editing::{EDITING_AGENT, EditingAgent};
pub use optimization::{OPTIMIZATION_AGENT, OptimizationAgent};
pub use pipeline::{ContentServices, content_pipeline};
pub use research::{RESEARCH_AGENT, ResearchAgent};
pub use state::{
    ContentPatch, ContentState, Draft, EditorialReview, FactCheckReport, ResearchBrief, SearchHit,
    SeoReport,
};
pub use writing::{WRITING_AGENT, WritingAgent};
