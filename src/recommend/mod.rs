//! Mood to song recommendation: prompting, reply extraction and parsing.

mod extract;
pub mod models;
mod parse;
mod pipeline;
mod prompt;
mod requester;

pub use extract::{
    extract, fenced_content, BalancedBraceSpan, ExtractionStrategy, GreedyBraceSpan,
    ResponseExtractor,
};
pub use models::{
    EnrichedRecommendation, EnrichedSong, ImagePayload, MoodInput, Recommendation,
    RecommendationRequest, SongCandidate,
};
pub use parse::{parse, parse_first, ParseFailed};
pub use pipeline::RecommendationPipeline;
pub use prompt::{build_prompt, mood_phrase_for_color};
pub use requester::RecommendationRequester;

use crate::llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Completion request failed: {0}")]
    RequestFailed(#[from] LlmError),

    #[error("Model reply contains no JSON object")]
    NoStructuredReply,

    #[error(transparent)]
    ParseFailed(#[from] ParseFailed),
}

impl RecommendError {
    /// Metrics label.
    pub fn label(&self) -> &'static str {
        match self {
            RecommendError::RequestFailed(_) => "request_failed",
            RecommendError::NoStructuredReply => "no_structured_reply",
            RecommendError::ParseFailed(_) => "parse_failed",
        }
    }
}
