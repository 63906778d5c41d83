use super::extract::ResponseExtractor;
use super::models::{EnrichedRecommendation, RecommendationRequest};
use super::parse::parse_first;
use super::requester::RecommendationRequester;
use super::RecommendError;
use crate::server::metrics::record_recommendation;
use crate::video::VideoEnricher;
use std::time::Instant;
use tracing::{info, warn};

/// Requester, extractor, parser and enricher wired together.
pub struct RecommendationPipeline {
    requester: RecommendationRequester,
    extractor: ResponseExtractor,
    enricher: VideoEnricher,
}

impl RecommendationPipeline {
    pub fn new(requester: RecommendationRequester, enricher: VideoEnricher) -> Self {
        Self {
            requester,
            extractor: ResponseExtractor::default(),
            enricher,
        }
    }

    pub fn with_extractor(mut self, extractor: ResponseExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn model(&self) -> &str {
        self.requester.model()
    }

    pub fn video_search_enabled(&self) -> bool {
        self.enricher.is_enabled()
    }

    pub async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<EnrichedRecommendation, RecommendError> {
        let start = Instant::now();
        let result = self.run(&request).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.label(),
        };
        record_recommendation(outcome, start.elapsed());
        result
    }

    async fn run(
        &self,
        request: &RecommendationRequest,
    ) -> Result<EnrichedRecommendation, RecommendError> {
        let reply = self.requester.request(request).await.map_err(|e| {
            warn!("Completion failed for {}: {}", request.summary(), e);
            RecommendError::from(e)
        })?;

        let candidates = self.extractor.candidates(&reply);
        if candidates.is_empty() {
            warn!(
                "No JSON object in model reply for {}. Reply: {}",
                request.summary(),
                reply
            );
            return Err(RecommendError::NoStructuredReply);
        }

        let recommendation = parse_first(&candidates).map_err(|e| {
            warn!(
                "Could not parse any of {} candidate(s) for {}: {}. Reply: {}",
                candidates.len(),
                request.summary(),
                e,
                reply
            );
            RecommendError::from(e)
        })?;

        info!(
            "Model suggested {} song(s) for emotion {:?}",
            recommendation.songs.len(),
            recommendation.emotion
        );

        let recommended_songs = self.enricher.enrich_all(recommendation.songs).await;
        Ok(EnrichedRecommendation {
            emotion: recommendation.emotion,
            recommended_songs,
        })
    }
}
