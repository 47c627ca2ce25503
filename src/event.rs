use crate::recommend::RecommendationResult;

/// Completions reported by network tasks back to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Reply decoded from a 2xx chat response. May be empty; the transcript
    /// substitutes the no-reply placeholder.
    ChatReply(String),
    /// Chat request failed: transport error or non-2xx status.
    ChatFailed(String),
    /// Latest recommendation result, already normalized or synthesized from
    /// a failure.
    RecommendationsReady(RecommendationResult),
}
