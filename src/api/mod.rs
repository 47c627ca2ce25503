use crate::config::AppConfig;
use crate::event::AppEvent;
use crate::recommend::RecommendationResult;
use crate::session::SessionToken;
use log::{debug, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use thiserror::Error;
use tokio::runtime::Handle;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(StatusCode),
    #[error("tokio runtime unavailable: {0}")]
    Runtime(String),
}

/// HTTP client for the FlowRoll backend.
///
/// Each call spawns one task on the runtime and reports its completion as an
/// `AppEvent` over the channel; the UI thread never waits on the network. A
/// send into a disconnected channel (app shut down mid-flight) is discarded.
#[derive(Clone)]
pub struct CoachClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionToken,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl CoachClient {
    /// Must be called from within the tokio runtime so the handle used for
    /// spawning request tasks can be captured.
    pub fn new(
        config: &AppConfig,
        session: SessionToken,
        tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, ApiError> {
        let runtime_handle =
            Handle::try_current().map_err(|err| ApiError::Runtime(err.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.api_base.clone(),
            session,
            tx,
            runtime_handle,
        })
    }

    /// Issues the single chat exchange for one accepted submission.
    pub fn send_chat(&self, message: String) {
        let client = self.clone();
        self.runtime_handle.spawn(async move {
            let event = match client.post_chat(&message).await {
                Ok(reply) => AppEvent::ChatReply(reply),
                Err(err) => {
                    warn!("chat request failed: {err}");
                    AppEvent::ChatFailed(err.to_string())
                }
            };
            let _ = client.tx.send(event);
        });
    }

    /// Issues one recommendation request for the given selection. Failures
    /// are folded into a synthesized result so the results card always
    /// receives a well-formed value.
    pub fn fetch_recommendations(&self, injuries: Vec<String>) {
        let client = self.clone();
        self.runtime_handle.spawn(async move {
            let result = match client.post_recommendations(&injuries).await {
                Ok(result) => result,
                Err(err) => {
                    warn!("recommendations request failed: {err}");
                    RecommendationResult::from_failure(injuries, &err.to_string())
                }
            };
            let _ = client.tx.send(AppEvent::RecommendationsReady(result));
        });
    }

    async fn post_chat(&self, message: &str) -> Result<String, ApiError> {
        debug!("POST {}/api/chat", self.base_url);
        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&ChatRequest {
                session_id: self.session.as_str(),
                message,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let decoded: ChatResponse = response.json().await?;
        Ok(decoded.reply.unwrap_or_default())
    }

    async fn post_recommendations(
        &self,
        injuries: &[String],
    ) -> Result<RecommendationResult, ApiError> {
        debug!(
            "POST {}/api/recommendations ({} injuries)",
            self.base_url,
            injuries.len()
        );
        let response = self
            .http
            .post(format!("{}/api/recommendations", self.base_url))
            .json(&RecommendationRequest { injuries })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let decoded: RecommendationResponse = response.json().await?;
        Ok(decoded.into())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    session_id: &'a str,
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    reply: Option<String>,
}

#[derive(Serialize)]
struct RecommendationRequest<'a> {
    injuries: &'a [String],
}

/// Wire shape of the recommendations response. Every field may be absent;
/// defaulting happens here, right after decode, so nothing downstream deals
/// with options.
#[derive(Debug, Default, Deserialize)]
struct RecommendationResponse {
    #[serde(default)]
    injuries: Vec<String>,
    #[serde(default)]
    safe_moves: Vec<String>,
    #[serde(default)]
    unsafe_moves: Vec<String>,
    #[serde(default)]
    ai_recommendations: AiRecommendations,
    #[serde(default)]
    recovery_advice: String,
}

#[derive(Debug, Default, Deserialize)]
struct AiRecommendations {
    #[serde(default)]
    recommendations: String,
}

impl From<RecommendationResponse> for RecommendationResult {
    fn from(raw: RecommendationResponse) -> Self {
        Self {
            injuries: raw.injuries,
            safe_moves: raw.safe_moves,
            unsafe_moves: raw.unsafe_moves,
            ai_recommendations: raw.ai_recommendations.recommendations,
            recovery_advice: raw.recovery_advice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatRequest, ChatResponse, RecommendationRequest, RecommendationResponse};
    use crate::recommend::RecommendationResult;
    use serde_json::json;

    #[test]
    fn chat_request_uses_backend_field_names() {
        let body = serde_json::to_value(ChatRequest {
            session_id: "abc123",
            message: "hello",
        })
        .expect("chat request serializes");
        assert_eq!(body, json!({"session_id": "abc123", "message": "hello"}));
    }

    #[test]
    fn recommendation_request_uses_backend_field_names() {
        let injuries = vec!["Neck injury".to_string()];
        let body = serde_json::to_value(RecommendationRequest {
            injuries: &injuries,
        })
        .expect("recommendation request serializes");
        assert_eq!(body, json!({"injuries": ["Neck injury"]}));
    }

    #[test]
    fn chat_response_tolerates_missing_reply() {
        let decoded: ChatResponse = serde_json::from_str("{}").expect("empty object decodes");
        assert!(decoded.reply.is_none());

        let decoded: ChatResponse =
            serde_json::from_value(json!({"reply": "hi"})).expect("reply decodes");
        assert_eq!(decoded.reply.as_deref(), Some("hi"));
    }

    #[test]
    fn empty_recommendation_response_normalizes_to_defaults() {
        let decoded: RecommendationResponse =
            serde_json::from_str("{}").expect("empty object decodes");
        let result = RecommendationResult::from(decoded);
        assert_eq!(result, RecommendationResult::default());
    }

    #[test]
    fn nested_recommendation_text_defaults_when_absent() {
        let decoded: RecommendationResponse =
            serde_json::from_value(json!({"ai_recommendations": {}}))
                .expect("partial object decodes");
        let result = RecommendationResult::from(decoded);
        assert!(result.ai_recommendations.is_empty());
    }

    #[test]
    fn full_recommendation_response_flattens_nested_text() {
        let decoded: RecommendationResponse = serde_json::from_value(json!({
            "injuries": ["Lower back pain"],
            "safe_moves": ["Technical stand-up"],
            "unsafe_moves": ["Inverted guard"],
            "ai_recommendations": {"recommendations": "Keep a neutral spine."},
            "recovery_advice": "Rest between rounds."
        }))
        .expect("full object decodes");

        let result = RecommendationResult::from(decoded);
        assert_eq!(result.injuries, vec!["Lower back pain".to_string()]);
        assert_eq!(result.safe_moves, vec!["Technical stand-up".to_string()]);
        assert_eq!(result.unsafe_moves, vec!["Inverted guard".to_string()]);
        assert_eq!(result.ai_recommendations, "Keep a neutral spine.");
        assert_eq!(result.recovery_advice, "Rest between rounds.");
    }
}
