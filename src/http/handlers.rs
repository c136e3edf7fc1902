use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::triage::{HealthReport, Prediction, TriageService};

use super::error::ApiError;

pub type SharedService = Arc<TriageService>;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// A missing or null `text` is scored as the empty string.
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestReplyRequest {
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestReplyResponse {
    pub suggested_reply: &'static str,
}

pub async fn predict(
    State(service): State<SharedService>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<Prediction>, ApiError> {
    let text = request.text.unwrap_or_default();
    let prediction = service.predict(&text)?;
    Ok(Json(prediction))
}

pub async fn suggest_reply(
    State(service): State<SharedService>,
    Json(request): Json<SuggestReplyRequest>,
) -> Json<SuggestReplyResponse> {
    Json(SuggestReplyResponse {
        suggested_reply: service.suggest_reply(&request.label),
    })
}

pub async fn health(State(service): State<SharedService>) -> Json<HealthReport> {
    Json(service.health())
}
