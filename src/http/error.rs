use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ai::InferenceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Prediction error: {0}")]
    Prediction(#[from] InferenceError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(target: "http", error = %self, status = status.as_u16(), "request failed");
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
