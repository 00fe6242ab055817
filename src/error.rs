use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use axum::Json;
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::llm::ChatError;
use crate::models::api::ErrorResponse;

/// Whether internal error details are echoed back to clients. Set once at
/// startup from the --debug flag.
static DEBUG_MODE: OnceCell<bool> = OnceCell::new();

pub fn set_debug_mode(enabled: bool) {
    let _ = DEBUG_MODE.set(enabled);
}

fn debug_mode() -> bool {
    *DEBUG_MODE.get().unwrap_or(&false)
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("endpoint not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
            }
            AppError::NotFound(path) => {
                let mut body = ErrorResponse::new("Endpoint not found");
                body.path = Some(path);
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            AppError::Chat(err) => {
                let message = match &err {
                    ChatError::Credential(_) => {
                        "Invalid or expired API key. Please check your Gemini API key in settings."
                    }
                    ChatError::RateLimit(_) => "API quota exceeded. Please try again later.",
                    ChatError::Connectivity(_) => {
                        "Network error. Please check your internet connection."
                    }
                    ChatError::Upstream(_) => {
                        "An error occurred while processing your request"
                    }
                };
                let mut body = ErrorResponse::new(message);
                body.details = Some(err.details().to_string());
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            // Config only arises at startup, before any request is served;
            // render like any other unexpected failure if it ever leaks.
            AppError::Config(details) | AppError::Internal(details) => {
                let mut body = ErrorResponse::new("Internal server error");
                body.message = Some(if debug_mode() {
                    details
                } else {
                    "An error occurred".to_string()
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    #[test]
    fn validation_maps_to_400() {
        let resp = AppError::Validation("Message is required".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn chat_errors_map_to_500() {
        let resp = AppError::Chat(ChatError::RateLimit("429".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = AppError::NotFound("/nope".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    async fn internal_body(detail: &str) -> serde_json::Value {
        let resp = AppError::Internal(detail.to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    // DEBUG_MODE is a process-wide set-once cell, so the suppressed and
    // echoed assertions must run ordered in a single test.
    #[tokio::test]
    async fn internal_detail_is_gated_by_debug_mode() {
        let body = internal_body("boom").await;
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "An error occurred");

        set_debug_mode(true);
        let body = internal_body("boom").await;
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "boom");
    }
}
