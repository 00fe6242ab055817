use std::sync::Arc;

use axum::{
    routing::{ get, post },
    Router,
    extract::State,
    http::Uri,
    Json,
};
use axum::response::{ IntoResponse, Response };
use log::{ error, info };
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{ Any, CorsLayer };

use crate::error::AppError;
use crate::llm::ChatClient;
use crate::models::api::{ ApiInfo, ChatRequest, ChatResponse, HealthResponse };

/// Shared handler state. Deliberately holds no conversation data: history
/// arrives in each request body, so requests stay independent.
#[derive(Clone)]
pub struct AppState {
    pub chat_client: Arc<dyn ChatClient>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/info", get(info_handler))
        .route("/api/chat", post(chat_handler))
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .with_state(state)
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Unhandled error: {}", detail);
    AppError::Internal(detail).into_response()
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Thunder GPT backend is running!".to_string(),
    })
}

async fn info_handler(State(state): State<AppState>) -> Json<ApiInfo> {
    Json(ApiInfo {
        name: "Thunder GPT".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "AI Chatbot powered by Google Gemini".to_string(),
        models: vec![state.chat_client.model().to_string()],
        features: vec![
            "Multi-turn conversation".to_string(),
            "Context awareness".to_string(),
            "Real-time responses".to_string(),
        ],
    })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }

    info!(
        "POST /api/chat: {} history messages, message length {}",
        request.history.len(),
        request.message.len()
    );

    let reply = state
        .chat_client
        .chat(&request.message, &request.history)
        .await?;

    Ok(Json(ChatResponse {
        success: true,
        response: reply,
        message: request.message,
    }))
}

async fn not_found_handler(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
