use std::time::Duration;

use async_trait::async_trait;
use log::{ debug, info };
use serde::{ Deserialize, Serialize };

use super::{ classify_error_text, ChatClient, ChatError };
use crate::models::chat::ChatMessage;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: 2048,
            temperature: 0.7,
            top_p: 1.0,
            top_k: 1,
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    status: Option<String>,
    message: String,
}

/// Maps a stored message onto the wire shape Gemini expects: `assistant`
/// becomes `model`, every other role becomes `user`, content is wrapped in a
/// single text part.
pub fn to_upstream_turn(msg: &ChatMessage) -> Content {
    let role = if msg.role == "assistant" { "model" } else { "user" };
    Content {
        role: role.to_string(),
        parts: vec![Part { text: msg.content.clone() }],
    }
}

fn classify(http_status: u16, api_status: Option<&str>, message: &str) -> ChatError {
    match api_status {
        Some("UNAUTHENTICATED") | Some("PERMISSION_DENIED") => {
            return ChatError::Credential(message.to_string());
        }
        Some("RESOURCE_EXHAUSTED") => {
            return ChatError::RateLimit(message.to_string());
        }
        _ => {}
    }
    match http_status {
        401 | 403 => ChatError::Credential(message.to_string()),
        429 => ChatError::RateLimit(message.to_string()),
        _ => classify_error_text(message),
    }
}

pub struct GeminiChatClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, crate::error::AppError> {
        if api_key.is_empty() || api_key == API_KEY_PLACEHOLDER {
            return Err(crate::error::AppError::Config(
                "GEMINI_API_KEY is not configured. Set it in your .env file or environment variables."
                    .to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::error::AppError::Config(format!("http client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| "gemini-pro".to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn chat(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatError> {
        // Replay the supplied history in order, then the new message as the
        // next user turn. No dedup, no length bound.
        let mut contents: Vec<Content> = history.iter().map(to_upstream_turn).collect();
        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part { text: message.to_string() }],
        });

        info!(
            "GeminiChatClient::chat() → model={} history_turns={}",
            self.model,
            history.len()
        );

        let payload = GenerateContentRequest {
            contents,
            generation_config: GenerationConfig::default(),
        };

        let resp = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChatError::Connectivity(e.to_string()))?;

        let http_status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| e.to_string());
            debug!("Gemini error body ({}): {}", http_status, body);
            return match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => Err(classify(
                    http_status,
                    parsed.error.status.as_deref(),
                    &parsed.error.message,
                )),
                Err(_) => Err(classify(http_status, None, &body)),
            };
        }

        let body: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| ChatError::Upstream(format!("malformed provider response: {}", e)))?;

        let text = body
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty());

        text.ok_or_else(|| ChatError::Upstream("provider returned no candidates".to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
