//! Chat-completion client.
//!
//! The external service is a black box behind [`CompletionClient`]: a request
//! goes in, a JSON body or a [`DelegationError`] comes out. The HTTP
//! implementation targets OpenAI-compatible `chat/completions` endpoints and
//! makes exactly one bounded attempt per question.

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use super::DelegationError;
use crate::config::DelegateConfig;

/// Longest slice of an error body kept for diagnostics.
const ERROR_BODY_LIMIT: usize = 300;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for a chat completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl CompletionRequest {
    /// Single user-message request using the model settings from `config`.
    pub fn user_prompt(config: &DelegateConfig, prompt: String) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: prompt,
            }],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Transport for completion requests.
pub trait CompletionClient: Send + Sync {
    /// Human-readable name of this client.
    fn name(&self) -> &str;

    /// Send one request authenticated with `credential`; return the raw JSON body.
    fn complete(
        &self,
        request: &CompletionRequest,
        credential: &str,
    ) -> Result<Value, DelegationError>;
}

/// Blocking HTTPS client with a request timeout.
pub struct HttpCompletionClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpCompletionClient {
    pub fn new(config: &DelegateConfig) -> Result<Self, DelegationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("barlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DelegationError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl CompletionClient for HttpCompletionClient {
    fn name(&self) -> &str {
        "http_chat_completions"
    }

    fn complete(
        &self,
        request: &CompletionRequest,
        credential: &str,
    ) -> Result<Value, DelegationError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    DelegationError::Timeout(e.to_string())
                } else {
                    DelegationError::Network(e.to_string())
                }
            })?;

        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DelegationError::Authentication(format!(
                "HTTP {status} from completion service"
            )));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            return Err(DelegationError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(DelegationError::Http {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        resp.json::<Value>().map_err(|e| {
            if e.is_timeout() {
                DelegationError::Timeout(e.to_string())
            } else {
                DelegationError::MalformedResponse(e.to_string())
            }
        })
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
