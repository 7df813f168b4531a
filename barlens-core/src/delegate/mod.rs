//! LLM delegation for questions no deterministic analytic covers.
//!
//! [`LlmDelegate`] never fails upward: configuration problems, transport
//! failures, and odd response shapes all come back as a `Delegated` answer
//! whose text explains what went wrong.

pub mod client;
pub mod context;
pub mod extract;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

pub use client::{ChatMessage, CompletionClient, CompletionRequest, HttpCompletionClient};
pub use context::build_prompt;
pub use extract::extract_answer;

use crate::config::DelegateConfig;
use crate::domain::Bar;
use crate::query::{Delegate, QueryAnswer};

/// Failure modes of a delegated question.
///
/// Displayable as-is in the CLI and in answer text.
#[derive(Debug, Error)]
pub enum DelegationError {
    #[error("configuration error: no API key in environment variable {env_var}")]
    MissingCredential { env_var: String },

    #[error("configuration error: cannot build HTTP client: {0}")]
    ClientBuild(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected: {0}")]
    Authentication(String),

    #[error("rate limited by completion service{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("HTTP {status} from completion service: {body}")]
    Http { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("completion service error: {0}")]
    Api(String),

    #[error("response contained neither message content nor reasoning content")]
    EmptyResponse,
}

fn retry_hint(secs: &Option<u64>) -> String {
    secs.map(|s| format!(" (retry after {s}s)")).unwrap_or_default()
}

impl DelegationError {
    /// Missing or unusable local setup, as opposed to a remote failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DelegationError::MissingCredential { .. } | DelegationError::ClientBuild(_)
        )
    }
}

/// Delegate backed by a chat-completion service.
pub struct LlmDelegate {
    config: DelegateConfig,
    credential: Option<String>,
    client: Box<dyn CompletionClient>,
}

impl LlmDelegate {
    pub fn new(
        config: DelegateConfig,
        credential: Option<String>,
        client: Box<dyn CompletionClient>,
    ) -> Self {
        Self {
            config,
            credential,
            client,
        }
    }

    /// HTTP delegate with the credential read from the configured env var.
    ///
    /// If the HTTP client cannot be built, the delegate still constructs and
    /// reports the build failure in every delegated answer.
    pub fn from_config(config: &DelegateConfig) -> Self {
        let client: Box<dyn CompletionClient> = match HttpCompletionClient::new(config) {
            Ok(client) => Box::new(client),
            Err(e) => {
                warn!(error = %e, "completion client unavailable");
                Box::new(UnavailableClient {
                    reason: e.to_string(),
                })
            }
        };
        Self::new(config.clone(), config.resolve_credential(), client)
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Ask the service; the credential is checked before anything is sent.
    pub fn try_delegate(&self, question: &str, bars: &[Bar]) -> Result<String, DelegationError> {
        let credential = self
            .credential
            .as_deref()
            .ok_or_else(|| DelegationError::MissingCredential {
                env_var: self.config.api_key_env.clone(),
            })?;

        let prompt = build_prompt(
            question,
            bars,
            self.config.effective_sample_rows(),
            self.config.symbol.as_deref(),
        );
        let request = CompletionRequest::user_prompt(&self.config, prompt);

        info!(
            client = self.client.name(),
            model = %self.config.model,
            prompt_chars = request.messages[0].content.len(),
            "delegating question"
        );
        let body = self.client.complete(&request, credential)?;
        extract_answer(&body)
    }
}

/// Stand-in for a client that failed to build.
struct UnavailableClient {
    reason: String,
}

impl CompletionClient for UnavailableClient {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn complete(
        &self,
        _request: &CompletionRequest,
        _credential: &str,
    ) -> Result<Value, DelegationError> {
        Err(DelegationError::ClientBuild(self.reason.clone()))
    }
}

impl Delegate for LlmDelegate {
    fn delegate(&self, question: &str, bars: &[Bar]) -> QueryAnswer {
        match self.try_delegate(question, bars) {
            Ok(text) => QueryAnswer::delegated(text),
            Err(e) => {
                warn!(error = %e, "delegation failed");
                QueryAnswer::delegated(format!("Sorry, I could not answer that question ({e})."))
            }
        }
    }
}
