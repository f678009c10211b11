//! Outbound collaborators: the text generator and the mail transport.
//!
//! Both sit behind traits so the handler can be driven by the mock
//! implementations in tests and in unconfigured dev environments.

pub mod email;
pub mod mock;
pub mod openai;

use async_trait::async_trait;
use service_core::error::AppError;
use thiserror::Error;

pub use email::SmtpEmailProvider;
pub use mock::{MockEmailProvider, MockTextProvider};
pub use openai::OpenAiTextProvider;

/// Failure of the analysis generator. Never shown to callers.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider returned no analysis text")]
    EmptyResponse,
}

impl GenerationError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::NotConfigured(_) => "not_configured",
            GenerationError::ApiError(_) => "api_error",
            GenerationError::RateLimited(_) => "rate_limited",
            GenerationError::NetworkError(_) => "network_error",
            GenerationError::EmptyResponse => "empty_response",
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::UpstreamError(err.to_string())
    }
}

/// Failure of the mail transport. Logged and swallowed by the notifier.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Send error: {0}")]
    SendFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: String,
}

#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Run a single-message completion and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<(), NotificationError>;

    async fn health_check(&self) -> Result<(), NotificationError>;

    fn name(&self) -> &'static str;
}
