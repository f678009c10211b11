//! In-memory providers for tests and unconfigured environments.

use super::{EmailMessage, EmailProvider, GenerationError, NotificationError, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Generator that answers every prompt with a fixed reply, or fails.
pub struct MockTextProvider {
    reply: Option<String>,
    calls: AtomicU64,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: AtomicU64::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A generator whose every call fails with an API error.
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicU64::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        match &self.reply {
            Some(reply) => {
                tracing::info!(prompt_len = prompt.len(), "[MOCK] Analysis generated");
                Ok(reply.clone())
            }
            None => Err(GenerationError::ApiError(
                "Mock text provider configured to fail".to_string(),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Mail transport that records messages instead of sending them.
pub struct MockEmailProvider {
    fail: bool,
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockEmailProvider {
    pub fn new() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A transport that rejects every message. Attempts are still recorded.
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email.clone());

        if self.fail {
            return Err(NotificationError::SendFailed(
                "Mock email provider configured to fail".to_string(),
            ));
        }

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "[MOCK] Email would be sent"
        );

        Ok(())
    }

    async fn health_check(&self) -> Result<(), NotificationError> {
        if self.fail {
            Err(NotificationError::Connection(
                "Mock email provider configured to fail".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
