//! Delivers a finished analysis to the caller by email.

use super::metrics::record_email;
use super::providers::{EmailMessage, EmailProvider};
use std::sync::Arc;

pub const ANALYSIS_SUBJECT: &str = "🌟 Your Personalized Health Analysis 🌟";

#[derive(Clone)]
pub struct Notifier {
    provider: Arc<dyn EmailProvider>,
}

impl Notifier {
    pub fn new(provider: Arc<dyn EmailProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn EmailProvider> {
        &self.provider
    }

    /// Plain-text body is the analysis verbatim; the HTML body wraps it in
    /// the coach template with newlines turned into `<br>`.
    pub fn compose(to: &str, analysis: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: ANALYSIS_SUBJECT.to_string(),
            body_text: analysis.to_string(),
            body_html: render_html(analysis),
        }
    }

    /// Send the analysis. Delivery failures are logged and otherwise ignored:
    /// callers get no signal whether the mail went out.
    pub async fn notify(&self, to: &str, analysis: &str) {
        let message = Self::compose(to, analysis);

        match self.provider.send(&message).await {
            Ok(()) => {
                record_email(self.provider.name(), "sent");
                tracing::info!(to = %to, provider = self.provider.name(), "Email sent successfully");
            }
            Err(e) => {
                record_email(self.provider.name(), "failed");
                tracing::error!(
                    to = %to,
                    provider = self.provider.name(),
                    error = %e,
                    "Error sending email"
                );
            }
        }
    }
}

fn render_html(analysis: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; color: #333;">
  <h2 style="color: #3498db;">🌟 Your Health Analysis 🌟</h2>
  <p>{}</p>
  <p>Stay healthy and keep shining! 💪✨</p>
  <p>Warm regards,<br>Your Health Coach 🩺</p>
</div>"#,
        analysis.replace('\n', "<br>")
    )
}
