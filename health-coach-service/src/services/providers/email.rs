use super::{EmailMessage, EmailProvider, NotificationError};
use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// STARTTLS SMTP relay (Gmail on port 587 unless configured otherwise).
pub struct SmtpEmailProvider {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailProvider {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotificationError> {
        let from = sender_mailbox(config)?;

        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| {
                NotificationError::Configuration(format!("Failed to create SMTP relay: {}", e))
            })?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { from, transport })
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        let to_mailbox: Mailbox = email.to.parse().map_err(|e| {
            NotificationError::InvalidRecipient(format!("Invalid recipient: {}", e))
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.body_text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.body_html.clone()),
                    ),
            )
            .map_err(|e| NotificationError::SendFailed(format!("Failed to build message: {}", e)))
    }
}

/// The relay login doubles as the sender address.
fn sender_mailbox(config: &SmtpConfig) -> Result<Mailbox, NotificationError> {
    let sender = match &config.from_name {
        Some(name) => format!("{} <{}>", name, config.user),
        None => config.user.clone(),
    };

    sender
        .parse()
        .map_err(|e| NotificationError::Configuration(format!("Invalid from address: {}", e)))
}

#[async_trait]
impl EmailProvider for SmtpEmailProvider {
    async fn send(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Failed to send email: {}", e)))?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), NotificationError> {
        let connected = self.transport.test_connection().await.map_err(|e| {
            NotificationError::Connection(format!("SMTP connection test failed: {}", e))
        })?;

        if connected {
            Ok(())
        } else {
            Err(NotificationError::Connection(
                "SMTP server did not accept the connection".to_string(),
            ))
        }
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
