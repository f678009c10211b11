pub mod metrics;
pub mod notifier;
pub mod prompt;
pub mod providers;
pub mod validation;

pub use metrics::{
    get_metrics, init_metrics, record_analysis_outcome, record_email, record_generation,
};
pub use notifier::Notifier;
pub use prompt::build_prompt;
pub use providers::{
    EmailMessage, EmailProvider, GenerationError, MockEmailProvider, MockTextProvider,
    NotificationError, OpenAiTextProvider, SmtpEmailProvider, TextProvider,
};
pub use validation::{validate_email, ValidationError};
