//! Caller input checks for the analysis endpoint.

use service_core::error::AppError;
use thiserror::Error;
use validator::ValidateEmail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email is required!")]
    MissingEmail,

    #[error("Invalid email address!")]
    InvalidEmail,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Check that an email was supplied and is well formed, returning it unchanged.
///
/// An empty string counts as missing.
pub fn validate_email(email: Option<&str>) -> Result<&str, ValidationError> {
    let email = match email {
        Some(e) if !e.is_empty() => e,
        _ => return Err(ValidationError::MissingEmail),
    };

    if is_valid_email(email) {
        Ok(email)
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// RFC syntax check, a dot-atom local part, and a fully qualified domain: a
/// dotted name whose top-level label is alphabetic (two or more letters) or
/// punycode.
pub fn is_valid_email(email: &str) -> bool {
    if !email.validate_email() {
        return false;
    }

    match email.rsplit_once('@') {
        Some((local, domain)) => is_dot_atom(local) && has_qualified_domain(domain),
        None => false,
    }
}

/// No empty atoms: rules out a leading, trailing or doubled dot.
fn is_dot_atom(local: &str) -> bool {
    !local.is_empty() && local.split('.').all(|atom| !atom.is_empty())
}

fn has_qualified_domain(domain: &str) -> bool {
    let Some((_, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    let tld = tld.to_ascii_lowercase();
    if let Some(rest) = tld.strip_prefix("xn--") {
        return rest.len() >= 2 && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    }

    tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_email_is_required() {
        assert_eq!(validate_email(None), Err(ValidationError::MissingEmail));
        assert_eq!(validate_email(Some("")), Err(ValidationError::MissingEmail));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "not-an-email",
            "a@b",
            "@missing-local.com",
            "user@",
            "user@example.",
            "user@example.c",
            "user@example.123",
            "user@[127.0.0.1]",
            "two@@example.com",
            "spaces in@example.com",
            ".user@example.com",
            "user.@example.com",
            "us..er@example.com",
        ] {
            assert_eq!(
                validate_email(Some(email)),
                Err(ValidationError::InvalidEmail),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_well_formed_addresses() {
        for email in [
            "user@example.com",
            "jane.doe+fitness@mail.example.co.uk",
            "x@sub-domain.example.org",
            "user@example.xn--p1ai",
        ] {
            assert_eq!(validate_email(Some(email)), Ok(email), "{email} should pass");
        }
    }

    #[test]
    fn returns_value_unchanged() {
        assert_eq!(
            validate_email(Some("Jane@Example.COM")),
            Ok("Jane@Example.COM")
        );
    }

    #[test]
    fn messages_match_api_contract() {
        assert_eq!(ValidationError::MissingEmail.to_string(), "Email is required!");
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "Invalid email address!"
        );
    }
}
