use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct HealthCoachConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    /// `ENVIRONMENT=prod`: credentials are mandatory and mock providers are
    /// never substituted.
    #[serde(default)]
    pub is_prod: bool,
    pub openai: OpenAiConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// Empty outside prod means "no key": a mock generator is used instead.
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Login for the relay, also used as the sender address.
    pub user: String,
    pub password: String,
    pub from_name: Option<String>,
    pub enabled: bool,
}

impl HealthCoachConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let config = HealthCoachConfig {
            common: common_config,
            is_prod,
            openai: OpenAiConfig {
                api_key: get_env("OPENAI_API_KEY", Some(""), is_prod)?,
                model: get_env("OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), is_prod)?,
                api_base: get_env("OPENAI_API_BASE", Some(DEFAULT_OPENAI_API_BASE), is_prod)?,
            },
            smtp: SmtpConfig {
                host: get_env("SMTP_HOST", Some("smtp.gmail.com"), is_prod)?,
                port: get_env("SMTP_PORT", Some("587"), is_prod)?
                    .parse()
                    .unwrap_or(587),
                user: get_env("EMAIL_USER", Some(""), is_prod)?,
                password: get_env("EMAIL_PASS", Some(""), is_prod)?,
                from_name: env::var("EMAIL_FROM_NAME").ok().filter(|s| !s.is_empty()),
                enabled: env::var("SMTP_ENABLED")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .unwrap_or(true),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Prod must run against the real generator and mail transport.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.is_prod {
            return Ok(());
        }

        let missing = [
            ("OPENAI_API_KEY", self.openai.api_key.is_empty()),
            ("EMAIL_USER", self.smtp.user.is_empty()),
            ("EMAIL_PASS", self.smtp.password.is_empty()),
        ]
        .into_iter()
        .find(|(_, empty)| *empty);

        if let Some((key, _)) = missing {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "{} must not be empty in production",
                key
            )));
        }

        if !self.smtp.enabled {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SMTP_ENABLED=false is not allowed in production"
            )));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    resolve_env(key, env::var(key).ok(), default, is_prod)
}

/// Pick the value for `key`: the set value, else the default outside prod.
/// In prod an empty value counts as unset.
fn resolve_env(
    key: &str,
    value: Option<String>,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError> {
    match value.filter(|v| !(is_prod && v.is_empty())) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(is_prod: bool) -> HealthCoachConfig {
        HealthCoachConfig {
            common: core_config::Config::default(),
            is_prod,
            openai: OpenAiConfig {
                api_key: "sk-test".to_string(),
                model: DEFAULT_OPENAI_MODEL.to_string(),
                api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            },
            smtp: SmtpConfig {
                host: "smtp.gmail.com".to_string(),
                port: 587,
                user: "coach@gmail.com".to_string(),
                password: "app-password".to_string(),
                from_name: None,
                enabled: true,
            },
        }
    }

    #[test]
    fn resolve_env_prefers_set_value() {
        let value =
            resolve_env("OPENAI_MODEL", Some("gpt-4o".to_string()), Some("fallback"), true).unwrap();
        assert_eq!(value, "gpt-4o");
    }

    #[test]
    fn resolve_env_uses_default_outside_prod() {
        let value = resolve_env("OPENAI_MODEL", None, Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn resolve_env_keeps_empty_value_outside_prod() {
        let value = resolve_env("OPENAI_API_KEY", Some(String::new()), Some("x"), false).unwrap();
        assert_eq!(value, "");
    }

    #[test]
    fn resolve_env_requires_value_in_prod() {
        let err = resolve_env("OPENAI_API_KEY", None, Some("fallback"), true).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn resolve_env_treats_empty_as_unset_in_prod() {
        let err = resolve_env("EMAIL_USER", Some(String::new()), Some(""), true).unwrap_err();
        assert!(err.to_string().contains("required in production"));
    }

    #[test]
    fn resolve_env_without_default_is_an_error() {
        let err = resolve_env("OPENAI_API_KEY", None, None, false).unwrap_err();
        assert!(err.to_string().contains("required but not set"));
    }

    #[test]
    fn prod_config_with_credentials_is_valid() {
        assert!(config(true).validate().is_ok());
    }

    #[test]
    fn prod_rejects_empty_credentials() {
        let mut no_key = config(true);
        no_key.openai.api_key.clear();
        assert!(matches!(no_key.validate(), Err(AppError::ConfigError(_))));

        let mut no_user = config(true);
        no_user.smtp.user.clear();
        let err = no_user.validate().unwrap_err();
        assert!(err.to_string().contains("EMAIL_USER"));

        let mut smtp_off = config(true);
        smtp_off.smtp.enabled = false;
        assert!(smtp_off.validate().is_err());
    }

    #[test]
    fn dev_allows_empty_credentials() {
        let mut dev = config(false);
        dev.openai.api_key.clear();
        dev.smtp.user.clear();
        assert!(dev.validate().is_ok());
    }
}
