use anyhow::{bail, Context, Result};
use chrono::{TimeDelta, Utc};
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::time::Duration;

/// Hard ceiling on a whole request. Every upstream round-trip must fit inside it.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub rauth_api_key: String,
    pub rauth_app_id: String,
    pub rauth_webhook_secret: String,
    pub rauth_webhook_url: String,
    pub rauth_api_url: String,
    pub rauth_timeout: Duration,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_ttl: chrono::Duration,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < 16 {
            bail!("JWT_SECRET must be at least 16 bytes");
        }

        let jwt_ttl_hours: i64 = lookup("JWT_TTL_HOURS")
            .unwrap_or_else(|| "24".to_string())
            .parse()
            .context("JWT_TTL_HOURS must be a valid number")?;
        if jwt_ttl_hours <= 0 {
            bail!("JWT_TTL_HOURS must be positive");
        }
        let jwt_ttl = TimeDelta::try_hours(jwt_ttl_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .context("JWT_TTL_HOURS is too large")?;

        let rauth_timeout = Duration::from_secs(
            lookup("RAUTH_TIMEOUT_SECS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("RAUTH_TIMEOUT_SECS must be a valid number")?,
        );
        if rauth_timeout.is_zero() || rauth_timeout >= REQUEST_TIMEOUT {
            bail!(
                "RAUTH_TIMEOUT_SECS must be between 1 and {}",
                REQUEST_TIMEOUT.as_secs() - 1
            );
        }

        Ok(Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            rauth_api_key: required("RAUTH_API_KEY")?,
            rauth_app_id: required("RAUTH_APP_ID")?,
            rauth_webhook_secret: required("RAUTH_WEBHOOK_SECRET")?,
            rauth_webhook_url: required("RAUTH_WEBHOOK_URL")?,
            rauth_api_url: lookup("RAUTH_API_URL")
                .unwrap_or_else(|| rauth::DEFAULT_API_URL.to_string()),
            rauth_timeout,
            jwt_secret,
            jwt_issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "rauth-gateway".to_string()),
            jwt_ttl,
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("rauth_api_key", &"[redacted]")
            .field("rauth_app_id", &self.rauth_app_id)
            .field("rauth_webhook_secret", &"[redacted]")
            .field("rauth_webhook_url", &self.rauth_webhook_url)
            .field("rauth_api_url", &self.rauth_api_url)
            .field("rauth_timeout", &self.rauth_timeout)
            .field("jwt_secret", &"[redacted]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_ttl", &self.jwt_ttl)
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}
