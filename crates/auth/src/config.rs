use std::time::Duration;

use url::Url;

use crate::error::AuthError;

const DEV_SECRET_KEY: &str = "fanzone-development-secret";

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Key used to sign password-reset tokens.
    pub secret_key: String,
    /// Accounts registered with this email become administrators.
    pub admin_email: Option<String>,
    pub session_ttl: Duration,
    pub reset_token_ttl: Duration,
    pub base_url: Url,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Configuration with defaults for everything but the signing key.
    pub fn new(secret_key: impl Into<String>, base_url: Url) -> Self {
        Self {
            secret_key: secret_key.into(),
            admin_email: None,
            session_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            reset_token_ttl: Duration::from_secs(3600),
            base_url,
            cookie_name: "session".to_string(),
            cookie_secure: true,
        }
    }

    pub fn with_admin_email(mut self, email: impl Into<String>) -> Self {
        self.admin_email = Some(email.into());
        self
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SECRET_KEY`: Signing key for reset tokens (a development key is used, with a warning, when unset)
    /// - `FANZONE_ADMIN`: Email address that receives the administrator role
    /// - `BASE_URL`: Public URL used in reset links (default: `http://localhost:3000`)
    /// - `SESSION_TTL_DAYS`: Session TTL in days (default: 7)
    /// - `RESET_TOKEN_TTL_SECONDS`: Reset token lifetime (default: 3600)
    /// - `COOKIE_SECURE`: Whether to set secure flag on cookies (default: true)
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` when `BASE_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, AuthError> {
        let base_url: Url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .parse()
            .map_err(|e| AuthError::Config(format!("BASE_URL must be a valid URL: {e}")))?;

        let secret_key = match std::env::var("SECRET_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                tracing::warn!("SECRET_KEY is not set, using the development key");
                DEV_SECRET_KEY.to_string()
            }
        };

        let admin_email = std::env::var("FANZONE_ADMIN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let session_ttl = std::env::var("SESSION_TTL_DAYS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(|days| Duration::from_secs(days * 24 * 60 * 60))
            .unwrap_or(Duration::from_secs(7 * 24 * 60 * 60));

        let reset_token_ttl = std::env::var("RESET_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(3600));

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Ok(Self {
            secret_key,
            admin_email,
            session_ttl,
            reset_token_ttl,
            base_url,
            cookie_name: "session".to_string(),
            cookie_secure,
        })
    }

    /// Absolute link to the reset form for `token`.
    pub fn reset_link(&self, token: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(&format!("/auth/reset/{token}"))
            .map_err(|e| AuthError::Config(e.to_string()))
    }
}
