//! Signed, expiring password-reset tokens and their delivery.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fanzone_core::domain::User;
use fanzone_core::storage::UserRepository;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AuthError;
use crate::password::hash_password_blocking;

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    reset: i64,
    exp: i64,
}

/// Signs a token allowing `user_id` to choose a new password until `now + ttl`.
pub fn generate_reset_token(
    user_id: i64,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = ResetClaims {
        reset: user_id,
        exp: now.timestamp() + ttl.as_secs() as i64,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Config(format!("failed to sign reset token: {e}")))
}

/// Returns the user id a token was issued for, if the signature and expiry check out.
pub fn decode_reset_token(token: &str, secret: &str) -> Result<i64, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims.reset)
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected reset token");
        AuthError::InvalidToken
    })
}

/// Stores a new password for `user` when `token` was issued to them.
pub async fn reset_password(
    users: &dyn UserRepository,
    user: &User,
    token: &str,
    secret: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    if decode_reset_token(token, secret)? != user.id {
        return Err(AuthError::InvalidToken);
    }

    let password_hash = hash_password_blocking(new_password.to_string()).await?;
    users.set_password_hash(user.id, &password_hash).await?;
    tracing::info!(user_id = user.id, "Password reset");
    Ok(())
}

/// Delivers password-reset links to users.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn send_reset_link(&self, user: &User, link: &Url) -> Result<(), AuthError>;
}

/// Writes reset links to the log instead of mailing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl ResetNotifier for LogNotifier {
    async fn send_reset_link(&self, user: &User, link: &Url) -> Result<(), AuthError> {
        tracing::info!(
            user_id = user.id,
            email = %user.email,
            link = %link,
            "Password reset requested"
        );
        Ok(())
    }
}

/// Keeps sent links in memory; used by tests.
#[derive(Debug, Default)]
pub struct OutboxNotifier {
    sent: Mutex<Vec<(String, Url)>>,
}

impl OutboxNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(email, link)` pairs in the order they were sent.
    pub fn sent(&self) -> Vec<(String, Url)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ResetNotifier for OutboxNotifier {
    async fn send_reset_link(&self, user: &User, link: &Url) -> Result<(), AuthError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((user.email.clone(), link.clone()));
        }
        Ok(())
    }
}
