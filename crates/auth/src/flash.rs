//! One-shot messages carried across redirects in a cookie.

use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash_message";

/// Flash message stored in the cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    /// "error", "success" or "info"; also used as the CSS class.
    #[serde(rename = "type")]
    pub message_type: String,
    pub message: String,
}

impl FlashMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message_type: "error".to_string(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message_type: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message_type: "info".to_string(),
            message: message.into(),
        }
    }

    pub fn to_cookie_value(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parses the URL-encoded JSON written by [`FlashMessage::to_set_cookie_header`].
    pub fn from_cookie_value(value: &str) -> Option<Self> {
        let decoded = urlencoding::decode(value).ok()?;
        serde_json::from_str(&decoded).ok()
    }

    /// Reads the flash message sent with a request, if any.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        CookieJar::from_headers(headers)
            .get(FLASH_COOKIE)
            .and_then(|cookie| Self::from_cookie_value(cookie.value()))
    }

    /// Set-Cookie value for the message; expires after 60 seconds if never shown.
    pub fn to_set_cookie_header(&self) -> String {
        let encoded = urlencoding::encode(&self.to_cookie_value()).into_owned();
        format!("{FLASH_COOKIE}={encoded}; Path=/; HttpOnly; SameSite=Lax; Max-Age=60")
    }
}

/// Set-Cookie value that removes a shown flash message.
pub fn clear_flash_header() -> String {
    format!("{FLASH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Create a redirect response with a flash message cookie.
pub fn redirect_with_flash(url: &str, flash: FlashMessage) -> Response {
    let cookie_header = flash.to_set_cookie_header();

    ([(SET_COOKIE, cookie_header)], Redirect::to(url)).into_response()
}
