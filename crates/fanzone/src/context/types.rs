//! Pure types for request-scoped context.

use fanzone_auth::FlashMessage;
use fanzone_core::domain::{Permission, User};

/// Request-scoped context available to all page handlers.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// The signed-in user, if any.
    pub user: Option<User>,
    /// Flash message set by the previous response.
    pub flash: Option<FlashMessage>,
    /// Whether the request reached us over HTTPS.
    pub secure: bool,
}

impl RequestContext {
    /// Anonymous visitors can do nothing.
    pub fn can(&self, permissions: Permission) -> bool {
        self.user.as_ref().is_some_and(|user| user.can(permissions))
    }

    pub fn is_administrator(&self) -> bool {
        self.can(Permission::ADMINISTER)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn username(&self) -> &str {
        self.user.as_ref().map(|u| u.username.as_str()).unwrap_or("")
    }

    /// Avatar of the signed-in user, empty for visitors.
    pub fn avatar(&self, size: u32) -> String {
        self.user
            .as_ref()
            .map(|user| user.gravatar(size, self.secure))
            .unwrap_or_default()
    }
}
