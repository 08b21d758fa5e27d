mod error;
mod functions;
mod traits;
mod types;
mod validation;

pub use error::AuthError;
pub use functions::{calculate_expiry, generate_session_id, is_session_expired, new_session};
pub use traits::{Result, SessionRepository};
pub use types::{Session, SessionId};
pub use validation::validate_return_to;
