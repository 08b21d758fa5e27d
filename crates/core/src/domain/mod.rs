mod error;
mod functions;
mod permission;
mod requests;
mod types;

pub use error::ValidationError;
pub use functions::{assign_role, avatar_hash, gravatar_url, normalize_email};
pub use permission::Permission;
pub use requests::{
    non_blank, validate_comment_body, validate_email, validate_password_pair, validate_username,
    NewComment, NewUser, NewsDraft, PlayerDraft, Registration, TeamDraft, UserUpdate,
};
pub use types::{AuthoredComment, Comment, News, Player, Role, StandardRole, Team, User};
