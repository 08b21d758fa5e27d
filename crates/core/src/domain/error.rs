use thiserror::Error;

/// Errors raised when validating user-submitted records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Usernames must have only letters, numbers, dots or underscores")]
    InvalidUsername,
    #[error("Passwords must match")]
    PasswordMismatch,
    #[error("Comment cannot be empty")]
    EmptyComment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(ValidationError::Required("Name").to_string(), "Name is required");
        assert_eq!(
            ValidationError::TooLong {
                field: "Username",
                max: 64
            }
            .to_string(),
            "Username too long (max 64 characters)"
        );
        assert_eq!(
            ValidationError::EmptyComment.to_string(),
            "Comment cannot be empty"
        );
    }
}
