use thiserror::Error;

/// Errors raised when a requested page cannot be served.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("Page {page} is out of range")]
    OutOfRange { page: i64 },
}
