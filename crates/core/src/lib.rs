//! Functional core for fanzone.
//!
//! Pure domain types and functions shared by the server and the auth crate.
//! Nothing in here performs I/O; storage and session persistence are
//! expressed as traits and implemented elsewhere.

#[cfg(feature = "auth")]
pub mod auth;
pub mod domain;
pub mod pagination;
pub mod seed;
pub mod storage;
