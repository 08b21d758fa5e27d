//! Deployment, fixture import and generated development data.
//!
//! The pure parts (record shapes, generators) live in `fanzone_core::seed`;
//! this module performs the I/O against the repositories.

mod deploy;
mod fake;
mod import;

pub use deploy::insert_roles;
pub use fake::{generate, FakeCounts};
pub use import::{import_dir, Repositories};
