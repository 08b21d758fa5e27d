//! Storage backends for the fanzone server.

pub mod sqlite;
