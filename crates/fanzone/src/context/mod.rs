//! Request-scoped context module.
//!
//! Provides the `RequestContext` extractor that bundles what every page
//! needs (visitor, pending flash message) next to the application-scoped
//! `AppState`.

mod extractor;
mod types;

pub use types::RequestContext;
