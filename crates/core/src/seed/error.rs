use thiserror::Error;

/// Errors raised while reading seed fixtures.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
