use thiserror::Error;

/// Top-level error type used across the entire workspace.
///
/// The page heuristics themselves never fail; only configuration loading,
/// fixture parsing and document mutation can produce one of these.
#[derive(Debug, Error)]
pub enum ReadbarError {
    #[error("config error: {0}")]
    Config(String),

    #[error("fixture error: {0}")]
    Fixture(String),

    #[error("document error: {0}")]
    Dom(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = ReadbarError> = std::result::Result<T, E>;
