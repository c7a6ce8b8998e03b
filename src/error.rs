use thiserror::Error;

/// Errors raised while acquiring or reshaping external data.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// The service never produced a usable response, even after backoff.
    #[error("request to {url} failed after {attempts} attempts")]
    Transient {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered, but the payload is not the shape we expect.
    /// Callers skip the offending record or pair rather than aborting.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// An input table lacks a column the pipeline needs.
    #[error("{file} is missing required column {column:?}")]
    MissingColumn { file: String, column: String },

    /// The configured endpoints cannot produce a valid request URL.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AcquireError>;
