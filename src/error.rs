//! Library error type.
//!
//! The binaries wrap these in `anyhow::Error`; inside the crate every fallible
//! operation returns `Result<T, ChartError>`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed data document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate record for model `{model}`, year {year}, month {month}")]
    DuplicateRecord {
        model: String,
        year: i32,
        month: &'static str,
    },

    #[error("dataset contains no years")]
    EmptyDataset,

    #[error("unrecognized color `{0}`")]
    Color(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("drawing backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
