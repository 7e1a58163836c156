//! One-shot loading of the precipitation document array.
//!
//! The source is either a local JSON file or an `http(s)://` URL fetched with a
//! blocking client. Loading happens once, before the first render; any failure
//! here is fatal to the caller (no chart can be drawn without data).
//!
//! ```no_run
//! # use precip_compare::loader::{DataSource, load_dataset};
//! let ds = load_dataset(&DataSource::parse("cmip_california_precip.json"))?;
//! println!("{} records, years {:?}", ds.len(), ds.years());
//! # Ok::<(), precip_compare::ChartError>(())
//! ```

use crate::error::{ChartError, Result};
use crate::models::RawDocument;
use crate::reshape::Dataset;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Data file used when none is given.
pub const DEFAULT_DATA_FILE: &str = "cmip_california_precip.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` / `https://` → URL, anything else → file path.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        let lower = t.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(t.to_string())
        } else {
            DataSource::Path(PathBuf::from(t))
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Path(PathBuf::from(DEFAULT_DATA_FILE))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(p) => write!(f, "{}", p.display()),
            DataSource::Url(u) => f.write_str(u),
        }
    }
}

fn http_client(url: &str) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(Duration::from_secs(30)) // total request timeout
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .user_agent(concat!("precip_compare/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| ChartError::Http {
            url: url.to_string(),
            source,
        })
}

/// Parse a JSON array of documents.
pub fn parse_documents(json: &str) -> Result<Vec<RawDocument>> {
    Ok(serde_json::from_str(json)?)
}

/// Read the raw documents from `source`.
pub fn load_documents(source: &DataSource) -> Result<Vec<RawDocument>> {
    let body = match source {
        DataSource::Path(p) => std::fs::read_to_string(p).map_err(|source| ChartError::Io {
            path: p.display().to_string(),
            source,
        })?,
        DataSource::Url(u) => {
            let http_err = |source| ChartError::Http {
                url: u.clone(),
                source,
            };
            http_client(u)?
                .get(u)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text())
                .map_err(http_err)?
        }
    };
    let docs = parse_documents(&body)?;
    log::info!("loaded {} documents from {}", docs.len(), source);
    Ok(docs)
}

/// Read and flatten in one step.
pub fn load_dataset(source: &DataSource) -> Result<Dataset> {
    let docs = load_documents(source)?;
    Dataset::from_documents(&docs)
}
