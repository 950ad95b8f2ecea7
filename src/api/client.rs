pub mod reqwest_source_client;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub type SourceClientResult<T> = Result<T, SourceClientError>;

/// Display text of these errors is what callers see in `Error` messages.
#[derive(Error, Debug)]
pub enum SourceClientError {
    #[error("Invalid source \"{source_path}\": {err}")]
    InvalidSource {
        source_path: String,
        #[source]
        err: url::ParseError,
    },

    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait SourceClient: Send + Sync + 'static {
    /// Retrieves `source` and decodes the body as a JSON array.
    async fn fetch_items(&self, source: &str) -> SourceClientResult<Vec<Value>>;
}
