use async_trait::async_trait;
use serde_json::Value;
use url::{ParseError, Url};

use super::{SourceClient, SourceClientError, SourceClientResult};

pub struct ReqwestSourceClient {
    base_url: Option<Url>,
    pub client: reqwest::Client,
}

impl ReqwestSourceClient {
    pub fn new(base_url: Option<&str>) -> anyhow::Result<Self> {
        let base_url = base_url.map(Url::parse).transpose()?;

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    /// Absolute sources are used as is, relative ones are joined onto the base URL.
    fn resolve(&self, source: &str) -> SourceClientResult<Url> {
        let resolved = match (Url::parse(source), &self.base_url) {
            (Err(ParseError::RelativeUrlWithoutBase), Some(base_url)) => base_url.join(source),
            (parsed, _) => parsed,
        };

        resolved.map_err(|err| SourceClientError::InvalidSource {
            source_path: source.to_string(),
            err,
        })
    }
}

#[async_trait]
impl SourceClient for ReqwestSourceClient {
    async fn fetch_items(&self, source: &str) -> SourceClientResult<Vec<Value>> {
        let url = self.resolve(source)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceClientError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let items = serde_json::from_str::<Vec<Value>>(&body)?;

        Ok(items)
    }
}
