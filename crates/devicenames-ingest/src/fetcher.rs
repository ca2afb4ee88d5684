//! HTTP download of the device catalog

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use reqwest::Client;
use tracing::info;

/// Downloads the catalog with a single GET, no retries.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: Client,
    url: String,
}

impl SourceFetcher {
    pub fn new(config: &IngestConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            url: config.source_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the whole response body. Any non-2xx status is an error.
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        info!(url = %self.url, "Downloading device catalog");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        info!(bytes = body.len(), "Downloaded device catalog");

        Ok(body.to_vec())
    }
}
