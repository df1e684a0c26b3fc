use anyhow::{Context, Result};
use log::{debug, info};

use super::{SearchBackend, SearchForm};
use crate::{config::Config, models::Dataset};

#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSearchClient {
    pub fn new(endpoint: &str) -> HttpSearchClient {
        HttpSearchClient {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> HttpSearchClient {
        HttpSearchClient::new(&config.search_endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SearchBackend for HttpSearchClient {
    async fn search(&self, form: SearchForm) -> Result<Dataset> {
        info!("Submitting search to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form.into_multipart()?)
            .send()
            .await
            .with_context(|| format!("search request to {} failed", self.endpoint))?
            .error_for_status()
            .context("search endpoint rejected the request")?;

        let body = response
            .text()
            .await
            .context("failed to read search response")?;
        debug!("Search response: {} bytes", body.len());

        Dataset::from_json(&body).context("malformed search response")
    }
}
