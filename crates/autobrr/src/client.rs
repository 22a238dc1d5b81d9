use crate::error::AutobrrError;
use crate::models::{Indexer, SetEnabledRequest};

const API_TOKEN_HEADER: &str = "X-API-Token";

/// autobrr API client, authenticated via the X-API-Token header.
pub struct AutobrrClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AutobrrClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// List all configured indexers
    /// GET /api/indexer
    pub async fn list_indexers(&self) -> crate::Result<Vec<Indexer>> {
        let url = self.url("/indexer");

        let response = self
            .client
            .get(&url)
            .header(API_TOKEN_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AutobrrError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        let indexers = response.json::<Vec<Indexer>>().await?;
        Ok(indexers)
    }

    /// Toggle a single indexer's enabled flag
    /// PATCH /api/indexer/{id}/enabled
    pub async fn set_indexer_enabled(&self, id: i32, enabled: bool) -> crate::Result<()> {
        let url = self.url(&format!("/indexer/{}/enabled", id));

        let response = self
            .client
            .patch(&url)
            .header(API_TOKEN_HEADER, &self.api_key)
            .json(&SetEnabledRequest { enabled })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AutobrrError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        tracing::debug!(
            "Indexer {} {}",
            id,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }
}
