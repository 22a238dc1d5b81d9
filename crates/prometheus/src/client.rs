use crate::error::PrometheusError;
use crate::models::{QueryResponse, Series};

/// Prometheus HTTP API client.
///
/// Only the instant-query endpoint with range-vector selectors is used:
/// `metric[<range>s]` returns, per matching series, every raw sample within
/// the trailing range.
pub struct PrometheusClient {
    base_url: String,
    client: reqwest::Client,
}

impl PrometheusClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// Run a range-vector query, `selector[<range_secs>s]`
    /// GET /api/v1/query
    pub async fn query_range_vector(
        &self,
        selector: &str,
        range_secs: u64,
    ) -> crate::Result<Vec<Series>> {
        let query = format!("{}[{}s]", selector, range_secs);
        let url = self.url("/query");

        let response = self
            .client
            .get(&url)
            .query(&[("query", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PrometheusError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response.json::<QueryResponse>().await?;

        if body.status != "success" {
            return Err(PrometheusError::Query(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let series = body
            .data
            .map(|data| {
                data.result
                    .into_iter()
                    .map(|r| r.into_series())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        tracing::debug!(
            "Query '{}' returned {} series",
            query,
            series.len()
        );

        Ok(series)
    }
}
