use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrometheusError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Prometheus API error ({status_code}): {message}")]
    Api { status_code: u16, message: String },

    #[error("Query failed: {0}")]
    Query(String),
}
