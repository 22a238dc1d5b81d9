use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutobrrError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("autobrr API error ({status_code}): {message}")]
    Api { status_code: u16, message: String },

    #[error("No indexer named \"{0}\" is configured")]
    UnknownIndexer(String),
}
