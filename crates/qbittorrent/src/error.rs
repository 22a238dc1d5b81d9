use thiserror::Error;

#[derive(Debug, Error)]
pub enum QBittorrentError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("qBittorrent API error ({status_code}): {message}")]
    Api { status_code: u16, message: String },
}

impl QBittorrentError {
    /// Whether re-authenticating might resolve this error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::Auth(_) => true,
            Self::Api { status_code, .. } => *status_code == 401 || *status_code == 403,
            _ => false,
        }
    }
}
