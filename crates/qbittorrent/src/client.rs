use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::QBittorrentError;

/// qBittorrent WebUI v2 API client.
///
/// Authentication uses the SID session cookie obtained from
/// `/auth/login`; the cookie is attached to every subsequent request.
pub struct QBittorrentClient {
    base_url: String,
    client: reqwest::Client,
    sid: Arc<RwLock<Option<String>>>,
}

impl QBittorrentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
            sid: Arc::new(RwLock::new(None)),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/api/v2{}", self.base_url, path)
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) async fn get_sid(&self) -> Option<String> {
        self.sid.read().await.clone()
    }

    pub(crate) async fn set_sid(&self, sid: String) {
        *self.sid.write().await = Some(sid);
    }

    pub async fn is_authenticated(&self) -> bool {
        self.sid.read().await.is_some()
    }

    /// Check a mutating endpoint's response, mapping non-success statuses
    /// into an API error.
    pub(crate) async fn handle_response(&self, response: reqwest::Response) -> crate::Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(QBittorrentError::Api {
                status_code: status.as_u16(),
                message,
            })
        }
    }
}
