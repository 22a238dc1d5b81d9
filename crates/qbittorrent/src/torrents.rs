use reqwest::multipart::Form;

use crate::client::QBittorrentClient;
use crate::error::QBittorrentError;
use crate::models::TorrentInfo;

impl QBittorrentClient {
    /// Get the torrent list, optionally filtered by category
    /// GET /api/v2/torrents/info
    pub async fn get_torrents(&self, category: Option<&str>) -> crate::Result<Vec<TorrentInfo>> {
        let url = self.url("/torrents/info");

        let mut request = self.client().get(&url);

        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }

        if let Some(sid) = self.get_sid().await {
            request = request.header(reqwest::header::COOKIE, format!("SID={}", sid));
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QBittorrentError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        let torrents = response.json::<Vec<TorrentInfo>>().await?;
        Ok(torrents)
    }

    /// Delete torrent(s), optionally with their downloaded files
    /// POST /api/v2/torrents/delete
    ///
    /// # Arguments
    /// * `hashes` - Torrent hashes
    /// * `delete_files` - Whether to also delete the files on disk
    pub async fn delete_torrents(&self, hashes: &[&str], delete_files: bool) -> crate::Result<()> {
        let url = self.url("/torrents/delete");

        let form = Form::new()
            .text("hashes", hashes.join("|"))
            .text("deleteFiles", delete_files.to_string());

        let mut request = self.client().post(&url).multipart(form);

        if let Some(sid) = self.get_sid().await {
            request = request.header(reqwest::header::COOKIE, format!("SID={}", sid));
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Set the force-start flag on torrent(s)
    /// POST /api/v2/torrents/setForceStart
    pub async fn set_force_start(&self, hashes: &[&str], enable: bool) -> crate::Result<()> {
        let url = self.url("/torrents/setForceStart");

        let form = Form::new()
            .text("hashes", hashes.join("|"))
            .text("value", enable.to_string());

        let mut request = self.client().post(&url).multipart(form);

        if let Some(sid) = self.get_sid().await {
            request = request.header(reqwest::header::COOKIE, format!("SID={}", sid));
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }
}
