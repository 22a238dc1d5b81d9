use crate::client::QBittorrentClient;
use crate::error::QBittorrentError;

impl QBittorrentClient {
    /// Login to the qBittorrent WebUI
    /// POST /api/v2/auth/login
    ///
    /// On success the SID session cookie from the response is stored and
    /// attached to all subsequent requests.
    pub async fn login(&self, username: &str, password: &str) -> crate::Result<()> {
        let url = self.url("/auth/login");
        let params = [("username", username), ("password", password)];

        let response = self.client().post(&url).form(&params).send().await?;
        let status = response.status();

        // The SID arrives as a Set-Cookie header in "SID=xxx; path=/" form.
        if let Some(cookie) = response.headers().get(reqwest::header::SET_COOKIE) {
            if let Ok(cookie_str) = cookie.to_str() {
                if let Some(sid) = cookie_str
                    .split(';')
                    .next()
                    .and_then(|s| s.strip_prefix("SID="))
                {
                    self.set_sid(sid.to_string()).await;
                }
            }
        }

        let body = response.text().await.unwrap_or_default();

        if status.is_success() && body == "Ok." {
            tracing::debug!("Logged in to qBittorrent");
            Ok(())
        } else if body == "Fails." {
            Err(QBittorrentError::Auth("Invalid username or password".into()))
        } else {
            Err(QBittorrentError::Auth(format!(
                "Login failed: {} - {}",
                status.as_u16(),
                body
            )))
        }
    }
}
