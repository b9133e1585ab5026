//! Album resolution and membership.

use serde::{Deserialize, Serialize};

use super::RemoteClient;
use crate::utils::errors::{AgentError, Result};

/// One album as returned by the server's listing route. The payload
/// carries more fields; only these two matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub id: String,
    #[serde(rename = "albumName")]
    pub album_name: String,
}

#[derive(Debug, Serialize)]
struct AddAssetsRequest<'a> {
    ids: [&'a str; 1],
}

impl RemoteClient {
    /// Fetch the operator's full album list in one request.
    pub async fn list_albums(&self) -> Result<Vec<Album>> {
        let resp = self
            .http
            .get(self.url("/api/albums"))
            .header("x-api-key", &self.api_key)
            .timeout(self.api_timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.json::<Vec<Album>>().await?)
    }

    /// Resolve an album name to its remote identifier.
    ///
    /// Exact, case-sensitive match; the server enforces name uniqueness,
    /// so the first match wins. The album must pre-exist: a miss aborts
    /// the run rather than auto-creating anything.
    pub async fn resolve_album(&self, name: &str) -> Result<String> {
        let albums = self.list_albums().await?;

        albums
            .into_iter()
            .find(|album| album.album_name == name)
            .map(|album| album.id)
            .ok_or_else(|| AgentError::AlbumNotFound(name.to_string()))
    }

    /// Add an asset to an album. Membership is a set union on the server,
    /// so repeating the call for an asset already present does not error.
    pub async fn add_to_album(&self, album_id: &str, asset_id: &str) -> Result<()> {
        self.http
            .put(self.url(&format!("/api/albums/{}/assets", album_id)))
            .header("x-api-key", &self.api_key)
            .json(&AddAssetsRequest { ids: [asset_id] })
            .timeout(self.api_timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
