//! HTTP client for the remote shape store.

use super::{
    BoxFuture, LoginResponse, RemoteStore, ShapeRecord, StoredShape, SyncError, SyncResult,
};
use crate::config::{ConfigError, SyncConfig};
use reqwest::{Client, Response};
use url::Url;

/// Remote store reached over HTTP(S) with JSON bodies.
///
/// Endpoints:
/// - `POST {base}/api/Shape`
/// - `GET {base}/api/Shape/user/{id}`
/// - `GET {base}/api/User/login?<fields>`
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: Url,
}

impl HttpRemote {
    /// Create a client rooted at `base_url`.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Create a client from configuration.
    pub fn from_config(config: &SyncConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.base_url()?))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Log in with the given form fields and return the owner id.
    pub async fn login(&self, fields: &[(&str, &str)]) -> SyncResult<String> {
        let url = self.endpoint(&["api", "User", "login"])?;
        let response = self
            .client
            .get(url)
            .query(fields)
            .send()
            .await
            .map_err(transport)?;
        let info: LoginResponse = check_status(response)?
            .json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        log::info!("Logged in as {}", info.id);
        Ok(info.id)
    }

    fn endpoint(&self, segments: &[&str]) -> SyncResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::Transport(format!("Unusable base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn transport(error: reqwest::Error) -> SyncError {
    SyncError::Transport(error.to_string())
}

fn check_status(response: Response) -> SyncResult<Response> {
    let status = response.status();
    if !status.is_success() {
        log::debug!("{} responded with {}", response.url(), status);
        return Err(SyncError::Status(status.as_u16()));
    }
    Ok(response)
}

impl RemoteStore for HttpRemote {
    fn save_shape(&self, record: &ShapeRecord) -> BoxFuture<'_, SyncResult<()>> {
        let record = record.clone();
        Box::pin(async move {
            let url = self.endpoint(&["api", "Shape"])?;
            let response = self
                .client
                .post(url)
                .json(&record)
                .send()
                .await
                .map_err(transport)?;
            check_status(response)?;
            Ok(())
        })
    }

    fn load_shapes(&self, owner_id: &str) -> BoxFuture<'_, SyncResult<Vec<StoredShape>>> {
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let url = self.endpoint(&["api", "Shape", "user", &owner_id])?;
            let response = self.client.get(url).send().await.map_err(transport)?;
            check_status(response)?
                .json()
                .await
                .map_err(|e| SyncError::Decode(e.to_string()))
        })
    }
}
