//! reqwest-backed [`LobbyApi`] implementation.

use lobby_core::transport::{LobbyApi, TransportError};

/// HTTP client for the lobby API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone, Default)]
pub struct NetClient {
    http: reqwest::Client,
}

impl NetClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LobbyApi for NetClient {
    async fn get(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<String, TransportError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))
    }
}
