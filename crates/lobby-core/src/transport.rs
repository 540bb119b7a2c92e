//! Transport abstraction for the lobby API.
//!
//! Decouples the controller from any specific HTTP stack. The production
//! implementation lives in `lobby-client` (reqwest); tests substitute an
//! in-memory fake.

use std::future::Future;

use thiserror::Error;

/// Errors that can occur while performing a request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, refused, timeout, body read).
    #[error("{0}")]
    Connection(String),

    /// The server answered with a non-success status.
    #[error("server returned status {code}")]
    Status { code: u16 },
}

/// Something that can perform a lobby `GET` and hand back the response body.
pub trait LobbyApi: Send + Sync + 'static {
    /// Issue `GET url?query` and return the body text of a 2xx response.
    fn get(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}
