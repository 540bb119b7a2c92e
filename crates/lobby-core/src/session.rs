//! Client-local session record.
//!
//! Plain get/set access with last-write-wins semantics. Nothing here is
//! validated or persisted; absent values are `None` and callers check them
//! before use.

use crate::protocol::Id;

/// Auth token, identity, and joined game for the running client.
#[derive(Debug, Clone, Default)]
pub struct Session {
    auth_token: Option<String>,
    user_id: Option<Id>,
    game_id: Option<Id>,
    api_base_url: String,
}

impl Session {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    pub fn user_id(&self) -> Option<&Id> {
        self.user_id.as_ref()
    }

    pub fn set_user_id(&mut self, id: Id) {
        self.user_id = Some(id);
    }

    pub fn game_id(&self) -> Option<&Id> {
        self.game_id.as_ref()
    }

    pub fn set_game_id(&mut self, id: Id) {
        self.game_id = Some(id);
    }

    pub fn clear_game_id(&mut self) {
        self.game_id = None;
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Full URL for an endpoint path such as `/games/get`.
    pub fn method_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }

    /// The `(game id, token)` pair to poll with, if both are set.
    pub fn poll_target(&self) -> Option<(&Id, &str)> {
        Some((self.game_id.as_ref()?, self.auth_token.as_deref()?))
    }
}
