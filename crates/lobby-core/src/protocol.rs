//! Wire types and endpoint table for the lobby HTTP API.
//!
//! Every call is a `GET` with query parameters. Response bodies are plain JSON
//! values: a bare token or id for the mutating calls, an object for
//! `getMe` and `games/get`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Either shape the server uses for scalar values.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Int(i64),
    Str(String),
}

impl From<RawScalar> for String {
    fn from(raw: RawScalar) -> Self {
        match raw {
            RawScalar::Int(n) => n.to_string(),
            RawScalar::Str(s) => s,
        }
    }
}

/// A player or game identifier.
///
/// The server sends ids as JSON numbers or strings depending on the
/// endpoint. Both normalize to the same string form, so `7` and `"7"`
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawScalar", into = "String")]
pub struct Id(String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RawScalar> for Id {
    fn from(raw: RawScalar) -> Self {
        Self(raw.into())
    }
}

impl From<Id> for String {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Game status label as sent by the server (a name or a numeric code).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawScalar", into = "String")]
pub struct GameStatus(String);

impl GameStatus {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RawScalar> for GameStatus {
    fn from(raw: RawScalar) -> Self {
        Self(raw.into())
    }
}

impl From<GameStatus> for String {
    fn from(status: GameStatus) -> Self {
        status.0
    }
}

impl From<&str> for GameStatus {
    fn from(status: &str) -> Self {
        Self(status.to_string())
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single card in a player's hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    pub text: String,
}

/// A seated player as reported by `games/get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Empty until the game has dealt; the server sends `null` before that.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hand: Vec<CardInfo>,
}

/// Server-authoritative snapshot of a game room.
///
/// The client never mutates this; each poll replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: Id,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<PlayerInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: GameStatus,
    #[serde(default)]
    pub host_id: Option<Id>,
}

/// Body of `players/getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Me {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// One call against the lobby API, with its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Register { name: String },
    FetchSelf { auth_token: String },
    CreateGame { auth_token: String },
    JoinGame { id: Id, auth_token: String },
    LeaveGame { auth_token: String },
    StartGame { auth_token: String },
    FetchState { id: Id, auth_token: String },
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Register { .. } => "/players/add",
            Endpoint::FetchSelf { .. } => "/players/getMe",
            Endpoint::CreateGame { .. } => "/games/create",
            Endpoint::JoinGame { .. } => "/games/join",
            Endpoint::LeaveGame { .. } => "/games/leave",
            Endpoint::StartGame { .. } => "/games/start",
            Endpoint::FetchState { .. } => "/games/get",
        }
    }

    /// Query parameters, in the order the server documents them.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::Register { name } => vec![("name", name.clone())],
            Endpoint::FetchSelf { auth_token }
            | Endpoint::CreateGame { auth_token }
            | Endpoint::LeaveGame { auth_token }
            | Endpoint::StartGame { auth_token } => vec![("authToken", auth_token.clone())],
            Endpoint::JoinGame { id, auth_token } | Endpoint::FetchState { id, auth_token } => {
                vec![
                    ("id", id.as_str().to_string()),
                    ("authToken", auth_token.clone()),
                ]
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

/// A response body did not have the shape its endpoint promises.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty response body")]
    Empty,

    #[error("expected {expected}, got {found}")]
    Unexpected {
        expected: &'static str,
        found: &'static str,
    },

    #[error("malformed {expected}: {message}")]
    Malformed {
        expected: &'static str,
        message: String,
    },
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode a bare scalar body. A JSON string or number yields its text; a body
/// that is not JSON at all is taken verbatim.
fn decode_scalar(body: &str, expected: &'static str) -> Result<String, DecodeError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) => Ok(s),
        Ok(Value::Number(n)) => Ok(n.to_string()),
        Ok(other) => Err(DecodeError::Unexpected {
            expected,
            found: value_kind(&other),
        }),
        Err(_) => Ok(trimmed.to_string()),
    }
}

/// Decode the auth token returned by `players/add`.
pub fn decode_token(body: &str) -> Result<String, DecodeError> {
    decode_scalar(body, "token")
}

/// Decode the game id returned by `games/create`.
pub fn decode_id(body: &str) -> Result<Id, DecodeError> {
    decode_scalar(body, "id").map(Id)
}

fn decode_object<T: for<'de> Deserialize<'de>>(
    body: &str,
    expected: &'static str,
) -> Result<T, DecodeError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }
    serde_json::from_str(trimmed).map_err(|e| DecodeError::Malformed {
        expected,
        message: e.to_string(),
    })
}

/// Decode the body of `players/getMe`.
pub fn decode_me(body: &str) -> Result<Me, DecodeError> {
    decode_object(body, "player")
}

/// Decode the body of `games/get`.
pub fn decode_snapshot(body: &str) -> Result<GameSnapshot, DecodeError> {
    decode_object(body, "game state")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_compare_equal() {
        let a: Id = serde_json::from_str("7").unwrap();
        let b: Id = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "7");
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"7\"");
    }

    #[test]
    fn token_accepts_json_string_number_or_plain_text() {
        assert_eq!(decode_token("\"abc\"").unwrap(), "abc");
        assert_eq!(decode_token("12345").unwrap(), "12345");
        assert_eq!(decode_token("  plain-token \n").unwrap(), "plain-token");
    }

    #[test]
    fn token_rejects_objects_and_empty_bodies() {
        assert!(matches!(
            decode_token("{\"error\":\"nope\"}"),
            Err(DecodeError::Unexpected {
                found: "object",
                ..
            })
        ));
        assert!(matches!(decode_token("   "), Err(DecodeError::Empty)));
        assert!(decode_id("null").is_err());
    }

    #[test]
    fn snapshot_decodes_with_missing_optional_fields() {
        let snap = decode_snapshot(r#"{"id": 42, "status": "created"}"#).unwrap();
        assert_eq!(snap.id, Id::from("42"));
        assert!(snap.players.is_empty());
        assert_eq!(snap.status.as_str(), "created");
        assert_eq!(snap.host_id, None);
    }

    #[test]
    fn snapshot_decodes_players_and_hands() {
        let body = r#"{
            "id": "42",
            "players": [{"name": "Ann", "hand": [{"text": "A"}, {"text": "B"}]}, {"name": "Bob"}],
            "status": 1,
            "hostId": 7
        }"#;
        let snap = decode_snapshot(body).unwrap();
        assert_eq!(snap.players.len(), 2);
        assert_eq!(snap.players[0].hand[1].text, "B");
        assert!(snap.players[1].hand.is_empty());
        assert_eq!(snap.status.as_str(), "1");
        assert_eq!(snap.host_id, Some(Id::from("7")));
    }

    #[test]
    fn snapshot_treats_null_fields_as_empty() {
        let snap = decode_snapshot(
            r#"{"id":42,"players":[{"name":"Ann","hand":null}],"status":"created","hostId":7}"#,
        )
        .unwrap();
        assert_eq!(snap.players[0].name, "Ann");
        assert!(snap.players[0].hand.is_empty());

        let snap = decode_snapshot(r#"{"id":42,"players":null,"status":null,"hostId":null}"#)
            .unwrap();
        assert!(snap.players.is_empty());
        assert_eq!(snap.status.as_str(), "");
        assert_eq!(snap.host_id, None);
    }

    #[test]
    fn me_requires_an_id() {
        assert_eq!(decode_me(r#"{"id": 7}"#).unwrap().id, Id::from("7"));
        assert!(matches!(
            decode_me(r#"{"name": "Ann"}"#),
            Err(DecodeError::Malformed { .. })
        ));
    }

    #[test]
    fn endpoint_paths_and_queries() {
        let join = Endpoint::JoinGame {
            id: Id::from("42"),
            auth_token: "t".to_string(),
        };
        assert_eq!(join.path(), "/games/join");
        assert_eq!(
            join.query(),
            vec![("id", "42".to_string()), ("authToken", "t".to_string())]
        );

        let register = Endpoint::Register {
            name: "Ann".to_string(),
        };
        assert_eq!(register.path(), "/players/add");
        assert_eq!(register.query(), vec![("name", "Ann".to_string())]);
    }
}
