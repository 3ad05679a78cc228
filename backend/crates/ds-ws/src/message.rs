use crate::{ClientIdentity, Result as WsErrorResult, WsError};

use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The `type` field of a wire message.
///
/// Unknown strings are kept verbatim so they can be forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    Update,
    UserJoined,
    UserLeft,
    Ping,
    Other(String),
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Update => "update",
            Self::UserJoined => "user_joined",
            Self::UserLeft => "user_left",
            Self::Ping => "ping",
            Self::Other(other) => other,
        }
    }

    /// Bounded label set for metrics; every unknown type collapses to "other".
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::UserJoined => "user_joined",
            Self::UserLeft => "user_left",
            Self::Ping => "ping",
            Self::Other(_) => "other",
        }
    }
}

impl From<String> for MessageType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "update" => Self::Update,
            "user_joined" => Self::UserJoined,
            "user_left" => Self::UserLeft,
            "ping" => Self::Ping,
            _ => Self::Other(value),
        }
    }
}

impl From<MessageType> for String {
    fn from(value: MessageType) -> Self {
        match value {
            MessageType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire message: `{"type": <string>, "data": <object>}`.
///
/// Key order inside `data` survives a decode/encode cycle, so a compact
/// message forwarded through a hub arrives byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    kind: MessageType,
    #[serde(default, deserialize_with = "null_as_empty")]
    data: Map<String, Value>,
}

impl Message {
    pub fn new(kind: MessageType, data: Map<String, Value>) -> Self {
        Self { kind, data }
    }

    /// Presence event sent to the other members when `identity` joins.
    pub fn user_joined(document_id: &str, identity: &ClientIdentity) -> Self {
        let mut data = Map::new();
        data.insert("document_id".into(), Value::from(document_id));
        data.insert("user_id".into(), Value::from(identity.user_id.as_str()));
        data.insert(
            "username".into(),
            Value::from(identity.display_name.as_str()),
        );
        data.insert("is_anonymous".into(), Value::from(identity.is_anonymous));
        Self::new(MessageType::UserJoined, data)
    }

    /// Presence event sent to the remaining members when `identity` leaves.
    pub fn user_left(document_id: &str, identity: &ClientIdentity) -> Self {
        let mut data = Map::new();
        data.insert("document_id".into(), Value::from(document_id));
        data.insert("user_id".into(), Value::from(identity.user_id.as_str()));
        data.insert(
            "username".into(),
            Value::from(identity.display_name.as_str()),
        );
        Self::new(MessageType::UserLeft, data)
    }

    pub fn kind(&self) -> &MessageType {
        &self.kind
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn is_heartbeat(&self) -> bool {
        self.kind == MessageType::Ping
    }

    /// Decode one text frame.
    #[track_caller]
    pub fn decode(raw: &str) -> WsErrorResult<Self> {
        serde_json::from_str(raw).map_err(|e| WsError::InvalidMessage {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    pub fn encode(&self) -> WsErrorResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}
