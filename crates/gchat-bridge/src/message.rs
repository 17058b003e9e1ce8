//! Bridge message decoding
//!
//! Messages arrive from the injected page script as JSON text. The transport
//! may hand us the object wrapped in one extra layer of JSON string encoding
//! (`"{\"type\":...}"`), so a string literal is unwrapped before the object
//! itself is parsed.

use gchat_core::TrayIconState;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A decoded message from the hosted page
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeMessage {
    Notification(NotificationMessage),
    Favicon { state: TrayIconState },
}

/// A web notification intercepted by the page script
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
    pub tag: Option<String>,
    pub silent: Option<bool>,
    pub icon_base64: Option<String>,
    pub icon_mime_type: Option<String>,
}

/// Why a payload could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing message type")]
    MissingType,

    #[error("unknown message type '{0}'")]
    UnknownType(String),

    #[error("invalid '{kind}' message: {source}")]
    InvalidShape {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown favicon state '{0}'")]
    UnknownFaviconState(String),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireMessage {
    Notification {
        title: String,
        #[serde(default)]
        options: WireOptions,
    },
    Favicon {
        state: String,
    },
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WireOptions {
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    silent: Option<bool>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    icon_base64: Option<String>,
    #[serde(default)]
    icon_mime_type: Option<String>,
}

impl BridgeMessage {
    /// Decode a raw payload received from the page.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let value = unwrap_transport(raw)?;
        if !value.is_object() {
            return Err(DecodeError::NotAnObject);
        }

        match WireMessage::deserialize(&value) {
            Ok(wire) => wire.try_into(),
            Err(err) => Err(classify_failure(&value, err)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BridgeMessage::Notification(_) => "notification",
            BridgeMessage::Favicon { .. } => "favicon",
        }
    }
}

impl TryFrom<WireMessage> for BridgeMessage {
    type Error = DecodeError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        match wire {
            WireMessage::Notification { title, options } => {
                Ok(BridgeMessage::Notification(NotificationMessage {
                    title,
                    body: options.body.unwrap_or_default(),
                    tag: options.tag.filter(|t| !t.is_empty()),
                    silent: options.silent,
                    icon_base64: options.icon_base64.filter(|s| !s.is_empty()),
                    icon_mime_type: options.icon_mime_type.filter(|s| !s.is_empty()),
                }))
            }
            WireMessage::Favicon { state } => state
                .parse::<TrayIconState>()
                .map(|state| BridgeMessage::Favicon { state })
                .map_err(|_| DecodeError::UnknownFaviconState(state)),
        }
    }
}

/// Strip the optional string-literal wrapping added by the transport.
fn unwrap_transport(raw: &str) -> Result<Value, DecodeError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::String(inner) => Ok(serde_json::from_str(&inner)?),
        value => Ok(value),
    }
}

/// Turn a failed tagged parse into a precise reason.
fn classify_failure(value: &Value, err: serde_json::Error) -> DecodeError {
    match value.get("type") {
        None | Some(Value::Null) => DecodeError::MissingType,
        Some(Value::String(kind)) if kind == "notification" || kind == "favicon" => {
            DecodeError::InvalidShape {
                kind: kind.clone(),
                source: err,
            }
        }
        Some(Value::String(kind)) => DecodeError::UnknownType(kind.clone()),
        Some(other) => DecodeError::UnknownType(other.to_string()),
    }
}
