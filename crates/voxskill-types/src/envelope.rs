//! Inbound request envelope sent by the voice platform.
//!
//! Mirrors the JSON shape the platform posts to a custom skill endpoint:
//! a `session` block (attributes echoed back from the previous turn, user
//! identity), a `context` block, and a `request` tagged by `type`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope version the platform currently sends.
pub const ENVELOPE_VERSION: &str = "1.0";

fn default_version() -> String {
    ENVELOPE_VERSION.to_string()
}

/// A complete inbound event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    pub request: Request,
}

impl RequestEnvelope {
    /// Wrap a request in an envelope with no session or context.
    pub fn new(request: Request) -> Self {
        Self {
            version: default_version(),
            session: None,
            context: None,
            request,
        }
    }

    /// Attach a session for the given user.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// The user identity for persistent attributes.
    ///
    /// Prefers the session user and falls back to `context.System.user`,
    /// which is the only source on out-of-session requests.
    pub fn user_id(&self) -> Option<&str> {
        self.session
            .as_ref()
            .map(|s| s.user.user_id.as_str())
            .or_else(|| {
                self.context
                    .as_ref()
                    .and_then(|c| c.system.user.as_ref())
                    .map(|u| u.user_id.as_str())
            })
    }

    /// Session attributes carried over from the previous turn.
    pub fn session_attributes(&self) -> Map<String, Value> {
        self.session
            .as_ref()
            .map(|s| s.attributes.clone())
            .unwrap_or_default()
    }
}

/// Conversation session block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    pub session_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Map<String, Value>,
    pub user: User,
}

impl Session {
    /// A fresh session with no carried attributes.
    pub fn new(session_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            new: true,
            session_id: session_id.into(),
            attributes: Map::new(),
            user: User {
                user_id: user_id.into(),
            },
        }
    }
}

/// The platform sends `"attributes": null` on some first turns.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "System")]
    pub system: SystemState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// The request body, tagged by its `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    LaunchRequest(LaunchRequest),
    IntentRequest(IntentRequest),
    SessionEndedRequest(SessionEndedRequest),
    /// Any request type this skill does not model (display, audio player, ...).
    #[serde(other)]
    Unknown,
}

impl Request {
    /// The wire name of the request type.
    pub fn request_type(&self) -> &'static str {
        match self {
            Request::LaunchRequest(_) => "LaunchRequest",
            Request::IntentRequest(_) => "IntentRequest",
            Request::SessionEndedRequest(_) => "SessionEndedRequest",
            Request::Unknown => "Unknown",
        }
    }

    pub fn locale(&self) -> Option<&str> {
        match self {
            Request::LaunchRequest(r) => r.locale.as_deref(),
            Request::IntentRequest(r) => r.locale.as_deref(),
            Request::SessionEndedRequest(r) => r.locale.as_deref(),
            Request::Unknown => None,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            Request::LaunchRequest(r) => Some(&r.request_id),
            Request::IntentRequest(r) => Some(&r.request_id),
            Request::SessionEndedRequest(r) => Some(&r.request_id),
            Request::Unknown => None,
        }
    }

    /// The intent name, for intent requests only.
    pub fn intent_name(&self) -> Option<&str> {
        match self {
            Request::IntentRequest(r) => Some(&r.intent.name),
            _ => None,
        }
    }

    /// Build a launch request in the given locale.
    pub fn launch(locale: &str) -> Self {
        Request::LaunchRequest(LaunchRequest {
            request_id: String::new(),
            timestamp: None,
            locale: Some(locale.to_string()),
        })
    }

    /// Build an intent request in the given locale with the given slots.
    pub fn intent(locale: &str, name: &str, slots: &[(&str, &str)]) -> Self {
        let slots = slots
            .iter()
            .map(|(slot, value)| {
                (
                    slot.to_string(),
                    Slot {
                        name: slot.to_string(),
                        value: Some(value.to_string()),
                    },
                )
            })
            .collect();

        Request::IntentRequest(IntentRequest {
            request_id: String::new(),
            timestamp: None,
            locale: Some(locale.to_string()),
            intent: Intent {
                name: name.to_string(),
                slots,
            },
        })
    }

    /// Build a session-ended request in the given locale.
    pub fn session_ended(locale: &str, reason: &str) -> Self {
        Request::SessionEndedRequest(SessionEndedRequest {
            request_id: String::new(),
            timestamp: None,
            locale: Some(locale.to_string()),
            reason: Some(reason.to_string()),
            error: None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub intent: Intent,
}

/// A recognized intent and its slot values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// The value of a slot, if the slot exists and was filled.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.get(name).and_then(|slot| slot.value.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// `USER_INITIATED`, `ERROR` or `EXCEEDED_MAX_REPROMPTS`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionEndedError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEndedError {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}
