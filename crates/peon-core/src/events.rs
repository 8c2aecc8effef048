//! Incoming host events.
//!
//! The host hands over one JSON object per invocation. Only `type` and the
//! session id are read; everything else on the object is ignored.

use serde_json::Value;

/// Session id used when the event carries none.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Lifecycle events the classifier understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    SessionCreated,
    SessionIdle,
    SessionError,
    PermissionAsked,
    PermissionReplied,
    TuiPromptAppend,
    TuiCommandExecute,
}

impl EventType {
    /// Parse a wire name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let ty = match name {
            "session.created" => Self::SessionCreated,
            "session.idle" => Self::SessionIdle,
            "session.error" => Self::SessionError,
            "permission.asked" => Self::PermissionAsked,
            "permission.replied" => Self::PermissionReplied,
            "tui.prompt.append" => Self::TuiPromptAppend,
            "tui.command.execute" => Self::TuiCommandExecute,
            _ => return None,
        };
        Some(ty)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionCreated => "session.created",
            Self::SessionIdle => "session.idle",
            Self::SessionError => "session.error",
            Self::PermissionAsked => "permission.asked",
            Self::PermissionReplied => "permission.replied",
            Self::TuiPromptAppend => "tui.prompt.append",
            Self::TuiCommandExecute => "tui.command.execute",
        }
    }
}

/// One event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEvent {
    /// Raw `type` string, possibly unknown.
    pub kind: String,
    pub session_id: String,
}

impl HookEvent {
    pub fn new(kind: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            session_id: session_id.into(),
        }
    }

    /// Extract an event from an arbitrary JSON value.
    ///
    /// The session id is taken from `session.id`, then `sessionId`, then
    /// [`DEFAULT_SESSION_ID`]. Empty ids count as absent.
    pub fn from_value(value: &Value) -> Self {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let session_id = value
            .get("session")
            .and_then(|s| s.get("id"))
            .and_then(id_string)
            .or_else(|| value.get("sessionId").and_then(id_string))
            .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

        Self { kind, session_id }
    }

    pub fn event_type(&self) -> Option<EventType> {
        EventType::parse(&self.kind)
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
