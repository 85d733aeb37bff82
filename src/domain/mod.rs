//! Core vocabulary shared across nightshift modules.

mod tool;

pub use tool::ToolKind;

use serde::{Deserialize, Serialize};

/// Payload a host CLI writes to a stop hook's stdin.
///
/// Hosts evolve their payload shape independently of us, so every field is
/// optional and parsing tolerates garbage input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookPayload {
    /// Identifier of the session that just ended.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Path to the session transcript, when the host records one.
    #[serde(default)]
    pub transcript_path: Option<String>,

    /// Free-form context; Codex puts the working directory here.
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

impl HookPayload {
    /// Parse a payload from a reader, degrading to an empty payload when the
    /// input is missing or malformed. A hook must never abort because a host
    /// changed its payload shape.
    pub fn from_reader(reader: impl std::io::Read) -> Self {
        serde_json::from_reader(reader).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_parses_known_fields() {
        let input = r#"{"session_id": "abc", "transcript_path": "/tmp/t.jsonl"}"#;
        let payload = HookPayload::from_reader(input.as_bytes());
        assert_eq!(payload.session_id.as_deref(), Some("abc"));
        assert_eq!(payload.transcript_path.as_deref(), Some("/tmp/t.jsonl"));
        assert!(payload.context.is_none());
    }

    #[test]
    fn payload_tolerates_garbage() {
        let payload = HookPayload::from_reader("not json at all".as_bytes());
        assert!(payload.session_id.is_none());

        let payload = HookPayload::from_reader("".as_bytes());
        assert!(payload.session_id.is_none());
    }

    #[test]
    fn payload_ignores_unknown_fields() {
        let input = r#"{"session_id": "abc", "brand_new_field": {"nested": true}}"#;
        let payload = HookPayload::from_reader(input.as_bytes());
        assert_eq!(payload.session_id.as_deref(), Some("abc"));
    }
}
