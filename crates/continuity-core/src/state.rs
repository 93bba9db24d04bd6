//! UI-agnostic conversation state types
//!
//! These are shared by every front end (the TUI, one-shot commands) and don't
//! depend on any specific UI framework.

use serde::{Deserialize, Serialize};

/// A single transcript entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Supporting knowledge the backend used. Only assistant replies carry it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            context: None,
        }
    }

    pub fn assistant(content: impl Into<String>, context: Option<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            context,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_has_no_context() {
        let msg = Message::user("printer offline");
        assert_eq!(msg.role, Role::User);
        assert!(msg.is_user());
        assert_eq!(msg.context, None);
    }

    #[test]
    fn test_assistant_keeps_empty_context_distinct_from_none() {
        let empty = Message::assistant("ok", Some(String::new()));
        let absent = Message::assistant("ok", None);
        assert_ne!(empty, absent);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
