//! Message value object - the unit exchanged with generators.

use serde::{Deserialize, Serialize};

/// A message in the conversation.
///
/// Immutable once created; the dispatcher receives the full ordered list
/// on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: Role,
    /// Message content.
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Returns true if this message is from the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

impl Role {
    /// Wire-format name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Returns the last user message in a conversation, if any.
pub fn last_user_message(messages: &[Message]) -> Option<&Message> {
    messages.iter().rev().find(|m| m.is_user())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(Message::system("be kind").role, Role::System);
        assert_eq!(Message::user("hello").role, Role::User);
        assert_eq!(Message::assistant("hi").role, Role::Assistant);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn last_user_message_skips_assistant_turns() {
        let messages = vec![
            Message::user("first"),
            Message::assistant("reply"),
            Message::user("second"),
            Message::assistant("another reply"),
        ];

        assert_eq!(last_user_message(&messages).unwrap().content, "second");
    }

    #[test]
    fn last_user_message_empty_is_none() {
        assert!(last_user_message(&[]).is_none());
        assert!(last_user_message(&[Message::assistant("hi")]).is_none());
    }
}
