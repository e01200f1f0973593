//! Chat message assembly.
//!
//! The message sequence is fully determined by its three inputs:
//!
//! ```text
//! system     fixed mapping rules
//! user       example 1 "before"  ┐
//! assistant  example 1 "after"   ┘ × k loaded examples
//! user       document to convert
//! ```
//!
//! Documents are sent as compact JSON; with `preserve_order` enabled the
//! key order is the caller's.

use crate::error::ConvertError;
use crate::pipeline::examples::ExamplePair;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the `messages` array of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Build `[system, (user, assistant) × examples, user]`.
pub fn build_messages(
    system_prompt: &str,
    examples: &[ExamplePair],
    document: &Value,
) -> Result<Vec<ChatMessage>, ConvertError> {
    let mut messages = Vec::with_capacity(2 + 2 * examples.len());
    messages.push(ChatMessage::system(system_prompt));

    for example in examples {
        messages.push(ChatMessage::user(to_json(&example.before)?));
        messages.push(ChatMessage::assistant(to_json(&example.after)?));
    }

    messages.push(ChatMessage::user(to_json(document)?));
    Ok(messages)
}

fn to_json(value: &Value) -> Result<String, ConvertError> {
    serde_json::to_string(value)
        .map_err(|e| ConvertError::Internal(format!("Failed to serialise document: {e}")))
}
