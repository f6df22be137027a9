//! Message content and chat data types shared across modules.
//!
//! The editor hands us an opaque rich-text document; everything downstream
//! works on [`MessageContent`], which is either a plain string or an ordered
//! list of typed parts. Moving these types here avoids circular dependencies
//! between the resolver, history, and orchestrator modules.

use serde::{Deserialize, Serialize};

/// Opaque rich-text editor document (e.g. a ProseMirror/tiptap JSON blob).
///
/// The orchestrator never inspects this beyond passing it to the context
/// gatherer and storing it alongside the committed turn.
pub type EditorDocument = serde_json::Value;

/// Turn-level input options, immutable once submitted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputModifiers {
    /// Whether codebase retrieval should contribute context items.
    pub use_codebase: bool,
    /// Skip all context gathering beyond the document itself.
    pub no_context: bool,
}

/// Chat participant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One typed part of a structured message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessagePart {
    Text {
        text: String,
    },
    Code {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Image {
        url: String,
    },
}

/// Finalized message content: a plain string or an ordered sequence of
/// typed parts. Serializes untagged to match the wire shape used by
/// model-facing message lists (string | part[]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Plain(String),
    Parts(Vec<MessagePart>),
}

impl MessageContent {
    /// The last textual segment of the content.
    ///
    /// For plain content this is the whole string. For structured content it
    /// is the text of the last `Text` part; non-text parts are ignored
    /// entirely. Empty string when no text part exists.
    pub fn last_text_segment(&self) -> &str {
        match self {
            MessageContent::Plain(text) => text,
            MessageContent::Parts(parts) => parts
                .iter()
                .rev()
                .find_map(|part| match part {
                    MessagePart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .unwrap_or(""),
        }
    }

    /// Render the content into a flat display string.
    ///
    /// Text parts are joined with newlines; code and image parts are
    /// dropped, matching the standard user-message rendering convention.
    pub fn render(&self) -> String {
        match self {
            MessageContent::Plain(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    MessagePart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// True when the rendered content would be empty.
    pub fn is_empty(&self) -> bool {
        match self {
            MessageContent::Plain(text) => text.is_empty(),
            MessageContent::Parts(parts) => !parts.iter().any(|part| match part {
                MessagePart::Text { text } => !text.is_empty(),
                _ => true,
            }),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Plain(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Plain(text)
    }
}

/// A single message in the model-facing conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// A resolved context item attached to a committed turn (file excerpt,
/// retrieval result, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    pub name: String,
    pub description: String,
    pub content: String,
}

/// A user-selected code range forwarded to the command streaming path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSelection {
    pub filepath: String,
    pub start_line: u32,
    pub end_line: u32,
    pub contents: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(parts: Vec<MessagePart>) -> MessageContent {
        MessageContent::Parts(parts)
    }

    #[test]
    fn test_last_text_segment_plain() {
        let content = MessageContent::from("hello world");
        assert_eq!(content.last_text_segment(), "hello world");
    }

    #[test]
    fn test_last_text_segment_skips_non_text_parts() {
        let content = parts(vec![
            MessagePart::Text {
                text: "first".to_string(),
            },
            MessagePart::Text {
                text: "/edit this".to_string(),
            },
            MessagePart::Image {
                url: "data:image/png;base64,xyz".to_string(),
            },
        ]);
        assert_eq!(content.last_text_segment(), "/edit this");
    }

    #[test]
    fn test_last_text_segment_empty_when_no_text_parts() {
        let content = parts(vec![MessagePart::Image {
            url: "https://example.com/a.png".to_string(),
        }]);
        assert_eq!(content.last_text_segment(), "");
    }

    #[test]
    fn test_render_joins_text_parts() {
        let content = parts(vec![
            MessagePart::Text {
                text: "look at".to_string(),
            },
            MessagePart::Image {
                url: "https://example.com/a.png".to_string(),
            },
            MessagePart::Text {
                text: "this".to_string(),
            },
        ]);
        assert_eq!(content.render(), "look at\nthis");
    }

    #[test]
    fn test_content_serializes_untagged() {
        let plain = MessageContent::from("hi");
        assert_eq!(serde_json::to_value(&plain).unwrap(), serde_json::json!("hi"));

        let structured = parts(vec![MessagePart::Text {
            text: "hi".to_string(),
        }]);
        assert_eq!(
            serde_json::to_value(&structured).unwrap(),
            serde_json::json!([{"type": "text", "text": "hi"}])
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(MessageContent::from("").is_empty());
        assert!(MessageContent::Parts(vec![]).is_empty());
        assert!(!MessageContent::from("x").is_empty());
    }
}
