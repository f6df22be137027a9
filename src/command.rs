//! Slash command resolution.
//!
//! Decides whether finalized message content invokes a named command.
//! Resolution runs on the content produced by context gathering, never on
//! the raw editor document, and a miss is a normal negative result rather
//! than an error.

use serde::{Deserialize, Serialize};

use crate::content::MessageContent;

/// Prefix character that introduces a command invocation.
pub const COMMAND_PREFIX: char = '/';

/// A named command from the session's configured command table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Resolve a command invocation from finalized message content.
///
/// Inspects only the last textual segment of `content`. When that segment
/// starts with `/` and its leading token names an entry in `table` (exact,
/// case-sensitive, first match in table order), returns the matched
/// descriptor together with the entire content rendered as a flat user
/// message string. An unknown token after `/` is ordinary text, not an
/// error.
pub fn resolve_command(
    content: &MessageContent,
    table: &[CommandDescriptor],
) -> Option<(CommandDescriptor, String)> {
    let last_text = content.last_text_segment();

    if !last_text.starts_with(COMMAND_PREFIX) {
        return None;
    }

    let token = last_text
        .split_whitespace()
        .next()
        .and_then(|token| token.strip_prefix(COMMAND_PREFIX))
        .unwrap_or("");

    let command = table.iter().find(|descriptor| descriptor.name == token)?;

    Some((command.clone(), content.render()))
}
