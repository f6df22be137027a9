//! Per-session configuration.
//!
//! Everything the orchestrator needs from its environment is passed in
//! explicitly at construction time; there is no ambient global config
//! lookup.

use serde::{Deserialize, Serialize};

use crate::command::CommandDescriptor;

/// Configuration for one chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Model identifier forwarded with derived message lists.
    pub model: String,
    /// Optional system message prepended when deriving the model message
    /// list from history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
    /// Read-only table of named commands, matched by exact name. Names are
    /// expected to be unique; on duplicates the first entry wins.
    #[serde(default)]
    pub commands: Vec<CommandDescriptor>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: "default".to_string(),
            system_message: None,
            commands: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn with_commands(mut self, commands: Vec<CommandDescriptor>) -> Self {
        self.commands = commands;
        self
    }
}
