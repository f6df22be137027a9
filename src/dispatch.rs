//! Downstream streaming contracts.
//!
//! After a turn is committed, the orchestrator hands off to exactly one of
//! two streaming paths: normal model input, or a named command. Both are
//! opaque beyond their input shape; success or failure of the stream itself
//! is the implementation's concern once it has started.

use anyhow::Result;
use async_trait::async_trait;

use crate::command::CommandDescriptor;
use crate::content::{ChatMessage, CodeSelection, ContextItem};

/// Input to the command streaming path.
#[derive(Debug, Clone)]
pub struct CommandStreamRequest {
    /// Full model message list derived from the post-commit history.
    pub messages: Vec<ChatMessage>,
    /// The matched command.
    pub command: CommandDescriptor,
    /// The whole user message rendered flat, including the `/name` token.
    pub rendered_input: String,
    /// Index of the turn this command was invoked from.
    pub target_index: usize,
    /// Code ranges the user had selected at submission time.
    pub selected_code: Vec<CodeSelection>,
    /// Auxiliary context the command accumulates while it runs. Starts
    /// empty on every dispatch.
    pub context_items: Vec<ContextItem>,
}

/// The two streaming back-ends the orchestrator can dispatch to, plus the
/// per-turn transient state reset that precedes every submission.
#[async_trait]
pub trait StreamDispatcher: Send + Sync {
    /// Reset transient per-turn UI/progress state. Called exactly once per
    /// submission, before context gathering begins, regardless of outcome.
    fn reset_turn_state(&self);

    /// Stream a normal model response for the given message list.
    async fn stream_normal(&self, messages: Vec<ChatMessage>) -> Result<()>;

    /// Run a named command's streaming path.
    async fn stream_command(&self, request: CommandStreamRequest) -> Result<()>;
}
