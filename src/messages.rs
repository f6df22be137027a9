//! Derivation of the model-facing message list from history.
//!
//! The list is always built from a fresh post-commit snapshot of the store
//! so it includes the turn that was just written, never a stale view.

use crate::config::SessionConfig;
use crate::content::ChatMessage;
use crate::history::HistoryTurn;

/// Build the ordered message list for a model call from the current
/// history snapshot.
///
/// Prepends the configured system message when present and skips
/// provisional slots whose content renders empty (a slot between
/// bookkeeping and commit, or one abandoned by an earlier failed turn).
pub fn construct_messages(history: &[HistoryTurn], config: &SessionConfig) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);

    if let Some(system) = &config.system_message {
        if !system.is_empty() {
            messages.push(ChatMessage::system(system.clone()));
        }
    }

    for turn in history {
        if turn.message.content.is_empty() {
            continue;
        }
        messages.push(turn.message.clone());
    }

    messages
}
