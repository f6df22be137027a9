//! Conversation history store.
//!
//! An ordered, indexable log of committed turns. The orchestrator is the
//! sole writer of the slot it targets during a submission, but the store
//! itself does not serialize concurrent submissions; callers are expected
//! to keep at most one submission in flight (e.g. by disabling resubmission
//! while one runs).

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{ChatMessage, ContextItem, EditorDocument, MessageContent, Role};

/// A committed conversation turn. Identity is its index in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryTurn {
    pub message: ChatMessage,
    pub context_items: Vec<ContextItem>,
    /// The editor document this turn was submitted from, kept verbatim so
    /// the turn can be re-edited and resubmitted later.
    pub source_document: EditorDocument,
}

impl HistoryTurn {
    /// A provisional slot holding only the source document. Replaced by a
    /// complete turn on commit; an index never holds a partially written
    /// turn.
    pub fn provisional(document: &EditorDocument) -> Self {
        Self {
            message: ChatMessage {
                role: Role::User,
                content: MessageContent::Plain(String::new()),
            },
            context_items: Vec::new(),
            source_document: document.clone(),
        }
    }
}

/// Contract the orchestrator relies on from the history log.
///
/// Resubmission semantics: `begin_resubmission(index, _)` rewinds the log,
/// discarding the turn at `index` and everything after it; the superseded
/// tail is not preserved. Implementations that want undo must snapshot
/// before the call.
pub trait HistoryStore: Send + Sync {
    /// Mark a resubmission at `index` with the new source document.
    fn begin_resubmission(&self, index: usize, document: &EditorDocument);

    /// Mark a new trailing turn slot keyed by the document.
    fn begin_append(&self, document: &EditorDocument);

    /// Idempotent point write of a complete turn at `index`.
    fn write_turn(&self, index: usize, turn: HistoryTurn);

    /// Snapshot of the current full history.
    fn read_all(&self) -> Vec<HistoryTurn>;

    fn current_length(&self) -> usize;

    /// Record which earlier checkpoint a resubmission rewinds to.
    fn set_checkpoint(&self, checkpoint_index: usize);
}

#[derive(Default)]
struct HistoryState {
    turns: Vec<HistoryTurn>,
    checkpoint: Option<usize>,
}

/// In-memory history store.
#[derive(Default)]
pub struct InMemoryHistory {
    state: RwLock<HistoryState>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last checkpoint recorded by a resubmission, if any.
    pub fn checkpoint(&self) -> Option<usize> {
        self.state.read().expect("history lock poisoned").checkpoint
    }
}

impl HistoryStore for InMemoryHistory {
    fn begin_resubmission(&self, index: usize, document: &EditorDocument) {
        let mut state = self.state.write().expect("history lock poisoned");
        debug!(index, discarded = state.turns.len().saturating_sub(index), "resubmitting turn");
        state.turns.truncate(index);
        state.turns.push(HistoryTurn::provisional(document));
    }

    fn begin_append(&self, document: &EditorDocument) {
        let mut state = self.state.write().expect("history lock poisoned");
        debug!(index = state.turns.len(), "appending turn slot");
        state.turns.push(HistoryTurn::provisional(document));
    }

    fn write_turn(&self, index: usize, turn: HistoryTurn) {
        let mut state = self.state.write().expect("history lock poisoned");
        if index >= state.turns.len() {
            let document = turn.source_document.clone();
            state
                .turns
                .resize_with(index + 1, || HistoryTurn::provisional(&document));
        }
        state.turns[index] = turn;
    }

    fn read_all(&self) -> Vec<HistoryTurn> {
        self.state.read().expect("history lock poisoned").turns.clone()
    }

    fn current_length(&self) -> usize {
        self.state.read().expect("history lock poisoned").turns.len()
    }

    fn set_checkpoint(&self, checkpoint_index: usize) {
        let mut state = self.state.write().expect("history lock poisoned");
        state.checkpoint = Some(checkpoint_index);
    }
}
