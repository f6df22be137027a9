//! chatflow - turn submission orchestration for interactive assistant chats.
//!
//! Takes a rich-text editor document plus input modifiers, turns them into a
//! durable history entry, decides whether the turn is a plain message or a
//! named command invocation, and hands off to the matching downstream
//! streaming path. Context retrieval, model streaming, and telemetry
//! transport are collaborators behind traits; this crate owns the
//! sequencing, checkpointing, resubmission, and dispatch selection.

pub mod command;
pub mod config;
pub mod content;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod messages;
pub mod orchestrator;
pub mod session;
pub mod telemetry;

pub use command::{resolve_command, CommandDescriptor};
pub use config::SessionConfig;
pub use content::{
    ChatMessage, CodeSelection, ContextItem, EditorDocument, InputModifiers, MessageContent,
    MessagePart, Role,
};
pub use context::{ContextGatherer, DocumentGatherer, GatheredContext};
pub use dispatch::{CommandStreamRequest, StreamDispatcher};
pub use error::{ErrorReporter, LogReporter, TurnError};
pub use history::{HistoryStore, HistoryTurn, InMemoryHistory};
pub use messages::construct_messages;
pub use orchestrator::TurnOrchestrator;
pub use session::{SessionData, SessionStore};
pub use telemetry::{is_telemetry_enabled, EventRecorder, EventSink, NoOpSink, TurnEvent};
