//! Turn submission orchestration.
//!
//! One submission runs as a single sequential async task: begin-turn
//! bookkeeping, context gathering, history commit, command resolution, and
//! dispatch to exactly one of the two streaming paths, in that order. The
//! whole sequence is wrapped so a failure at any step surfaces as exactly
//! one report through the error side channel and never as a panic or an
//! error return to the caller.
//!
//! The history store is shared mutable state; this orchestrator is the sole
//! writer of the slot it targets while it runs, but it does not serialize
//! concurrent submissions. Callers keep at most one submission in flight.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::command::resolve_command;
use crate::config::SessionConfig;
use crate::content::{ChatMessage, EditorDocument, InputModifiers, Role};
use crate::context::{ContextGatherer, GatheredContext};
use crate::dispatch::{CommandStreamRequest, StreamDispatcher};
use crate::error::{ErrorReporter, LogReporter, TurnError};
use crate::history::{HistoryStore, HistoryTurn};
use crate::messages::construct_messages;
use crate::telemetry::{EventSink, NoOpSink};

/// Sequences a user turn from editor document to streaming dispatch.
pub struct TurnOrchestrator {
    history: Arc<dyn HistoryStore>,
    gatherer: Arc<dyn ContextGatherer>,
    dispatcher: Arc<dyn StreamDispatcher>,
    events: Arc<dyn EventSink>,
    reporter: Arc<dyn ErrorReporter>,
    config: SessionConfig,
    session_id: String,
}

impl TurnOrchestrator {
    pub fn new(
        history: Arc<dyn HistoryStore>,
        gatherer: Arc<dyn ContextGatherer>,
        dispatcher: Arc<dyn StreamDispatcher>,
        config: SessionConfig,
    ) -> Self {
        Self {
            history,
            gatherer,
            dispatcher,
            events: Arc::new(NoOpSink),
            reporter: Arc::new(LogReporter),
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Attach an instrumentation sink. Emission is best-effort and never
    /// affects the turn's outcome.
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Replace the default logging error reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Submit one user turn.
    ///
    /// With `index` present the turn resubmits at that position, rewinding
    /// the history tail; otherwise it appends. Never returns an error:
    /// failures are caught by the envelope and delivered once through the
    /// configured [`ErrorReporter`].
    pub async fn submit_turn(
        &self,
        document: EditorDocument,
        modifiers: InputModifiers,
        index: Option<usize>,
        preamble: Option<String>,
    ) {
        if let Err(err) = self.run_turn(document, modifiers, index, preamble).await {
            self.reporter.report(&err);
        }
    }

    async fn run_turn(
        &self,
        document: EditorDocument,
        modifiers: InputModifiers,
        index: Option<usize>,
        preamble: Option<String>,
    ) -> Result<(), TurnError> {
        // Capture the target slot before any mutation so a length change
        // during gathering cannot shift where the commit lands.
        let input_index = index.unwrap_or_else(|| self.history.current_length());

        match index {
            Some(i) => self.history.begin_resubmission(i, &document),
            None => self.history.begin_append(&document),
        }

        // Once per turn, before gathering, regardless of outcome.
        self.dispatcher.reset_turn_state();

        if let Some(i) = index {
            self.history.set_checkpoint(i / 2);
        }

        debug!(index = input_index, "gathering context");
        let GatheredContext {
            content,
            context_items,
            selected_code,
        } = self
            .gatherer
            .gather(&document, &modifiers, preamble.as_deref())
            .await
            .map_err(TurnError::Context)?;

        self.history.write_turn(
            input_index,
            HistoryTurn {
                message: ChatMessage {
                    role: Role::User,
                    content: content.clone(),
                },
                context_items,
                source_document: document,
            },
        );

        // Re-read after the commit so the derived list includes this turn.
        let history = self.history.read_all();
        let messages = construct_messages(&history, &self.config);

        self.events.emit(
            "step_run",
            json!({ "step_name": "User Input", "session_id": self.session_id }),
        );
        self.events
            .emit("user_input", json!({ "session_id": self.session_id }));

        match resolve_command(&content, &self.config.commands) {
            None => {
                info!(index = input_index, "dispatching normal input");
                self.dispatcher
                    .stream_normal(messages)
                    .await
                    .map_err(TurnError::Dispatch)?;
            }
            Some((command, rendered_input)) => {
                info!(index = input_index, command = %command.name, "dispatching command");
                self.events.emit(
                    "step_run",
                    json!({ "step_name": command.name, "session_id": self.session_id }),
                );
                self.dispatcher
                    .stream_command(CommandStreamRequest {
                        messages,
                        command,
                        rendered_input,
                        target_index: input_index,
                        selected_code,
                        context_items: Vec::new(),
                    })
                    .await
                    .map_err(TurnError::Dispatch)?;
            }
        }

        Ok(())
    }
}
