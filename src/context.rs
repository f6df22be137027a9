//! Context gathering contract.
//!
//! Given the raw editor document and the turn's modifiers, a gatherer
//! produces the finalized message content plus any resolved context items
//! and selected code ranges. Retrieval backends (codebase search, file
//! providers, etc.) live behind this trait; the orchestrator only awaits it
//! and propagates its failure.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::content::{CodeSelection, ContextItem, EditorDocument, InputModifiers, MessageContent};

/// Everything context gathering resolves for one turn.
#[derive(Debug, Clone)]
pub struct GatheredContext {
    pub content: MessageContent,
    pub context_items: Vec<ContextItem>,
    pub selected_code: Vec<CodeSelection>,
}

/// Asynchronous context resolution. May take unbounded wall-clock time
/// (network or model calls) and may fail; timeouts are the implementation's
/// concern, not the orchestrator's.
#[async_trait]
pub trait ContextGatherer: Send + Sync {
    async fn gather(
        &self,
        document: &EditorDocument,
        modifiers: &InputModifiers,
        preamble: Option<&str>,
    ) -> Result<GatheredContext>;
}

/// Minimal gatherer that flattens the editor document's text nodes into
/// plain content, resolving no context items. Useful for tests and for
/// embedders that run without retrieval backends.
#[derive(Debug, Default)]
pub struct DocumentGatherer;

impl DocumentGatherer {
    fn collect_text(node: &serde_json::Value, out: &mut Vec<String>) {
        if let Some(text) = node.get("text").and_then(|t| t.as_str()) {
            if !text.is_empty() {
                out.push(text.to_string());
            }
        }
        if let Some(children) = node.get("content").and_then(|c| c.as_array()) {
            for child in children {
                Self::collect_text(child, out);
            }
        }
    }

    /// Flatten a rich-text document into the text of its nodes.
    pub fn flatten(document: &EditorDocument) -> String {
        if let Some(text) = document.as_str() {
            return text.to_string();
        }
        let mut segments = Vec::new();
        Self::collect_text(document, &mut segments);
        segments.join(" ")
    }
}

#[async_trait]
impl ContextGatherer for DocumentGatherer {
    async fn gather(
        &self,
        document: &EditorDocument,
        _modifiers: &InputModifiers,
        preamble: Option<&str>,
    ) -> Result<GatheredContext> {
        let body = Self::flatten(document);
        let content = match preamble {
            Some(preamble) if !preamble.is_empty() => {
                MessageContent::Plain(format!("{preamble}\n\n{body}"))
            }
            _ => MessageContent::Plain(body),
        };
        debug!(rendered_len = content.render().len(), "gathered document content");

        Ok(GatheredContext {
            content,
            context_items: Vec::new(),
            selected_code: Vec::new(),
        })
    }
}
