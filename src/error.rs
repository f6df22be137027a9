//! Turn failure taxonomy and the error report side channel.
//!
//! A submission never propagates a failure to its caller: whatever step
//! fails, the envelope around the turn converts it into exactly one report
//! delivered through an injected [`ErrorReporter`].

use thiserror::Error;
use tracing::error;

/// Why a turn failed.
#[derive(Debug, Error)]
pub enum TurnError {
    /// Context gathering rejected; the turn was abandoned before any
    /// history commit.
    #[error("context gathering failed: {0}")]
    Context(#[source] anyhow::Error),

    /// A streaming collaborator failed to initiate. The committed history
    /// entry, if any, stays in the store as-is.
    #[error("stream dispatch failed: {0}")]
    Dispatch(#[source] anyhow::Error),
}

/// Side channel for surfacing turn failures to the user.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &TurnError);
}

/// Default reporter: logs the failure.
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, err: &TurnError) {
        error!("turn failed: {err}");
    }
}
