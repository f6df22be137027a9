//! Instrumentation sink for turn lifecycle events.
//!
//! Events are fire-and-forget: emission is synchronous, non-blocking, and
//! never affects the turn's outcome. Implementations that ship events
//! somewhere swallow their own failures.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::debug;

/// Environment variable to disable non-essential event recording.
pub const DISABLE_TELEMETRY_ENV: &str = "CHATFLOW_DISABLE_TELEMETRY";

/// Check if event recording is enabled.
pub fn is_telemetry_enabled() -> bool {
    match std::env::var(DISABLE_TELEMETRY_ENV) {
        Ok(val) => {
            let val_lower = val.to_lowercase();
            // Disabled if set to "1", "true", "yes", "on"
            !matches!(val_lower.as_str(), "1" | "true" | "yes" | "on")
        }
        // Enabled by default if env var is not set
        Err(_) => true,
    }
}

/// Best-effort instrumentation sink.
///
/// `emit` must not block and must not fail from the caller's point of view.
pub trait EventSink: Send + Sync {
    fn emit(&self, name: &str, payload: serde_json::Value);
}

/// Sink that drops every event.
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn emit(&self, _name: &str, _payload: serde_json::Value) {}
}

/// A recorded turn lifecycle event.
#[derive(Debug, Clone)]
pub struct TurnEvent {
    pub name: String,
    pub payload: serde_json::Value,
    pub event_time: DateTime<Utc>,
}

/// In-memory recorder that buffers events until drained by an uploader.
#[derive(Clone)]
pub struct EventRecorder {
    events: Arc<RwLock<Vec<TurnEvent>>>,
    enabled: bool,
}

impl EventRecorder {
    pub fn new() -> Self {
        let enabled = is_telemetry_enabled();
        if !enabled {
            debug!("Event recording disabled via {}", DISABLE_TELEMETRY_ENV);
        }
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of buffered events.
    pub fn pending_count(&self) -> usize {
        self.events.read().expect("event buffer lock poisoned").len()
    }

    /// Take all buffered events, leaving the buffer empty.
    pub fn drain(&self) -> Vec<TurnEvent> {
        let mut events = self.events.write().expect("event buffer lock poisoned");
        std::mem::take(&mut *events)
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventRecorder {
    fn emit(&self, name: &str, payload: serde_json::Value) {
        if !self.enabled {
            return;
        }

        let event = TurnEvent {
            name: name.to_string(),
            payload,
            event_time: Utc::now(),
        };

        let mut events = self.events.write().expect("event buffer lock poisoned");
        events.push(event);
        debug!(name, pending = events.len(), "recorded event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvVarRestore {
        prev: Option<String>,
    }

    impl EnvVarRestore {
        fn new() -> Self {
            Self {
                prev: std::env::var(DISABLE_TELEMETRY_ENV).ok(),
            }
        }
    }

    impl Drop for EnvVarRestore {
        fn drop(&mut self) {
            match &self.prev {
                Some(value) => std::env::set_var(DISABLE_TELEMETRY_ENV, value),
                None => std::env::remove_var(DISABLE_TELEMETRY_ENV),
            }
        }
    }

    #[test]
    fn test_is_telemetry_enabled_default() {
        let _env_lock_guard = env_lock().lock().unwrap();
        let _env_restore = EnvVarRestore::new();
        std::env::remove_var(DISABLE_TELEMETRY_ENV);
        assert!(is_telemetry_enabled());
    }

    #[test]
    fn test_is_telemetry_disabled() {
        let _env_lock_guard = env_lock().lock().unwrap();
        let _env_restore = EnvVarRestore::new();
        for value in ["1", "true", "TRUE", "yes", "on"] {
            std::env::set_var(DISABLE_TELEMETRY_ENV, value);
            assert!(!is_telemetry_enabled(), "expected disabled for {value}");
        }
    }

    #[test]
    fn test_is_telemetry_enabled_with_other_values() {
        let _env_lock_guard = env_lock().lock().unwrap();
        let _env_restore = EnvVarRestore::new();
        for value in ["0", "false", "no"] {
            std::env::set_var(DISABLE_TELEMETRY_ENV, value);
            assert!(is_telemetry_enabled(), "expected enabled for {value}");
        }
    }

    #[test]
    fn test_recorder_disabled_drops_events() {
        let _env_lock_guard = env_lock().lock().unwrap();
        let _env_restore = EnvVarRestore::new();
        std::env::set_var(DISABLE_TELEMETRY_ENV, "1");

        let recorder = EventRecorder::new();
        assert!(!recorder.is_enabled());

        recorder.emit("user_input", serde_json::json!({}));
        assert_eq!(recorder.pending_count(), 0);
    }

    #[test]
    fn test_recorder_buffers_and_drains() {
        let _env_lock_guard = env_lock().lock().unwrap();
        let _env_restore = EnvVarRestore::new();
        std::env::remove_var(DISABLE_TELEMETRY_ENV);

        let recorder = EventRecorder::new();
        assert!(recorder.is_enabled());

        recorder.emit("user_input", serde_json::json!({ "turn": 0 }));
        recorder.emit("step_run", serde_json::json!({ "step_name": "summarize" }));
        assert_eq!(recorder.pending_count(), 2);

        let drained = recorder.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].name, "user_input");
        assert_eq!(drained[1].payload["step_name"], "summarize");
        assert_eq!(recorder.pending_count(), 0);
    }
}
