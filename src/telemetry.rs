use std::sync::Arc;

use tracing::{error, warn};

/// Sink for reporting caught exceptions to whatever telemetry backend is
/// wired in. The `fatal` flag only tags the event; it never stops the UI.
pub trait ExceptionSink: Send + Sync {
    fn track_exception(&self, source: &str, error: &str, fatal: bool);
}

/// Default sink: structured log records via `tracing`.
#[derive(Debug, Default)]
pub struct LogSink;

impl ExceptionSink for LogSink {
    fn track_exception(&self, source: &str, error: &str, fatal: bool) {
        if fatal {
            error!(source, fatal, "tracked exception: {error}");
        } else {
            warn!(source, fatal, "tracked exception: {error}");
        }
    }
}

pub fn default_sink() -> Arc<dyn ExceptionSink> {
    Arc::new(LogSink)
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingSink;
    use super::*;

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingSink::default();
        sink.track_exception("reddit-0-0", "timeout", true);

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], ("reddit-0-0".to_string(), "timeout".to_string(), true));
    }

    #[test]
    fn log_sink_does_not_panic() {
        LogSink.track_exception("reddit-0-0", "boom", false);
    }
}
