//! Diagnostics sink.
//!
//! Bad input never interrupts the stream; instead the dispatcher records one
//! [`Diagnostic`] per dropped frame or unrecognized kind. The sink is
//! injectable so callers decide where these go:
//!
//! - [`TracingDiagnostics`] - `warn!` events under the `herald::diagnostics` target
//! - [`MemoryDiagnostics`] - keeps every record, for assertions

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::error::DecodeError;
use crate::event::EventKind;

/// Tracing target used by [`TracingDiagnostics`].
pub const DIAGNOSTICS_TARGET: &str = "herald::diagnostics";

/// A non-fatal problem observed on the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The frame was not well-formed JSON.
    MalformedFrame {
        /// The raw frame.
        frame: String,
        /// Parser message.
        reason: String,
    },
    /// The frame had no string `type` field.
    MissingKind {
        /// The raw frame.
        frame: String,
    },
    /// The kind was recognized but its body could not be read.
    InvalidBody {
        /// The recognized kind.
        kind: EventKind,
        /// The raw frame.
        frame: String,
        /// Deserializer message.
        reason: String,
    },
    /// The frame decoded but its kind is not known to this build.
    UnrecognizedKind {
        /// The wire tag as received.
        kind: String,
    },
}

impl Diagnostic {
    /// Builds the diagnostic for a frame the decoder rejected.
    pub fn rejected(frame: &str, error: &DecodeError) -> Self {
        match error {
            DecodeError::Malformed(source) => Self::MalformedFrame {
                frame: frame.to_owned(),
                reason: source.to_string(),
            },
            DecodeError::MissingKind => Self::MissingKind {
                frame: frame.to_owned(),
            },
            DecodeError::InvalidBody { kind, source } => Self::InvalidBody {
                kind: *kind,
                frame: frame.to_owned(),
                reason: source.to_string(),
            },
        }
    }

    /// Returns the raw frame, if this diagnostic carries one.
    pub fn frame(&self) -> Option<&str> {
        match self {
            Self::MalformedFrame { frame, .. }
            | Self::MissingKind { frame }
            | Self::InvalidBody { frame, .. } => Some(frame),
            Self::UnrecognizedKind { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedFrame { reason, .. } => write!(f, "malformed frame dropped: {reason}"),
            Self::MissingKind { .. } => f.write_str("frame without event type dropped"),
            Self::InvalidBody { kind, reason, .. } => {
                write!(f, "{kind} frame with invalid body dropped: {reason}")
            }
            Self::UnrecognizedKind { kind } => {
                write!(f, "unrecognized event kind '{kind}' ignored")
            }
        }
    }
}

/// Receives diagnostics from the dispatcher.
///
/// Implementations must not block and must not panic.
pub trait Diagnostics: Send + Sync {
    /// Records one diagnostic.
    fn record(&self, diagnostic: Diagnostic);
}

/// Shared handle to a diagnostics sink.
pub type BoxedDiagnostics = Arc<dyn Diagnostics>;

/// Emits each diagnostic as a `tracing` warning.
///
/// Frames are truncated to `preview_len` characters so a flood of large bad
/// frames does not flood the log.
#[derive(Debug, Clone, Copy)]
pub struct TracingDiagnostics {
    preview_len: usize,
}

impl TracingDiagnostics {
    /// Default number of frame characters included in a warning.
    pub const DEFAULT_PREVIEW_LEN: usize = 256;

    /// Creates a sink with the default preview length.
    pub const fn new() -> Self {
        Self {
            preview_len: Self::DEFAULT_PREVIEW_LEN,
        }
    }

    /// Sets how many frame characters are logged.
    pub const fn with_preview_len(mut self, preview_len: usize) -> Self {
        self.preview_len = preview_len;
        self
    }
}

impl Default for TracingDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics for TracingDiagnostics {
    fn record(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::MalformedFrame { frame, reason } => warn!(
                target: DIAGNOSTICS_TARGET,
                reason = %reason,
                frame = %preview(frame, self.preview_len),
                "Malformed frame dropped"
            ),
            Diagnostic::MissingKind { frame } => warn!(
                target: DIAGNOSTICS_TARGET,
                frame = %preview(frame, self.preview_len),
                "Invalid event received: no event type"
            ),
            Diagnostic::InvalidBody {
                kind,
                frame,
                reason,
            } => warn!(
                target: DIAGNOSTICS_TARGET,
                kind = %kind,
                reason = %reason,
                frame = %preview(frame, self.preview_len),
                "Event body rejected"
            ),
            Diagnostic::UnrecognizedKind { kind } => warn!(
                target: DIAGNOSTICS_TARGET,
                kind = %kind,
                "Unrecognized event kind ignored"
            ),
        }
    }
}

/// Cuts `frame` after `max_chars` characters, on a char boundary.
fn preview(frame: &str, max_chars: usize) -> Cow<'_, str> {
    match frame.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}… ({} bytes)", &frame[..cut], frame.len())),
        None => Cow::Borrowed(frame),
    }
}

/// Collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemoryDiagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    /// Drains and returns everything recorded so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn record(&self, diagnostic: Diagnostic) {
        self.records.lock().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    #[test]
    fn test_preview_keeps_short_frames() {
        assert_eq!(preview("abc", 8), "abc");
        assert_eq!(preview("abc", 3), "abc");
    }

    #[test]
    fn test_preview_cuts_on_char_boundary() {
        let cut = preview("ああああ", 2);
        assert!(cut.starts_with("ああ…"));
        assert!(cut.ends_with("(12 bytes)"));
    }

    #[test]
    fn test_rejected_maps_each_error() {
        let malformed = decode("not json").unwrap_err();
        assert!(matches!(
            Diagnostic::rejected("not json", &malformed),
            Diagnostic::MalformedFrame { ref frame, .. } if frame == "not json"
        ));

        let missing = decode("{}").unwrap_err();
        assert_eq!(
            Diagnostic::rejected("{}", &missing),
            Diagnostic::MissingKind {
                frame: "{}".to_string()
            }
        );

        let frame = r#"{"type":"USER_ONLINE","body":{}}"#;
        let invalid = decode(frame).unwrap_err();
        assert!(matches!(
            Diagnostic::rejected(frame, &invalid),
            Diagnostic::InvalidBody {
                kind: EventKind::UserOnline,
                ..
            }
        ));
    }

    #[test]
    fn test_memory_sink_take_drains() {
        let sink = MemoryDiagnostics::new();
        sink.record(Diagnostic::UnrecognizedKind {
            kind: "X".to_string(),
        });
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_display_names_kind() {
        let diagnostic = Diagnostic::UnrecognizedKind {
            kind: "NOT_A_REAL_KIND".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "unrecognized event kind 'NOT_A_REAL_KIND' ignored"
        );
        assert_eq!(diagnostic.frame(), None);
    }
}
