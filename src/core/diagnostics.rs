//! Diagnostic events for recovered failures.
//!
//! The engine and the gallery both recover from some failures instead of
//! returning an error (unknown style, undecodable image, corrupt storage).
//! Every such recovery is logged with `log::warn!` and, when a sink is
//! installed, also reported here so callers and tests can observe it.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A recovered failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A transform was requested for a style the catalog does not know.
    /// The identity recipe was applied.
    UnknownStyle {
        style_id: String,
    },
    /// A transform could not complete and the original image was returned.
    TransformFallback {
        style_id: String,
        reason: String,
    },
    /// The stored gallery could not be decoded and was treated as empty.
    StorageCorrupt {
        key: String,
        reason: String,
    },
    /// The storage port failed on read and the gallery was treated as empty.
    StorageUnavailable {
        key: String,
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownStyle { style_id } => {
                write!(f, "unknown style '{}', applied identity filter", style_id)
            }
            Diagnostic::TransformFallback { style_id, reason } => {
                write!(f, "transform '{}' returned original: {}", style_id, reason)
            }
            Diagnostic::StorageCorrupt { key, reason } => {
                write!(f, "gallery '{}' is corrupt, treating as empty: {}", key, reason)
            }
            Diagnostic::StorageUnavailable { key, reason } => {
                write!(f, "gallery '{}' could not be read, treating as empty: {}", key, reason)
            }
        }
    }
}

/// Callback type for diagnostics.
pub type DiagnosticCallback = dyn Fn(&Diagnostic) + Send + Sync;

/// Shared, cloneable handle to an optional diagnostic callback.
#[derive(Clone, Default)]
pub struct DiagnosticSink {
    callback: Option<Arc<DiagnosticCallback>>,
}

impl DiagnosticSink {
    /// A sink that only logs.
    pub fn none() -> Self {
        Self { callback: None }
    }

    /// A sink that forwards to `callback` after logging.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    /// Log and forward a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        if let Some(callback) = &self.callback {
            callback(&diagnostic);
        }
    }
}

impl fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// Collects diagnostics in memory.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    events: Arc<Mutex<Vec<Diagnostic>>>,
}

impl DiagnosticLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that appends to this log.
    pub fn sink(&self) -> DiagnosticSink {
        let events = Arc::clone(&self.events);
        DiagnosticSink::new(move |d| events.lock().push(d.clone()))
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_collects_events() {
        let log = DiagnosticLog::new();
        let sink = log.sink();
        assert!(log.is_empty());

        sink.emit(Diagnostic::UnknownStyle {
            style_id: "vapor".to_string(),
        });
        sink.clone().emit(Diagnostic::StorageCorrupt {
            key: "k".to_string(),
            reason: "eof".to_string(),
        });

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.events()[0],
            Diagnostic::UnknownStyle {
                style_id: "vapor".to_string()
            }
        );
    }

    #[test]
    fn test_silent_sink() {
        DiagnosticSink::none().emit(Diagnostic::UnknownStyle {
            style_id: "x".to_string(),
        });
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::TransformFallback {
            style_id: "anime".to_string(),
            reason: "Failed to decode image: eof".to_string(),
        };
        assert!(d.to_string().contains("returned original"));
    }
}
