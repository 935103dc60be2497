//! Build log sink.
//!
//! Every stage records timestamped notes and per-operation timings into a
//! [`LogSink`] handed to it by reference. The sink is observational only: a
//! build run against [`NullLog`] produces the same output as one run against
//! [`MemoryLog`].

use std::cell::RefCell;
use std::fmt;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Stage that produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogScope {
    Main,
    FileIo,
    CssFormat,
    HtmlFormat,
    Loader,
}

impl LogScope {
    pub fn label(self) -> &'static str {
        match self {
            LogScope::Main => "MAIN",
            LogScope::FileIo => "FILEIO",
            LogScope::CssFormat => "CSS_FORMAT",
            LogScope::HtmlFormat => "HTML_FORMAT",
            LogScope::Loader => "LOADER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Note {
        message: String,
        hints: Option<String>,
        /// Sub-step of a larger operation.
        child: bool,
    },
    Timing {
        operation: &'static str,
        elapsed_ns: u128,
    },
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub scope: LogScope,
    pub kind: EntryKind,
}

impl LogEntry {
    pub fn note(scope: LogScope, message: impl Into<String>) -> Self {
        Self::new(
            scope,
            EntryKind::Note {
                message: message.into(),
                hints: None,
                child: false,
            },
        )
    }

    pub fn child(scope: LogScope, message: impl Into<String>) -> Self {
        Self::new(
            scope,
            EntryKind::Note {
                message: message.into(),
                hints: None,
                child: true,
            },
        )
    }

    pub fn timing(scope: LogScope, operation: &'static str, elapsed_ns: u128) -> Self {
        Self::new(
            scope,
            EntryKind::Timing {
                operation,
                elapsed_ns,
            },
        )
    }

    /// Attach a hint to a note. No effect on timings.
    pub fn with_hints(mut self, value: impl Into<String>) -> Self {
        if let EntryKind::Note { hints, .. } = &mut self.kind {
            *hints = Some(value.into());
        }
        self
    }

    fn new(scope: LogScope, kind: EntryKind) -> Self {
        Self {
            timestamp: SystemTime::now(),
            scope,
            kind,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let since_epoch = self.timestamp.duration_since(UNIX_EPOCH).unwrap_or_default();
        write!(
            f,
            "[{}.{:09}] ",
            since_epoch.as_secs(),
            since_epoch.subsec_nanos()
        )?;

        match &self.kind {
            EntryKind::Note {
                message,
                hints,
                child,
            } => {
                let level = if *child { "child" } else { "main" };
                write!(f, "{}.{}: {}", self.scope.label(), level, message)?;
                if let Some(hints) = hints {
                    write!(f, " | hints: {}", hints)?;
                }
                Ok(())
            }
            EntryKind::Timing {
                operation,
                elapsed_ns,
            } => write!(
                f,
                " > Performance info for '{}': {} (nanoseconds)",
                operation, elapsed_ns
            ),
        }
    }
}

pub trait LogSink {
    fn record(&self, entry: LogEntry);
}

/// Ordered in-memory log, mirrored to `tracing` as entries arrive.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: RefCell<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Rendered lines in recording order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|e| e.to_string()).collect()
    }
}

impl LogSink for MemoryLog {
    fn record(&self, entry: LogEntry) {
        match &entry.kind {
            EntryKind::Note { message, hints, .. } => {
                tracing::debug!(scope = entry.scope.label(), hints = ?hints, "{}", message);
            }
            EntryKind::Timing {
                operation,
                elapsed_ns,
            } => {
                tracing::trace!(scope = entry.scope.label(), operation, elapsed_ns = *elapsed_ns as u64);
            }
        }
        self.entries.borrow_mut().push(entry);
    }
}

/// Discards everything. Used when logging is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl LogSink for NullLog {
    fn record(&self, _entry: LogEntry) {}
}

/// Records the elapsed time of an operation when dropped, whichever way the
/// operation exits.
pub struct Timed<'a> {
    sink: &'a dyn LogSink,
    scope: LogScope,
    operation: &'static str,
    start: Instant,
}

impl<'a> Timed<'a> {
    pub fn start(sink: &'a dyn LogSink, scope: LogScope, operation: &'static str) -> Self {
        Self {
            sink,
            scope,
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for Timed<'_> {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos();
        self.sink
            .record(LogEntry::timing(self.scope, self.operation, elapsed_ns));
    }
}
