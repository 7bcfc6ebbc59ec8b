use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;

use crate::handle::{ConnectionHandle, ContextHandle};
use crate::handler::DiagnosticHandler;
use crate::message::{ClientMessage, ContextMessage, ServerMessage};
use crate::retcode::RetCode;

/// Severity above which a collected message counts as an error.
pub const DEFAULT_ERROR_SEVERITY: i32 = 10;

/// Which callback a record came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageKind {
    /// Context-level (common library) message.
    Cs,
    /// Client-library error.
    Client,
    /// Server message.
    Server,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessageKind::Cs => "cs",
            MessageKind::Client => "client",
            MessageKind::Server => "server",
        })
    }
}

/// An owned copy of one delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{text}")]
pub struct DiagnosticRecord {
    pub kind: MessageKind,
    pub code: i32,
    pub severity: Option<i32>,
    pub text: String,
}

impl DiagnosticRecord {
    /// Records without a severity are treated as errors.
    #[must_use]
    pub fn is_error(&self, threshold: i32) -> bool {
        self.severity.unwrap_or(i32::MAX) > threshold
    }
}

impl From<&ContextMessage> for DiagnosticRecord {
    fn from(msg: &ContextMessage) -> Self {
        Self {
            kind: MessageKind::Cs,
            code: msg.msgnumber.0,
            severity: Some(msg.msgnumber.severity()),
            text: msg.msgstring.trim_end().to_string(),
        }
    }
}

impl From<&ClientMessage> for DiagnosticRecord {
    fn from(msg: &ClientMessage) -> Self {
        Self {
            kind: MessageKind::Client,
            code: msg.msgnumber.0,
            severity: Some(msg.severity),
            text: msg.msgstring.trim_end().to_string(),
        }
    }
}

impl From<&ServerMessage> for DiagnosticRecord {
    fn from(msg: &ServerMessage) -> Self {
        Self {
            kind: MessageKind::Server,
            code: msg.msgnumber,
            severity: Some(msg.severity),
            text: msg.text.trim_end().to_string(),
        }
    }
}

type RecordFilter = Arc<dyn Fn(&DiagnosticRecord) -> bool + Send + Sync>;

/// Handler that queues messages instead of printing them, so the caller of a
/// failed library call can pick up what went wrong.
///
/// Clones share the same queue and the same filter slot, so a filter set
/// after installation applies to the installed handler too.
#[derive(Clone)]
pub struct MessageCollector {
    messages: Arc<Mutex<Vec<DiagnosticRecord>>>,
    filter: Arc<Mutex<Option<RecordFilter>>>,
    threshold: i32,
}

impl Default for MessageCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCollector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            filter: Arc::new(Mutex::new(None)),
            threshold: DEFAULT_ERROR_SEVERITY,
        }
    }

    /// Only queue records for which `filter` returns `true`.
    #[must_use]
    pub fn with_filter(
        self,
        filter: impl Fn(&DiagnosticRecord) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.set_filter(filter);
        self
    }

    /// Replace the filter for this collector and every clone of it.
    pub fn set_filter(
        &self,
        filter: impl Fn(&DiagnosticRecord) -> bool + Send + Sync + 'static,
    ) {
        *self.filter_slot() = Some(Arc::new(filter));
    }

    pub fn clear_filter(&self) {
        *self.filter_slot() = None;
    }

    #[must_use]
    pub fn with_error_severity(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn messages(&self) -> Vec<DiagnosticRecord> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The first queued record whose severity is above `threshold`.
    #[must_use]
    pub fn error_above(&self, threshold: i32) -> Option<DiagnosticRecord> {
        self.lock().iter().find(|r| r.is_error(threshold)).cloned()
    }

    /// [`MessageCollector::error_above`] with the collector's configured threshold.
    #[must_use]
    pub fn first_error(&self) -> Option<DiagnosticRecord> {
        self.error_above(self.threshold)
    }

    fn push(&self, record: DiagnosticRecord) -> RetCode {
        let filter = self.filter_slot().clone();
        if filter.is_none_or(|keep| keep(&record)) {
            self.lock().push(record);
        }
        RetCode::Succeed
    }

    fn filter_slot(&self) -> MutexGuard<'_, Option<RecordFilter>> {
        self.filter.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DiagnosticRecord>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for MessageCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCollector")
            .field("len", &self.len())
            .field("filtered", &self.filter_slot().is_some())
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl DiagnosticHandler for MessageCollector {
    fn context_message(&self, _ctx: &ContextHandle, msg: &ContextMessage) -> RetCode {
        self.push(msg.into())
    }

    fn client_message(
        &self,
        _ctx: &ContextHandle,
        _conn: Option<&ConnectionHandle>,
        msg: &ClientMessage,
    ) -> RetCode {
        self.push(msg.into())
    }

    fn server_message(
        &self,
        _ctx: &ContextHandle,
        _conn: Option<&ConnectionHandle>,
        msg: &ServerMessage,
    ) -> RetCode {
        self.push(msg.into())
    }
}
