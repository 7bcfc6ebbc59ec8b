//! Convenient imports for common functionality.
//!
//! This module re-exports the types and functions needed to install
//! diagnostics on a context and drive them.

pub use crate::collector::{DiagnosticRecord, MessageCollector, MessageKind};
pub use crate::config::{DiagnosticsOptions, OutputTarget};
pub use crate::error::DiagnosticsError;
pub use crate::format::{
    Formatter, render_client_message, render_context_message, render_server_message,
};
pub use crate::handle::{ConnectionHandle, ContextHandle};
pub use crate::handler::{DiagnosticHandler, Tee};
pub use crate::message::{ClientMessage, ContextMessage, MsgNumber, ServerMessage};
pub use crate::registrar::{install_diagnostics, install_handler};
pub use crate::registry::{CallbackHost, CallbackSlot, CallbackTable, ConnectionCallback};
pub use crate::retcode::RetCode;
pub use crate::sink::{DiagnosticSink, SharedBuffer};
