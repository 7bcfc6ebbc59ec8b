//! Diagnostic callbacks for CT-Library style database clients.
//!
//! The client library reports problems through three callback slots on a
//! context: context-level messages, client-library errors and server
//! messages. This crate provides handlers for those slots and a registrar
//! that installs them.
//!
//! ```rust
//! use ctlib_diagnostics::prelude::*;
//!
//! let mut table = CallbackTable::new();
//! let ctx = ContextHandle::from_raw(1);
//! let (sink, out) = DiagnosticSink::buffer();
//! install_handler(&mut table, &ctx, Formatter::new(sink)).unwrap();
//!
//! let msg = ServerMessage::new(17, 10, 1, 42, "Procedure failed").with_procedure("sp_foo");
//! table.dispatch_server_message(&ctx, None, &msg);
//! assert!(out.contents().contains("Procedure name: sp_foo"));
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod format;
pub mod handle;
pub mod handler;
pub mod message;
pub mod prelude;
pub mod registrar;
pub mod registry;
pub mod retcode;
pub mod sink;

pub use collector::{DiagnosticRecord, MessageCollector, MessageKind};
pub use config::{DiagnosticsOptions, DiagnosticsOptionsBuilder, OutputTarget};
pub use error::{DiagnosticsError, Result};
pub use format::Formatter;
pub use handle::{ConnectionHandle, ContextHandle};
pub use handler::{DiagnosticHandler, Tee};
pub use message::{ClientMessage, ContextMessage, MsgNumber, ServerMessage};
pub use registrar::{install_diagnostics, install_handler};
pub use registry::{CallbackHost, CallbackSlot, CallbackTable, ConnectionCallback};
pub use retcode::RetCode;
pub use sink::{DiagnosticSink, SharedBuffer};
