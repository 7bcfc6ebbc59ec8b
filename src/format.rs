//! Human-readable rendering of library diagnostics.
//!
//! The `render_*` functions are pure and return the full multi-line block for
//! one message. [`Formatter`] writes those blocks to a [`DiagnosticSink`]. The
//! text is meant for people; its layout is not a stable interface.

use std::fmt::Write as _;

use crate::handle::{ConnectionHandle, ContextHandle};
use crate::handler::DiagnosticHandler;
use crate::message::{ClientMessage, ContextMessage, ServerMessage};
use crate::retcode::RetCode;
use crate::sink::DiagnosticSink;

/// Render a context-level message.
///
/// ```text
/// CS-Library error: severity(S) layer(L) origin(O) number(N)
///     <message text>
/// Operating System Error: <os text>        (only when attached)
/// ```
#[must_use]
pub fn render_context_message(msg: &ContextMessage) -> String {
    let n = msg.msgnumber;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "CS-Library error: severity({}) layer({}) origin({}) number({})",
        n.severity(),
        n.layer(),
        n.origin(),
        n.number()
    );
    let _ = writeln!(out, "\t{}", msg.msgstring);
    if let Some(os) = msg.os_error() {
        let _ = writeln!(out, "Operating System Error: {os}");
    }
    out
}

/// Render a client-library error. Severity comes from the record itself, the
/// rest is decoded from the packed message number.
#[must_use]
pub fn render_client_message(msg: &ClientMessage) -> String {
    let n = msg.msgnumber;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Client Library error: severity({}) number({}) origin({}) layer({})",
        msg.severity,
        n.number(),
        n.origin(),
        n.layer()
    );
    let _ = writeln!(out, "\t{}", msg.msgstring);
    if let Some((osnumber, os)) = msg.os_error() {
        let _ = writeln!(out, "Operating system error number({osnumber}):");
        let _ = writeln!(out, "\t{os}");
    }
    out
}

#[must_use]
pub fn render_server_message(msg: &ServerMessage) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Server message: number({}) severity({}) state({}) line({})",
        msg.msgnumber, msg.severity, msg.state, msg.line
    );
    if let Some(server) = msg.server_name() {
        let _ = writeln!(out, "\tServer name: {server}");
    }
    if let Some(procedure) = msg.procedure() {
        let _ = writeln!(out, "\tProcedure name: {procedure}");
    }
    let _ = writeln!(out, "\t{}", msg.text);
    out
}

/// Handler that prints every message to a sink and always acknowledges.
#[derive(Debug, Clone)]
pub struct Formatter {
    sink: DiagnosticSink,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Formatter {
    #[must_use]
    pub fn new(sink: DiagnosticSink) -> Self {
        Self { sink }
    }

    #[must_use]
    pub fn stderr() -> Self {
        Self::new(DiagnosticSink::stderr())
    }

    #[must_use]
    pub fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }

    fn emit(&self, kind: &'static str, block: &str) -> RetCode {
        if let Err(err) = self.sink.write_block(block) {
            tracing::warn!(kind, error = %err, "failed to write diagnostic message");
        }
        RetCode::Succeed
    }
}

impl DiagnosticHandler for Formatter {
    fn context_message(&self, _ctx: &ContextHandle, msg: &ContextMessage) -> RetCode {
        self.emit("context", &render_context_message(msg))
    }

    fn client_message(
        &self,
        _ctx: &ContextHandle,
        _conn: Option<&ConnectionHandle>,
        msg: &ClientMessage,
    ) -> RetCode {
        self.emit("client", &render_client_message(msg))
    }

    fn server_message(
        &self,
        _ctx: &ContextHandle,
        _conn: Option<&ConnectionHandle>,
        msg: &ServerMessage,
    ) -> RetCode {
        self.emit("server", &render_server_message(msg))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::message::MsgNumber;

    struct BrokenPipe;

    impl io::Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn context_message_with_and_without_os_error() {
        let msg = ContextMessage::new(MsgNumber::pack(4, 1, 2, 9), "conversion failed");
        assert_eq!(
            render_context_message(&msg),
            "CS-Library error: severity(2) layer(4) origin(1) number(9)\n\tconversion failed\n"
        );

        let msg = msg.with_os_error("No such file or directory");
        let lines: Vec<_> = render_context_message(&msg).lines().map(str::to_owned).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "Operating System Error: No such file or directory");
    }

    #[test]
    fn write_failure_still_acknowledges() {
        let formatter = Formatter::new(DiagnosticSink::from_writer(BrokenPipe));
        let ctx = ContextHandle::from_raw(1);
        let msg = ServerMessage::new(1, 1, 1, 1, "lost");
        assert_eq!(formatter.server_message(&ctx, None, &msg), RetCode::Succeed);
    }
}
