use std::sync::Arc;

use crate::handle::{ConnectionHandle, ContextHandle};
use crate::message::{ClientMessage, ContextMessage, ServerMessage};
use crate::retcode::RetCode;

/// The three callbacks the client library invokes when it has something to report.
///
/// The library may call these from any of its I/O threads, hence `Send + Sync`.
/// Records are borrowed for the duration of the call only. Implementations
/// should return [`RetCode::Succeed`]; refusing a message can disturb the
/// library's own error path.
pub trait DiagnosticHandler: Send + Sync {
    fn context_message(&self, ctx: &ContextHandle, msg: &ContextMessage) -> RetCode;

    fn client_message(
        &self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        msg: &ClientMessage,
    ) -> RetCode;

    fn server_message(
        &self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        msg: &ServerMessage,
    ) -> RetCode;
}

impl<H: DiagnosticHandler + ?Sized> DiagnosticHandler for Arc<H> {
    fn context_message(&self, ctx: &ContextHandle, msg: &ContextMessage) -> RetCode {
        (**self).context_message(ctx, msg)
    }

    fn client_message(
        &self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        msg: &ClientMessage,
    ) -> RetCode {
        (**self).client_message(ctx, conn, msg)
    }

    fn server_message(
        &self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        msg: &ServerMessage,
    ) -> RetCode {
        (**self).server_message(ctx, conn, msg)
    }
}

/// Deliver every message to two handlers, first `A` then `B`.
///
/// Acknowledges with the first non-success code, otherwise `Succeed`.
#[derive(Debug, Clone)]
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A, B> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

fn combine(a: RetCode, b: RetCode) -> RetCode {
    if a.is_success() { b } else { a }
}

impl<A: DiagnosticHandler, B: DiagnosticHandler> DiagnosticHandler for Tee<A, B> {
    fn context_message(&self, ctx: &ContextHandle, msg: &ContextMessage) -> RetCode {
        combine(
            self.first.context_message(ctx, msg),
            self.second.context_message(ctx, msg),
        )
    }

    fn client_message(
        &self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        msg: &ClientMessage,
    ) -> RetCode {
        combine(
            self.first.client_message(ctx, conn, msg),
            self.second.client_message(ctx, conn, msg),
        )
    }

    fn server_message(
        &self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        msg: &ServerMessage,
    ) -> RetCode {
        combine(
            self.first.server_message(ctx, conn, msg),
            self.second.server_message(ctx, conn, msg),
        )
    }
}
