use std::sync::Arc;

use crate::error::{DiagnosticsError, Result};
use crate::format::Formatter;
use crate::handle::{ConnectionHandle, ContextHandle};
use crate::handler::DiagnosticHandler;
use crate::message::{ClientMessage, ContextMessage, ServerMessage};
use crate::registry::{CallbackHost, CallbackSlot, ConnectionCallback};
use crate::retcode::RetCode;

/// Install the standard-error formatters on `ctx`.
///
/// # Errors
///
/// See [`install_handler`].
pub fn install_diagnostics<H>(host: &mut H, ctx: &ContextHandle) -> Result<()>
where
    H: CallbackHost + ?Sized,
{
    install_handler(host, ctx, Formatter::stderr())
}

/// Install `handler` into the message, client-message and server-message
/// slots of `ctx`, in that order. Connection-level slots are set for all
/// connections of the context.
///
/// Stops at the first slot the host refuses; later slots are not touched.
/// Calling this again on the same context replaces the earlier handler.
///
/// # Errors
///
/// Returns `DiagnosticsError::Registration` naming the refused slot and the
/// host's return code.
pub fn install_handler<H, D>(host: &mut H, ctx: &ContextHandle, handler: D) -> Result<()>
where
    H: CallbackHost + ?Sized,
    D: DiagnosticHandler + 'static,
{
    let handler = Arc::new(handler);

    let h = Arc::clone(&handler);
    let ret = host.set_message_callback(
        ctx,
        Arc::new(move |ctx: &ContextHandle, msg: &ContextMessage| {
            h.context_message(ctx, msg)
        }),
    );
    check(CallbackSlot::Message, ret)?;

    let h = Arc::clone(&handler);
    let ret = host.set_callback(
        ctx,
        None,
        ConnectionCallback::ClientMessage(Arc::new(
            move |ctx: &ContextHandle, conn: Option<&ConnectionHandle>, msg: &ClientMessage| {
                h.client_message(ctx, conn, msg)
            },
        )),
    );
    check(CallbackSlot::ClientMessage, ret)?;

    let h = handler;
    let ret = host.set_callback(
        ctx,
        None,
        ConnectionCallback::ServerMessage(Arc::new(
            move |ctx: &ContextHandle, conn: Option<&ConnectionHandle>, msg: &ServerMessage| {
                h.server_message(ctx, conn, msg)
            },
        )),
    );
    check(CallbackSlot::ServerMessage, ret)
}

fn check(slot: CallbackSlot, code: RetCode) -> Result<()> {
    if code.is_success() {
        tracing::debug!(%slot, "installed diagnostic callback");
        Ok(())
    } else {
        tracing::error!(%slot, ret = %code, "diagnostic callback installation failed");
        Err(DiagnosticsError::Registration { slot, code })
    }
}
