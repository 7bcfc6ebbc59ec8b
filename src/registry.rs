//! Callback slots and the library-side seam they are installed through.
//!
//! [`CallbackHost`] is what a binding to the real client library implements:
//! one entry point for the context-level message slot and one for the
//! connection-level slots. [`CallbackTable`] is a plain in-memory host. It
//! holds the slots as an explicit value, dispatches messages the way the
//! library would, and is what the tests drive.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::handle::{ConnectionHandle, ContextHandle};
use crate::message::{ClientMessage, ContextMessage, ServerMessage};
use crate::retcode::RetCode;

pub type ContextMessageCallback =
    Arc<dyn Fn(&ContextHandle, &ContextMessage) -> RetCode + Send + Sync>;

pub type ClientMessageCallback =
    Arc<dyn Fn(&ContextHandle, Option<&ConnectionHandle>, &ClientMessage) -> RetCode + Send + Sync>;

pub type ServerMessageCallback =
    Arc<dyn Fn(&ContextHandle, Option<&ConnectionHandle>, &ServerMessage) -> RetCode + Send + Sync>;

/// Fixed callback slots, in the order the registrar fills them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackSlot {
    /// `CS_MESSAGE_CB`, context-level messages.
    Message,
    /// `CS_CLIENTMSG_CB`, client-library errors.
    ClientMessage,
    /// `CS_SERVERMSG_CB`, server messages.
    ServerMessage,
}

impl CallbackSlot {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CallbackSlot::Message => "CS_MESSAGE_CB",
            CallbackSlot::ClientMessage => "CS_CLIENTMSG_CB",
            CallbackSlot::ServerMessage => "CS_SERVERMSG_CB",
        }
    }
}

impl fmt::Display for CallbackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A callback for one of the connection-level slots.
#[derive(Clone)]
pub enum ConnectionCallback {
    ClientMessage(ClientMessageCallback),
    ServerMessage(ServerMessageCallback),
}

impl ConnectionCallback {
    #[must_use]
    pub fn slot(&self) -> CallbackSlot {
        match self {
            ConnectionCallback::ClientMessage(_) => CallbackSlot::ClientMessage,
            ConnectionCallback::ServerMessage(_) => CallbackSlot::ServerMessage,
        }
    }
}

impl fmt::Debug for ConnectionCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionCallback").field(&self.slot()).finish()
    }
}

/// Entry points a client library exposes for installing callbacks.
///
/// Installing into a slot replaces whatever was there before.
pub trait CallbackHost {
    /// Set the context-level message callback.
    fn set_message_callback(
        &mut self,
        ctx: &ContextHandle,
        callback: ContextMessageCallback,
    ) -> RetCode;

    /// Set a connection-level callback. `conn = None` applies it to every
    /// connection of the context.
    fn set_callback(
        &mut self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        callback: ConnectionCallback,
    ) -> RetCode;
}

#[derive(Default, Clone)]
struct Slots {
    message: Option<ContextMessageCallback>,
    client: Option<ClientMessageCallback>,
    server: Option<ServerMessageCallback>,
}

impl Slots {
    fn is_set(&self, slot: CallbackSlot) -> bool {
        match slot {
            CallbackSlot::Message => self.message.is_some(),
            CallbackSlot::ClientMessage => self.client.is_some(),
            CallbackSlot::ServerMessage => self.server.is_some(),
        }
    }

    fn set(&mut self, callback: ConnectionCallback) {
        match callback {
            ConnectionCallback::ClientMessage(cb) => self.client = Some(cb),
            ConnectionCallback::ServerMessage(cb) => self.server = Some(cb),
        }
    }
}

/// In-memory callback slots for any number of contexts and connections.
///
/// Dispatch looks at the connection's own slot first and falls back to the
/// context-wide one. An empty slot yields [`RetCode::NoMsg`].
#[derive(Default, Clone)]
pub struct CallbackTable {
    contexts: HashMap<ContextHandle, Slots>,
    connections: HashMap<ConnectionHandle, Slots>,
}

impl CallbackTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `slot` is filled at the context level.
    #[must_use]
    pub fn is_installed(&self, ctx: &ContextHandle, slot: CallbackSlot) -> bool {
        self.contexts.get(ctx).is_some_and(|slots| slots.is_set(slot))
    }

    #[must_use]
    pub fn is_installed_on(&self, conn: &ConnectionHandle, slot: CallbackSlot) -> bool {
        self.connections
            .get(conn)
            .is_some_and(|slots| slots.is_set(slot))
    }

    /// Forget every slot belonging to `ctx` and its connections.
    pub fn drop_context(&mut self, ctx: &ContextHandle) {
        self.contexts.remove(ctx);
        self.connections.retain(|conn, _| conn.context() != ctx);
    }

    pub fn dispatch_context_message(&self, ctx: &ContextHandle, msg: &ContextMessage) -> RetCode {
        match self.contexts.get(ctx).and_then(|s| s.message.as_ref()) {
            Some(cb) => cb(ctx, msg),
            None => RetCode::NoMsg,
        }
    }

    pub fn dispatch_client_message(
        &self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        msg: &ClientMessage,
    ) -> RetCode {
        match self.resolve(ctx, conn, |s| s.client.as_ref()) {
            Some(cb) => cb(ctx, conn, msg),
            None => RetCode::NoMsg,
        }
    }

    pub fn dispatch_server_message(
        &self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        msg: &ServerMessage,
    ) -> RetCode {
        match self.resolve(ctx, conn, |s| s.server.as_ref()) {
            Some(cb) => cb(ctx, conn, msg),
            None => RetCode::NoMsg,
        }
    }

    fn resolve<'a, T>(
        &'a self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        pick: impl Fn(&'a Slots) -> Option<&'a T>,
    ) -> Option<&'a T> {
        conn.and_then(|conn| self.connections.get(conn))
            .and_then(&pick)
            .or_else(|| self.contexts.get(ctx).and_then(&pick))
    }
}

impl CallbackHost for CallbackTable {
    fn set_message_callback(
        &mut self,
        ctx: &ContextHandle,
        callback: ContextMessageCallback,
    ) -> RetCode {
        self.contexts.entry(ctx.clone()).or_default().message = Some(callback);
        RetCode::Succeed
    }

    fn set_callback(
        &mut self,
        ctx: &ContextHandle,
        conn: Option<&ConnectionHandle>,
        callback: ConnectionCallback,
    ) -> RetCode {
        match conn {
            None => self.contexts.entry(ctx.clone()).or_default().set(callback),
            Some(conn) if conn.context() == ctx => {
                self.connections.entry(conn.clone()).or_default().set(callback);
            }
            Some(_) => return RetCode::Fail,
        }
        RetCode::Succeed
    }
}

impl fmt::Debug for CallbackTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackTable")
            .field("contexts", &self.contexts.len())
            .field("connections", &self.connections.len())
            .finish()
    }
}
