//! Opaque handles owned by the client library.
//!
//! Nothing in this crate looks inside a handle. They are identity tokens the
//! library hands out and passes back into every callback.

use std::fmt;

/// Process-wide client library state.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContextHandle(u64);

/// One logical connection owned by a context.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ConnectionHandle {
    context: ContextHandle,
    id: u64,
}

impl ContextHandle {
    /// Wrap the library's own identifier for a context (typically its address).
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl ConnectionHandle {
    #[must_use]
    pub fn from_raw(context: &ContextHandle, raw: u64) -> Self {
        Self {
            context: context.clone(),
            id: raw,
        }
    }

    #[must_use]
    pub fn as_raw(&self) -> u64 {
        self.id
    }

    /// The context this connection was allocated from.
    #[must_use]
    pub fn context(&self) -> &ContextHandle {
        &self.context
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextHandle({:#x})", self.0)
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionHandle({:#x}/{:#x})", self.context.0, self.id)
    }
}
