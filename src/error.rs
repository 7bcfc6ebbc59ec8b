use thiserror::Error;

use crate::registry::CallbackSlot;
use crate::retcode::RetCode;

#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("Failed to install {slot} callback (ret: {code})")]
    Registration { slot: CallbackSlot, code: RetCode },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DiagnosticsError {
    /// The slot whose installation failed, if this is a registration error.
    #[must_use]
    pub fn slot(&self) -> Option<CallbackSlot> {
        match self {
            Self::Registration { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

pub type Result<T, E = DiagnosticsError> = std::result::Result<T, E>;
