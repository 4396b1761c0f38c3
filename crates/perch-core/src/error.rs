use std::time::Duration;

use thiserror::Error;

use crate::WindowHandle;
use crate::config::ConfigError;

/// Errors raised while turning a window into a desktop widget.
///
/// None of these are fatal to the host application. Setup logs the error
/// and leaves the window in its default presentation.
#[derive(Debug, Error)]
pub enum PerchError {
    #[error("no top-level window titled \"{title}\"")]
    WindowNotFound { title: String },

    #[error("window {handle} no longer exists")]
    InvalidHandle { handle: WindowHandle },

    #[error("desktop shell window of class {class} not found")]
    ShellNotFound { class: &'static str },

    #[error("failed to reparent {handle} onto {parent}")]
    ReparentFailed {
        handle: WindowHandle,
        parent: WindowHandle,
    },

    #[error("window was not reported ready within {waited:?}")]
    NotReady { waited: Duration },

    #[error("{context}: {message}")]
    Os {
        context: &'static str,
        message: String,
    },

    #[error("{operation} is not supported on this platform")]
    Unsupported { operation: &'static str },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PerchError {
    /// Wraps a platform error with a short description of the failed call.
    pub fn os(context: &'static str, error: impl std::fmt::Display) -> Self {
        Self::Os {
            context,
            message: error.to_string(),
        }
    }
}

pub type PerchResult<T> = Result<T, PerchError>;
