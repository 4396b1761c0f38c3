//! Ctrl+C signal handler using `SetConsoleCtrlHandler`.

use std::sync::OnceLock;
use std::sync::mpsc::Sender;

use perch_core::{PerchError, PerchResult};
use windows::Win32::System::Console::{CTRL_C_EVENT, SetConsoleCtrlHandler};

/// Global sender, written once by `set_handler` and read by the callback.
static SENDER: OnceLock<Sender<()>> = OnceLock::new();

/// Registers a Ctrl+C handler that sends `()` on the given channel.
///
/// Only one handler can be registered per process.
pub fn set_handler(tx: Sender<()>) -> PerchResult<()> {
    SENDER.set(tx).map_err(|_| PerchError::Os {
        context: "SetConsoleCtrlHandler",
        message: "Ctrl+C handler already registered".into(),
    })?;

    // SAFETY: `handler` is a plain extern fn that only touches SENDER.
    unsafe { SetConsoleCtrlHandler(Some(handler), true) }
        .map_err(|e| PerchError::os("SetConsoleCtrlHandler", e))
}

unsafe extern "system" fn handler(ctrl_type: u32) -> windows::core::BOOL {
    if ctrl_type == CTRL_C_EVENT
        && let Some(tx) = SENDER.get()
    {
        let _ = tx.send(());
    }
    windows::core::BOOL(1)
}
