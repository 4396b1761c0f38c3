/// Win32 style word mapping (host independent).
pub mod style_bits;

/// Ctrl+C handling for the console.
#[cfg(windows)]
pub mod ctrl_c;

/// `WindowSystem` and `ShellHierarchy` on top of Win32.
#[cfg(windows)]
pub mod desktop;

/// Top-level window enumeration.
#[cfg(windows)]
pub mod enumerate;

/// Window type wrapping a Win32 `HWND`.
#[cfg(windows)]
pub mod window;

#[cfg(windows)]
pub use desktop::Win32Desktop;
#[cfg(windows)]
pub use enumerate::{TopLevelWindows, snapshot};
#[cfg(windows)]
pub use window::Window;
