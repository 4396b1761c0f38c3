use std::fmt;

/// An opaque identifier for a native top-level window.
///
/// On Windows this is an `HWND`; on macOS it is the AppKit window number.
/// The value is a weak reference into OS-managed window state: holding it
/// does not keep the window alive, and it goes stale once the window is
/// destroyed. Equality is identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(usize);

impl WindowHandle {
    /// Wraps a raw platform handle value (pointer-sized integer).
    ///
    /// Only platform layers should call this. Everything else gets
    /// handles from the locator or from window enumeration.
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw platform handle value.
    pub const fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}
