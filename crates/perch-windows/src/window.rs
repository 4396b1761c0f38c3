use perch_core::{PerchError, PerchResult, WindowHandle};

use windows::Win32::Foundation::{GetLastError, HWND, SetLastError, WIN32_ERROR};
use windows::Win32::UI::WindowsAndMessaging::{
    GWL_EXSTYLE, GWL_STYLE, GetWindowLongPtrW, GetWindowTextLengthW, GetWindowTextW, IsWindow,
    IsWindowVisible, RealGetWindowClassW, SetWindowLongPtrW, WINDOW_LONG_PTR_INDEX,
};

use crate::style_bits::StyleWords;

/// A window on the Windows platform, wrapping a Win32 `HWND`.
///
/// `HWND` is an opaque handle: a number that identifies a window to the OS.
/// This struct holds that handle and queries the OS lazily for metadata.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    pub fn from_handle(handle: WindowHandle) -> Self {
        Self {
            hwnd: HWND(handle.raw() as *mut _),
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub fn handle(&self) -> WindowHandle {
        WindowHandle::from_raw(self.hwnd.0 as usize)
    }

    pub fn is_alive(&self) -> bool {
        // SAFETY: IsWindow accepts any value and only reports whether it
        // names an existing window.
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }

    pub fn is_visible(&self) -> bool {
        // SAFETY: IsWindowVisible is a simple query that returns a BOOL.
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    /// Returns the window title, or an empty string if there is none.
    pub fn title(&self) -> String {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW read window text
        // without modifying state. Both return 0 for a dead handle.
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length <= 0 {
                return String::new();
            }

            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
        }
    }

    pub fn class(&self) -> String {
        // SAFETY: RealGetWindowClassW reads the window class name.
        // 256 is the maximum class name length in Win32.
        unsafe {
            let mut buffer = [0u16; 256];
            let length = RealGetWindowClassW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..length as usize])
        }
    }

    /// Reads the `GWL_STYLE` and `GWL_EXSTYLE` words.
    pub fn style_words(&self) -> StyleWords {
        // SAFETY: GetWindowLongPtrW only reads window memory.
        unsafe {
            StyleWords {
                style: GetWindowLongPtrW(self.hwnd, GWL_STYLE) as u32,
                ex_style: GetWindowLongPtrW(self.hwnd, GWL_EXSTYLE) as u32,
            }
        }
    }

    /// Writes whichever of the two style words differ from `current`.
    pub fn set_style_words(&self, current: StyleWords, new: StyleWords) -> PerchResult<()> {
        if new.style != current.style {
            self.set_long(GWL_STYLE, new.style, "SetWindowLongPtrW(GWL_STYLE)")?;
        }
        if new.ex_style != current.ex_style {
            self.set_long(GWL_EXSTYLE, new.ex_style, "SetWindowLongPtrW(GWL_EXSTYLE)")?;
        }
        Ok(())
    }

    fn set_long(
        &self,
        index: WINDOW_LONG_PTR_INDEX,
        value: u32,
        context: &'static str,
    ) -> PerchResult<()> {
        // SAFETY: the previous value is returned, and 0 is ambiguous, so the
        // last error is cleared first and checked afterwards.
        unsafe {
            SetLastError(WIN32_ERROR(0));
            let previous = SetWindowLongPtrW(self.hwnd, index, value as isize);
            if previous == 0 && GetLastError() != WIN32_ERROR(0) {
                return Err(PerchError::os(context, windows::core::Error::from_win32()));
            }
        }
        Ok(())
    }
}
