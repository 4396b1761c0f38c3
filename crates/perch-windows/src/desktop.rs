use std::time::Duration;

use perch_core::{
    PerchError, PerchResult, PositionFlags, ShellHierarchy, WindowHandle, WindowStyleMask,
    WindowSystem, ZOrder,
};
use tracing::{debug, warn};

use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowExW, FindWindowW, GetForegroundWindow, HWND_NOTOPMOST, HWND_TOPMOST, LWA_ALPHA,
    SET_WINDOW_POS_FLAGS, SMTO_NORMAL, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE,
    SWP_NOZORDER, SWP_SHOWWINDOW, SendMessageTimeoutW, SetLayeredWindowAttributes, SetParent,
    SetWindowPos,
};
use windows::core::{HRESULT, HSTRING, PCWSTR};

use crate::enumerate::TopLevelWindows;
use crate::window::Window;

/// The live Win32 desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Desktop;

impl Win32Desktop {
    pub fn new() -> Self {
        Self
    }
}

fn hwnd(handle: WindowHandle) -> HWND {
    Window::from_handle(handle).hwnd()
}

fn valid(hwnd: HWND) -> Option<WindowHandle> {
    (!hwnd.is_invalid()).then(|| Window::new(hwnd).handle())
}

fn swp_flags(flags: PositionFlags) -> SET_WINDOW_POS_FLAGS {
    [
        (PositionFlags::NO_MOVE, SWP_NOMOVE),
        (PositionFlags::NO_RESIZE, SWP_NOSIZE),
        (PositionFlags::NO_Z_ORDER, SWP_NOZORDER),
        (PositionFlags::NO_ACTIVATE, SWP_NOACTIVATE),
        (PositionFlags::FRAME_CHANGED, SWP_FRAMECHANGED),
        (PositionFlags::SHOW, SWP_SHOWWINDOW),
    ]
    .into_iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .fold(SET_WINDOW_POS_FLAGS(0), |acc, (_, swp)| acc | swp)
}

impl WindowSystem for Win32Desktop {
    fn find_window_by_title(&self, title: &str) -> Option<WindowHandle> {
        // FindWindowW compares titles case-insensitively; the match must be exact.
        TopLevelWindows::new()
            .find(|w| w.title() == title)
            .map(|w| w.handle())
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        Window::from_handle(handle).is_alive()
    }

    fn extended_style(&self, handle: WindowHandle) -> PerchResult<WindowStyleMask> {
        let window = Window::from_handle(handle);
        if !window.is_alive() {
            return Err(PerchError::InvalidHandle { handle });
        }
        Ok(window.style_words().to_mask())
    }

    fn set_extended_style(&self, handle: WindowHandle, mask: WindowStyleMask) -> PerchResult<()> {
        let window = Window::from_handle(handle);
        if !window.is_alive() {
            return Err(PerchError::InvalidHandle { handle });
        }
        let current = window.style_words();
        window.set_style_words(current, current.with_mask(mask))
    }

    fn set_window_pos(
        &self,
        handle: WindowHandle,
        z_order: ZOrder,
        flags: PositionFlags,
    ) -> PerchResult<()> {
        let insert_after = match z_order {
            ZOrder::Unchanged => None,
            ZOrder::Topmost => Some(HWND_TOPMOST),
            ZOrder::NoTopmost => Some(HWND_NOTOPMOST),
        };
        // SAFETY: SetWindowPos validates the handle and fails for a dead one.
        unsafe { SetWindowPos(hwnd(handle), insert_after, 0, 0, 0, 0, swp_flags(flags)) }
            .map_err(|e| PerchError::os("SetWindowPos", e))
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        // SAFETY: GetForegroundWindow takes no arguments and returns a
        // null handle when no window has focus.
        valid(unsafe { GetForegroundWindow() })
    }

    fn is_window_visible(&self, handle: WindowHandle) -> bool {
        Window::from_handle(handle).is_visible()
    }

    fn window_title(&self, handle: WindowHandle) -> String {
        Window::from_handle(handle).title()
    }
}

impl ShellHierarchy for Win32Desktop {
    fn find_window_by_class(&self, class: &str) -> Option<WindowHandle> {
        let class = HSTRING::from(class);
        // SAFETY: both strings outlive the call; a null title matches any.
        unsafe { FindWindowW(&class, PCWSTR::null()) }
            .ok()
            .and_then(valid)
    }

    fn send_message_timeout(
        &self,
        target: WindowHandle,
        message: u32,
        wparam: usize,
        lparam: isize,
        timeout: Duration,
    ) -> bool {
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        let mut result = 0usize;
        // SAFETY: `result` outlives the call. The call returns 0 if the
        // target is dead, failed, or did not answer within `millis`.
        let handled = unsafe {
            SendMessageTimeoutW(
                hwnd(target),
                message,
                WPARAM(wparam),
                LPARAM(lparam),
                SMTO_NORMAL,
                millis,
                Some(&mut result as *mut usize),
            )
        };
        handled.0 != 0
    }

    fn top_level_windows(&self) -> Box<dyn Iterator<Item = WindowHandle> + '_> {
        Box::new(TopLevelWindows::new().map(|w| w.handle()))
    }

    fn class_name(&self, handle: WindowHandle) -> String {
        Window::from_handle(handle).class()
    }

    fn find_child_by_class(&self, parent: WindowHandle, class: &str) -> Option<WindowHandle> {
        let class = HSTRING::from(class);
        // SAFETY: searches only the direct children of `parent`.
        unsafe { FindWindowExW(Some(hwnd(parent)), None, &class, PCWSTR::null()) }
            .ok()
            .and_then(valid)
    }

    fn set_parent(&self, child: WindowHandle, parent: WindowHandle) -> bool {
        // SAFETY: SetParent validates both handles.
        match unsafe { SetParent(hwnd(child), Some(hwnd(parent))) } {
            Ok(_) => true,
            // A null previous parent with no last error is still success.
            Err(e) if e.code() == HRESULT(0) => {
                debug!(%child, "window had no previous parent");
                true
            }
            Err(e) => {
                warn!(%child, %parent, error = %e, "SetParent failed");
                false
            }
        }
    }

    fn set_opacity(&self, handle: WindowHandle, alpha: u8) -> PerchResult<()> {
        // SAFETY: fails unless the window carries WS_EX_LAYERED.
        unsafe { SetLayeredWindowAttributes(hwnd(handle), COLORREF(0), alpha, LWA_ALPHA) }
            .map_err(|e| PerchError::os("SetLayeredWindowAttributes", e))
    }
}
