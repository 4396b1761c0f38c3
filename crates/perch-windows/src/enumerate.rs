use perch_core::{PerchError, PerchResult};

use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{EnumWindows, GW_HWNDNEXT, GetTopWindow, GetWindow};
use windows::core::BOOL;

use crate::window::Window;

/// Upper bound on a single walk. `GetWindow` loops can cycle forever if
/// windows are destroyed and recreated mid-walk.
const MAX_WALK: usize = 16_384;

/// Lazily walks the top-level windows in z-order, topmost first.
///
/// Each step is one `GetWindow(GW_HWNDNEXT)` call, so a search that stops
/// early never touches the rest of the list.
pub struct TopLevelWindows {
    next: Option<HWND>,
    walked: usize,
}

impl TopLevelWindows {
    pub fn new() -> Self {
        // SAFETY: GetTopWindow(None) returns the top of the desktop's
        // child list, or an error if there are no windows.
        let first = unsafe { GetTopWindow(None) }.ok();
        Self {
            next: first.filter(|h| !h.is_invalid()),
            walked: 0,
        }
    }
}

impl Default for TopLevelWindows {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for TopLevelWindows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        let current = self.next.take()?;
        self.walked += 1;
        if self.walked < MAX_WALK {
            // SAFETY: GetWindow is a query; it fails once the end of the
            // list is reached or `current` was destroyed.
            self.next = unsafe { GetWindow(current, GW_HWNDNEXT) }
                .ok()
                .filter(|h| !h.is_invalid());
        }
        Some(Window::new(current))
    }
}

/// Collects every top-level window in one consistent pass.
///
/// Uses `EnumWindows`, which is immune to the list changing while it runs.
pub fn snapshot() -> PerchResult<Vec<Window>> {
    let mut windows: Vec<Window> = Vec::new();

    // SAFETY: EnumWindows calls our callback for each top-level window.
    // We pass a pointer to our Vec as LPARAM (user data). The callback
    // casts it back to &mut Vec<Window> to collect results. This is safe
    // because EnumWindows runs synchronously, so the Vec outlives the call.
    unsafe {
        EnumWindows(
            Some(collect_window),
            LPARAM(&mut windows as *mut _ as isize),
        )
        .map_err(|e| PerchError::os("EnumWindows", e))?;
    }

    Ok(windows)
}

/// Callback invoked by `EnumWindows` for each top-level window.
unsafe extern "system" fn collect_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is a pointer to our Vec<Window>, cast from snapshot().
    let windows = unsafe { &mut *(lparam.0 as *mut Vec<Window>) };
    windows.push(Window::new(hwnd));
    BOOL(1) // TRUE: continue enumerating
}
