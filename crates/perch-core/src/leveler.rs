//! Desktop placement for layered-compositor platforms (macOS).
//!
//! There is no window hierarchy to join there. Instead the widget gets a
//! window level just above the wallpaper, which keeps it under every
//! application window without any foreground arbitration.

use std::sync::Arc;

use tracing::{debug, info};

use crate::platform::{Appearance, CollectionBehavior, Compositor};
use crate::{PerchResult, WindowHandle};

/// `kCGMinimumWindowLevel`: five reserved levels above `kCGBaseWindowLevel`.
pub const MINIMUM_WINDOW_LEVEL: isize = i32::MIN as isize + 5;

/// `kCGDesktopWindowLevel`: the level the wallpaper is drawn at.
pub const DESKTOP_WINDOW_LEVEL: isize = MINIMUM_WINDOW_LEVEL + 20;

/// How far above the wallpaper the widget sits.
pub const WIDGET_LEVEL_OFFSET: isize = 20;

pub const WIDGET_LEVEL: isize = DESKTOP_WINDOW_LEVEL + WIDGET_LEVEL_OFFSET;

/// Puts the host application's first window on the desktop level.
pub struct WindowLeveler<C: Compositor + 'static> {
    compositor: Arc<C>,
}

impl<C: Compositor + 'static> WindowLeveler<C> {
    pub fn new(compositor: Arc<C>) -> Self {
        Self { compositor }
    }

    /// Applies the desktop level, marshaling onto the UI thread if needed.
    ///
    /// Returns immediately when called off the UI thread. The work then
    /// runs whenever the UI thread drains its queue.
    pub fn apply(&self) {
        if self.compositor.is_ui_thread() {
            apply_now(self.compositor.as_ref());
            return;
        }

        debug!("not on the UI thread; dispatching leveler");
        let compositor = Arc::clone(&self.compositor);
        self.compositor.dispatch_to_ui(Box::new(move || {
            apply_now(compositor.as_ref());
        }));
    }
}

/// Levels the first window of the host application.
///
/// Must run on the UI thread. Returns the window that was leveled, or
/// `None` if the application has no window yet.
pub fn apply_now<C: Compositor + ?Sized>(compositor: &C) -> Option<WindowHandle> {
    let Some(window) = compositor.first_window() else {
        info!("host application has no window; nothing to level");
        return None;
    };

    compositor.set_level(window, WIDGET_LEVEL);
    compositor.set_collection_behavior(window, CollectionBehavior::WIDGET);
    compositor.make_borderless(window);
    compositor.set_mouse_events(window, true, false);
    compositor.set_movable_by_background(window, false);
    compositor.set_appearance(window, Appearance::WIDGET);
    compositor.order_front_without_activation(window);

    info!(%window, level = WIDGET_LEVEL, "leveled widget onto the desktop");
    Some(window)
}

impl<C: Compositor + 'static> crate::Placement for WindowLeveler<C> {
    /// The compositor picks its own window, so `widget` only identifies the
    /// session in logs.
    fn place(&self, widget: WindowHandle) -> PerchResult<()> {
        debug!(%widget, "placing widget by window level");
        self.apply();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "level"
    }
}
