//! Capabilities Perch needs from the native windowing API.
//!
//! Each platform crate (e.g. `perch-windows`) provides its own
//! implementation. The algorithms in this crate only talk to these traits,
//! so they can be exercised against a scripted fake desktop in tests.

use std::ops::BitOr;
use std::time::Duration;

use crate::{PerchResult, WindowHandle, WindowStyleMask};

/// Where a position update places the window in the z-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    /// Leave the z-order alone. Pair with [`PositionFlags::NO_Z_ORDER`].
    Unchanged,
    /// Above every non-topmost window, and stays there.
    Topmost,
    /// Drop the topmost attribute and sit at the top of the normal band.
    NoTopmost,
}

/// Flags for a position update.
///
/// Perch never moves or resizes windows, so every update it issues
/// carries [`NO_MOVE`](Self::NO_MOVE) and [`NO_RESIZE`](Self::NO_RESIZE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionFlags(u8);

impl PositionFlags {
    pub const NO_MOVE: Self = Self(1);
    pub const NO_RESIZE: Self = Self(1 << 1);
    pub const NO_Z_ORDER: Self = Self(1 << 2);
    pub const NO_ACTIVATE: Self = Self(1 << 3);
    pub const FRAME_CHANGED: Self = Self(1 << 4);
    pub const SHOW: Self = Self(1 << 5);

    /// Re-evaluate window chrome in place: frame changed, no move, no
    /// resize, no z-order change, no activation.
    pub const FRAME_REFRESH: Self = Self(
        Self::NO_MOVE.0
            | Self::NO_RESIZE.0
            | Self::NO_Z_ORDER.0
            | Self::NO_ACTIVATE.0
            | Self::FRAME_CHANGED.0,
    );

    /// Change only the z-order band: no move, no resize, no activation.
    pub const RESTACK: Self = Self(Self::NO_MOVE.0 | Self::NO_RESIZE.0 | Self::NO_ACTIVATE.0);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for PositionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Window-manager queries and updates shared by every hierarchy-based
/// platform.
pub trait WindowSystem: Send + Sync {
    /// Returns the first top-level window whose title is exactly `title`.
    fn find_window_by_title(&self, title: &str) -> Option<WindowHandle>;

    /// Returns whether the handle still refers to a live window.
    fn is_window(&self, handle: WindowHandle) -> bool;

    /// Reads the widget-relevant style attributes of a window.
    fn extended_style(&self, handle: WindowHandle) -> PerchResult<WindowStyleMask>;

    /// Writes the widget-relevant style attributes of a window, leaving
    /// every attribute outside the mask untouched.
    fn set_extended_style(&self, handle: WindowHandle, mask: WindowStyleMask) -> PerchResult<()>;

    /// Issues a position update without moving or resizing the window.
    fn set_window_pos(
        &self,
        handle: WindowHandle,
        z_order: ZOrder,
        flags: PositionFlags,
    ) -> PerchResult<()>;

    /// Returns the window that currently has input focus.
    ///
    /// `None` stands for the OS sentinel (no foreground window, or the
    /// query failed).
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Returns whether the window is visible. Dead handles are invisible.
    fn is_window_visible(&self, handle: WindowHandle) -> bool;

    /// Returns the window title, or an empty string if it has none or the
    /// handle is dead.
    fn window_title(&self, handle: WindowHandle) -> String;
}

/// Access to the desktop shell's undocumented window hierarchy.
///
/// Kept separate from [`WindowSystem`] because everything here is
/// version-sensitive shell behavior rather than stable window-manager API.
pub trait ShellHierarchy: Send + Sync {
    /// Returns the first top-level window with the given class name.
    fn find_window_by_class(&self, class: &str) -> Option<WindowHandle>;

    /// Sends a message and waits at most `timeout` for it to be handled.
    ///
    /// Returns `false` if the target did not handle it in time.
    fn send_message_timeout(
        &self,
        target: WindowHandle,
        message: u32,
        wparam: usize,
        lparam: isize,
        timeout: Duration,
    ) -> bool;

    /// Lazily walks the live top-level windows in OS (z-) order.
    fn top_level_windows(&self) -> Box<dyn Iterator<Item = WindowHandle> + '_>;

    /// Returns the window class name, or an empty string for a dead handle.
    fn class_name(&self, handle: WindowHandle) -> String;

    /// Returns the first direct child of `parent` with the given class.
    fn find_child_by_class(&self, parent: WindowHandle, class: &str) -> Option<WindowHandle>;

    /// Makes `parent` the new parent of `child`. Returns `false` on failure.
    fn set_parent(&self, child: WindowHandle, parent: WindowHandle) -> bool;

    /// Sets a uniform opacity (0–255) on a layered window.
    fn set_opacity(&self, handle: WindowHandle, alpha: u8) -> PerchResult<()>;
}

/// Where a window shows up across virtual desktops and window cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionBehavior {
    /// Visible on every virtual desktop / space.
    pub all_spaces: bool,
    /// Skipped by the window switcher.
    pub ignores_cycle: bool,
    /// Does not move when the user switches spaces.
    pub stationary: bool,
}

impl CollectionBehavior {
    pub const WIDGET: Self = Self {
        all_spaces: true,
        ignores_cycle: true,
        stationary: true,
    };
}

/// Surface appearance of a compositor-level window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub opaque: bool,
    pub has_shadow: bool,
    pub alpha: f64,
    pub clear_background: bool,
}

impl Appearance {
    pub const WIDGET: Self = Self {
        opaque: false,
        has_shadow: true,
        alpha: 1.0,
        clear_background: true,
    };
}

/// A UI-affine job queued onto the compositor's main thread.
pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

/// Window operations of layered-compositor platforms.
///
/// Every method except [`is_ui_thread`](Self::is_ui_thread) and
/// [`dispatch_to_ui`](Self::dispatch_to_ui) must only be called on the UI
/// thread.
pub trait Compositor: Send + Sync {
    fn is_ui_thread(&self) -> bool;

    /// Queues `job` onto the UI thread and returns without waiting.
    fn dispatch_to_ui(&self, job: UiJob);

    /// Returns the first window the host application owns.
    fn first_window(&self) -> Option<WindowHandle>;

    fn set_level(&self, handle: WindowHandle, level: isize);

    fn set_collection_behavior(&self, handle: WindowHandle, behavior: CollectionBehavior);

    /// Clears the titled style bit and sets borderless.
    fn make_borderless(&self, handle: WindowHandle);

    fn set_mouse_events(&self, handle: WindowHandle, accepts_moved: bool, ignores: bool);

    fn set_movable_by_background(&self, handle: WindowHandle, movable: bool);

    fn set_appearance(&self, handle: WindowHandle, appearance: Appearance);

    /// Brings the window to the front without activating the application.
    fn order_front_without_activation(&self, handle: WindowHandle);
}
