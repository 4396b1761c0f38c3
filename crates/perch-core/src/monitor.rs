//! Z-order arbitration between the widget and the focused window.
//!
//! When the user focuses an application, the widget drops back into the
//! normal band so it does not cover that application. When focus lands on
//! the desktop, the shell, or nothing at all, the widget floats above
//! everything. Transitions are debounced so rapid focus flicker does not
//! make the widget strobe.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::WindowHandle;
use crate::platform::{PositionFlags, WindowSystem, ZOrder};

/// How often the foreground window is sampled.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Minimum time between two level transitions.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_secs(1);

/// Titles of shell windows that count as "the desktop has focus".
pub const SYSTEM_WINDOW_TITLES: &[&str] = &[
    "Program Manager",
    "Desktop Window Manager",
    "Windows Shell Experience Host",
];

/// Where the widget currently sits in the z-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Normal band, below whatever application the user is working in.
    Yielding,
    /// Topmost, floating over the desktop.
    Elevated,
}

/// State owned by a running monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorState {
    pub last_foreground: Option<WindowHandle>,
    pub is_topmost: bool,
    pub last_transition: Option<Instant>,
}

impl MonitorState {
    pub fn level(&self) -> Level {
        if self.is_topmost {
            Level::Elevated
        } else {
            Level::Yielding
        }
    }
}

/// A level change made by [`ForegroundMonitor::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Level,
    pub to: Level,
    pub at: Instant,
    /// The foreground window that caused the change.
    pub foreground: Option<WindowHandle>,
}

/// Returns whether focus on `window` means "the user is looking at the
/// desktop".
///
/// `None` (no foreground window), invisible windows, untitled windows and
/// the known shell windows all qualify.
pub fn is_system_window<W: WindowSystem + ?Sized>(
    system: &W,
    window: Option<WindowHandle>,
    extra_titles: &[String],
) -> bool {
    let Some(window) = window else {
        return true;
    };
    if !system.is_window_visible(window) {
        return true;
    }

    let title = system.window_title(window);
    title.is_empty()
        || SYSTEM_WINDOW_TITLES.contains(&title.as_str())
        || extra_titles.iter().any(|t| *t == title)
}

pub struct ForegroundMonitor<W: WindowSystem + ?Sized> {
    system: Arc<W>,
    widget: WindowHandle,
    state: MonitorState,
    extra_system_titles: Vec<String>,
}

impl<W: WindowSystem + ?Sized> ForegroundMonitor<W> {
    pub fn new(system: Arc<W>, widget: WindowHandle) -> Self {
        Self {
            system,
            widget,
            state: MonitorState::default(),
            extra_system_titles: Vec::new(),
        }
    }

    /// Additional titles to treat as shell windows.
    pub fn with_extra_system_titles(mut self, titles: Vec<String>) -> Self {
        self.extra_system_titles = titles;
        self
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Samples the foreground window once and restacks the widget if needed.
    ///
    /// `now` is the time of the sample. Returns the transition if the level
    /// changed.
    pub fn tick(&mut self, now: Instant) -> Option<Transition> {
        let foreground = self.system.foreground_window();
        if foreground == self.state.last_foreground {
            return None;
        }

        if foreground == Some(self.widget) {
            self.state.last_foreground = foreground;
            return None;
        }

        // Not recorded, so the same focus is reconsidered on a later tick.
        if let Some(last) = self.state.last_transition
            && now.saturating_duration_since(last) < DEBOUNCE_INTERVAL
        {
            return None;
        }

        self.state.last_foreground = foreground;

        let system_focused =
            is_system_window(self.system.as_ref(), foreground, &self.extra_system_titles);
        if system_focused == self.state.is_topmost {
            return None;
        }

        let from = self.state.level();
        let z_order = if system_focused {
            ZOrder::Topmost
        } else {
            ZOrder::NoTopmost
        };
        if let Err(e) = self
            .system
            .set_window_pos(self.widget, z_order, PositionFlags::RESTACK)
        {
            warn!(widget = %self.widget, ?z_order, error = %e, "failed to restack widget");
        }

        self.state.is_topmost = system_focused;
        self.state.last_transition = Some(now);

        Some(Transition {
            from,
            to: self.state.level(),
            at: now,
            foreground,
        })
    }

    /// Polls until `stop` is set.
    pub fn run(&mut self, stop: &AtomicBool) {
        info!(widget = %self.widget, "foreground monitor started");
        while !stop.load(Ordering::Relaxed) {
            if let Some(t) = self.tick(Instant::now()) {
                let foreground = t.foreground.map(|h| h.to_string()).unwrap_or_default();
                debug!(from = ?t.from, to = ?t.to, foreground, "widget level changed");
            }
            std::thread::sleep(POLL_INTERVAL);
        }
        info!(widget = %self.widget, "foreground monitor stopped");
    }
}
