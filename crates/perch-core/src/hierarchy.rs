//! Desktop attachment for hierarchy-based shells (Windows Explorer).
//!
//! Explorer draws the wallpaper in `Progman`. Sending it the undocumented
//! message `0x052C` makes it split the desktop into a `WorkerW` that hosts
//! the icon view (`SHELLDLL_DefView`) and a second `WorkerW` behind it.
//! Parenting the widget into the icon-hosting container puts it on the
//! desktop layer: above the wallpaper, immune to "show desktop", and below
//! every application window.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::platform::{PositionFlags, ShellHierarchy, WindowSystem, ZOrder};
use crate::style::StyleManager;
use crate::{PerchError, PerchResult, WindowHandle};

/// Class of the shell's primary wallpaper window.
pub const PRIMARY_SHELL_CLASS: &str = "Progman";

/// Class of the secondary background containers spawned by the shell.
pub const SECONDARY_CONTAINER_CLASS: &str = "WorkerW";

/// Class of the view that renders desktop icons.
pub const ICON_VIEW_CLASS: &str = "SHELLDLL_DefView";

/// Undocumented `Progman` message that spawns the secondary containers.
pub const SPAWN_CONTAINER_MESSAGE: u32 = 0x052C;

const SPAWN_CONTAINER_WPARAM: usize = 0xD;

/// Upper bound on how long a hung shell may block the spawn message.
const SHELL_MESSAGE_TIMEOUT: Duration = Duration::from_secs(1);

/// Opacity applied to translucent widgets (out of 255).
pub const DEFAULT_OPACITY: u8 = 230;

/// Which shell window ended up hosting the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// The secondary container that owns the desktop icon view.
    IconHost,
    /// The primary shell window, used when no icon host could be found.
    PrimaryShell,
}

/// The shell surface the widget is (or would be) parented to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopContainerHandle {
    pub handle: WindowHandle,
    pub kind: ContainerKind,
}

/// Finds the desktop container and reparents the widget into it.
pub struct DesktopHierarchyResolver<'a, S: ?Sized, W: ?Sized> {
    shell: &'a S,
    system: &'a W,
    opacity: Option<u8>,
}

impl<'a, S, W> DesktopHierarchyResolver<'a, S, W>
where
    S: ShellHierarchy + ?Sized,
    W: WindowSystem + ?Sized,
{
    pub fn new(shell: &'a S, system: &'a W) -> Self {
        Self {
            shell,
            system,
            opacity: None,
        }
    }

    /// Makes the widget translucent with the given overall opacity.
    /// `None` keeps it fully opaque.
    pub fn with_opacity(mut self, opacity: Option<u8>) -> Self {
        self.opacity = opacity;
        self
    }

    /// Resolves the container the widget should be parented to.
    ///
    /// Provokes the shell into spawning its secondary containers first.
    /// That step is best effort: if it fails, the search still runs and
    /// falls back to the primary shell window.
    pub fn resolve_container(&self) -> PerchResult<DesktopContainerHandle> {
        let primary = self
            .shell
            .find_window_by_class(PRIMARY_SHELL_CLASS)
            .ok_or(PerchError::ShellNotFound {
                class: PRIMARY_SHELL_CLASS,
            })?;

        self.spawn_secondary_containers(primary);

        let container = match self.find_icon_host() {
            Some(handle) => DesktopContainerHandle {
                handle,
                kind: ContainerKind::IconHost,
            },
            None => {
                info!(%primary, "no icon-hosting container; falling back to primary shell window");
                DesktopContainerHandle {
                    handle: primary,
                    kind: ContainerKind::PrimaryShell,
                }
            }
        };
        Ok(container)
    }

    /// Returns the first top-level secondary container that owns the
    /// desktop icon view.
    ///
    /// "First" follows OS window order, which is not guaranteed to be
    /// stable across shell restarts but is stable while the window set
    /// does not change.
    pub fn find_icon_host(&self) -> Option<WindowHandle> {
        self.shell.top_level_windows().find(|&candidate| {
            self.shell.class_name(candidate) == SECONDARY_CONTAINER_CLASS
                && self
                    .shell
                    .find_child_by_class(candidate, ICON_VIEW_CLASS)
                    .is_some()
        })
    }

    /// Turns `widget` into a desktop child window.
    ///
    /// On failure the widget keeps its original style and stays a normal
    /// top-level window.
    pub fn attach(&self, widget: WindowHandle) -> PerchResult<DesktopContainerHandle> {
        let container = self.resolve_container()?;
        let styles = StyleManager::new(self.system);

        // Some shells sample taskbar visibility when the parent changes,
        // so the widget style must be in place before reparenting.
        let original = styles.get_style(widget)?;
        styles.apply_widget_style(widget, self.opacity.is_some())?;

        if !self.shell.set_parent(widget, container.handle) {
            if let Err(e) = styles.set_style(widget, original) {
                warn!(%widget, error = %e, "failed to restore original style");
            }
            return Err(PerchError::ReparentFailed {
                handle: widget,
                parent: container.handle,
            });
        }

        if let Some(alpha) = self.opacity
            && let Err(e) = self.shell.set_opacity(widget, alpha)
        {
            warn!(%widget, alpha, error = %e, "failed to set widget opacity");
        }

        // Z-order now follows the parent, so no explicit level is set here.
        self.system.set_window_pos(
            widget,
            ZOrder::Unchanged,
            PositionFlags::FRAME_REFRESH | PositionFlags::SHOW,
        )?;

        info!(%widget, container = %container.handle, kind = ?container.kind, "attached widget to desktop");
        Ok(container)
    }

    fn spawn_secondary_containers(&self, primary: WindowHandle) {
        for lparam in [0, 1] {
            let handled = self.shell.send_message_timeout(
                primary,
                SPAWN_CONTAINER_MESSAGE,
                SPAWN_CONTAINER_WPARAM,
                lparam,
                SHELL_MESSAGE_TIMEOUT,
            );
            if handled {
                debug!(%primary, lparam, "shell handled container spawn message");
            } else {
                warn!(%primary, lparam, "shell did not handle container spawn message");
            }
        }
    }
}

#[cfg(test)]
#[path = "hierarchy_tests.rs"]
mod tests;
