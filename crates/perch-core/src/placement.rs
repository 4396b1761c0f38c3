use std::sync::Arc;

use tracing::info;

use crate::hierarchy::DesktopHierarchyResolver;
use crate::platform::{ShellHierarchy, WindowSystem};
use crate::style::StyleManager;
use crate::{PerchResult, WindowHandle};

/// Moves a located widget window onto the desktop layer.
///
/// Hierarchy platforms reparent the window ([`DesktopAttach`]) or only
/// restyle it ([`StyleOnly`]). Compositor platforms raise its window level
/// ([`WindowLeveler`](crate::WindowLeveler)).
pub trait Placement: Send {
    fn place(&self, widget: WindowHandle) -> PerchResult<()>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Reparents the widget into the desktop shell's icon container.
pub struct DesktopAttach<P: WindowSystem + ShellHierarchy + ?Sized> {
    platform: Arc<P>,
    opacity: Option<u8>,
}

impl<P: WindowSystem + ShellHierarchy + ?Sized> DesktopAttach<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self {
            platform,
            opacity: None,
        }
    }

    /// See [`DesktopHierarchyResolver::with_opacity`].
    pub fn with_opacity(mut self, opacity: Option<u8>) -> Self {
        self.opacity = opacity;
        self
    }
}

impl<P: WindowSystem + ShellHierarchy + ?Sized> Placement for DesktopAttach<P> {
    fn place(&self, widget: WindowHandle) -> PerchResult<()> {
        let platform = self.platform.as_ref();
        DesktopHierarchyResolver::new(platform, platform)
            .with_opacity(self.opacity)
            .attach(widget)
            .map(|_| ())
    }

    fn name(&self) -> &'static str {
        "desktop"
    }
}

/// Applies the widget style in place, leaving the window top-level.
///
/// The foreground monitor alone keeps it out of the way of applications.
pub struct StyleOnly<W: WindowSystem + ?Sized> {
    system: Arc<W>,
}

impl<W: WindowSystem + ?Sized> StyleOnly<W> {
    pub fn new(system: Arc<W>) -> Self {
        Self { system }
    }
}

impl<W: WindowSystem + ?Sized> Placement for StyleOnly<W> {
    fn place(&self, widget: WindowHandle) -> PerchResult<()> {
        let styles = StyleManager::new(self.system.as_ref());
        let mask = styles.apply_widget_style(widget, false)?;
        styles.refresh_frame(widget)?;
        info!(%widget, ?mask, "applied widget style");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "style"
    }
}
