use tracing::debug;

use crate::platform::{PositionFlags, WindowSystem, ZOrder};
use crate::{PerchError, PerchResult, WindowHandle};

/// The window attributes that decide whether a window behaves like a
/// desktop widget.
///
/// This is a value type: read it from the OS, modify it, write it back.
/// Never cache it, since other code may change the window's style at any
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowStyleMask {
    /// Hidden from Alt+Tab and other task-switching UI.
    pub excluded_from_switcher: bool,
    /// Clicking the window does not take keyboard focus.
    pub non_activating: bool,
    /// The window can be composited with a uniform alpha.
    pub supports_layered_alpha: bool,
    /// The window has a taskbar button.
    pub shown_in_taskbar: bool,
    /// No caption or sizing frame.
    pub borderless: bool,
}

impl WindowStyleMask {
    /// Returns this mask turned into a widget mask: out of the switcher and
    /// taskbar, never activated. Other attributes are kept.
    pub fn widget(self) -> Self {
        Self {
            excluded_from_switcher: true,
            non_activating: true,
            shown_in_taskbar: false,
            ..self
        }
    }

    /// Returns this mask with layered-alpha support enabled.
    pub fn with_layered_alpha(self) -> Self {
        Self {
            supports_layered_alpha: true,
            ..self
        }
    }
}

/// Reads and writes [`WindowStyleMask`]s on live windows.
pub struct StyleManager<'a, W: WindowSystem + ?Sized> {
    system: &'a W,
}

impl<'a, W: WindowSystem + ?Sized> StyleManager<'a, W> {
    pub fn new(system: &'a W) -> Self {
        Self { system }
    }

    /// Returns the current style of a window.
    pub fn get_style(&self, handle: WindowHandle) -> PerchResult<WindowStyleMask> {
        self.ensure_live(handle)?;
        self.system.extended_style(handle)
    }

    /// Writes a complete style mask.
    ///
    /// The OS re-evaluates window chrome afterwards, which can flash.
    /// Follow with [`refresh_frame`](Self::refresh_frame) to keep it brief.
    pub fn set_style(&self, handle: WindowHandle, mask: WindowStyleMask) -> PerchResult<()> {
        self.ensure_live(handle)?;
        debug!(%handle, ?mask, "writing window style");
        self.system.set_extended_style(handle, mask)
    }

    /// Notifies the OS that the frame changed, without moving, resizing,
    /// restacking or activating the window.
    pub fn refresh_frame(&self, handle: WindowHandle) -> PerchResult<()> {
        self.system
            .set_window_pos(handle, ZOrder::Unchanged, PositionFlags::FRAME_REFRESH)
    }

    /// Turns the window's current style into the widget style and writes it.
    ///
    /// Returns the mask that was written.
    pub fn apply_widget_style(
        &self,
        handle: WindowHandle,
        layered_alpha: bool,
    ) -> PerchResult<WindowStyleMask> {
        let mut mask = self.get_style(handle)?.widget();
        if layered_alpha {
            mask = mask.with_layered_alpha();
        }
        self.set_style(handle, mask)?;
        Ok(mask)
    }

    fn ensure_live(&self, handle: WindowHandle) -> PerchResult<()> {
        if self.system.is_window(handle) {
            Ok(())
        } else {
            Err(PerchError::InvalidHandle { handle })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeDesktop, FakeWindow};

    fn desktop_with_widget() -> (FakeDesktop, WindowHandle) {
        let desktop = FakeDesktop::new();
        let widget = desktop.add(FakeWindow::app("Zeeho Widget").with_style(WindowStyleMask {
            shown_in_taskbar: true,
            borderless: true,
            ..Default::default()
        }));
        (desktop, widget)
    }

    #[test]
    fn widget_mask_hides_from_taskbar_and_switcher() {
        // Arrange
        let mask = WindowStyleMask {
            shown_in_taskbar: true,
            borderless: true,
            ..Default::default()
        };

        // Act
        let widget = mask.widget();

        // Assert
        assert!(widget.excluded_from_switcher);
        assert!(widget.non_activating);
        assert!(!widget.shown_in_taskbar);
        assert!(widget.borderless);
        assert!(!widget.supports_layered_alpha);
    }

    #[test]
    fn set_then_get_returns_written_mask() {
        // Arrange
        let (desktop, widget) = desktop_with_widget();
        let styles = StyleManager::new(&desktop);
        let mask = WindowStyleMask {
            excluded_from_switcher: true,
            non_activating: true,
            supports_layered_alpha: true,
            shown_in_taskbar: false,
            borderless: false,
        };

        // Act
        styles.set_style(widget, mask).unwrap();

        // Assert
        assert_eq!(styles.get_style(widget).unwrap(), mask);
    }

    #[test]
    fn setting_same_mask_twice_matches_setting_once() {
        // Arrange
        let (desktop, widget) = desktop_with_widget();
        let styles = StyleManager::new(&desktop);
        let mask = styles.get_style(widget).unwrap().widget();

        // Act
        styles.set_style(widget, mask).unwrap();
        let once = styles.get_style(widget).unwrap();
        styles.set_style(widget, mask).unwrap();
        let twice = styles.get_style(widget).unwrap();

        // Assert
        assert_eq!(once, twice);
    }

    #[test]
    fn dead_handle_is_invalid() {
        // Arrange
        let (desktop, widget) = desktop_with_widget();
        desktop.destroy(widget);
        let styles = StyleManager::new(&desktop);

        // Act
        let get = styles.get_style(widget);
        let set = styles.set_style(widget, WindowStyleMask::default());

        // Assert
        assert!(matches!(get, Err(PerchError::InvalidHandle { handle }) if handle == widget));
        assert!(matches!(set, Err(PerchError::InvalidHandle { .. })));
    }

    #[test]
    fn refresh_frame_issues_in_place_update() {
        // Arrange
        let (desktop, widget) = desktop_with_widget();
        let styles = StyleManager::new(&desktop);

        // Act
        styles.refresh_frame(widget).unwrap();

        // Assert
        assert_eq!(
            desktop.position_calls(),
            vec![(widget, ZOrder::Unchanged, PositionFlags::FRAME_REFRESH)]
        );
    }

    #[test]
    fn apply_widget_style_keeps_borderless_and_adds_alpha() {
        // Arrange
        let (desktop, widget) = desktop_with_widget();
        let styles = StyleManager::new(&desktop);

        // Act
        let written = styles.apply_widget_style(widget, true).unwrap();

        // Assert
        assert!(written.supports_layered_alpha);
        assert!(written.borderless);
        assert!(!written.shown_in_taskbar);
        assert_eq!(desktop.style_of(widget), written);
    }
}
