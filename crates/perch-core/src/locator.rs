use tracing::debug;

use crate::platform::WindowSystem;
use crate::{PerchError, PerchResult, WindowHandle};

/// Resolves a window title to the handle of the first top-level window
/// with exactly that title.
///
/// This is a single query with no retry. The caller makes sure the window
/// exists first, usually by waiting for a readiness signal from the host.
pub fn locate<W: WindowSystem + ?Sized>(system: &W, title: &str) -> PerchResult<WindowHandle> {
    if title.is_empty() {
        return Err(PerchError::WindowNotFound {
            title: String::new(),
        });
    }

    let handle = system
        .find_window_by_title(title)
        .ok_or_else(|| PerchError::WindowNotFound {
            title: title.to_string(),
        })?;

    debug!(%handle, title, "located window");
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeDesktop, FakeWindow};

    #[test]
    fn finds_window_by_exact_title() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(FakeWindow::app("Zeeho Widget Settings"));
        let widget = desktop.add(FakeWindow::app("Zeeho Widget"));

        // Act
        let found = locate(&desktop, "Zeeho Widget").unwrap();

        // Assert
        assert_eq!(found, widget);
    }

    #[test]
    fn first_match_wins_for_duplicate_titles() {
        // Arrange
        let desktop = FakeDesktop::new();
        let first = desktop.add(FakeWindow::app("Twin"));
        desktop.add(FakeWindow::app("Twin"));

        // Act / Assert
        assert_eq!(locate(&desktop, "Twin").unwrap(), first);
    }

    #[test]
    fn missing_title_is_window_not_found() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(FakeWindow::app("Notepad"));

        // Act
        let result = locate(&desktop, "Zeeho Widget");

        // Assert
        assert!(
            matches!(result, Err(PerchError::WindowNotFound { ref title }) if title == "Zeeho Widget")
        );
    }

    #[test]
    fn destroyed_window_is_never_returned() {
        // Arrange
        let desktop = FakeDesktop::new();
        let widget = desktop.add(FakeWindow::app("Zeeho Widget"));
        desktop.destroy(widget);

        // Act / Assert
        assert!(locate(&desktop, "Zeeho Widget").is_err());
    }

    #[test]
    fn empty_title_is_rejected() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(FakeWindow::app(""));

        // Act / Assert
        assert!(matches!(
            locate(&desktop, ""),
            Err(PerchError::WindowNotFound { .. })
        ));
    }
}
