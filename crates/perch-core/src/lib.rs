pub mod config;
pub mod error;
pub mod handle;
pub mod hierarchy;
pub mod leveler;
pub mod locator;
pub mod log;
pub mod monitor;
pub mod placement;
pub mod platform;
pub mod session;
pub mod style;

#[cfg(test)]
mod fake;

pub use config::Config;
pub use error::{PerchError, PerchResult};
pub use handle::WindowHandle;
pub use hierarchy::{ContainerKind, DesktopContainerHandle, DesktopHierarchyResolver};
pub use leveler::WindowLeveler;
pub use locator::locate;
pub use monitor::{ForegroundMonitor, Level, MonitorState, Transition};
pub use placement::{DesktopAttach, Placement, StyleOnly};
pub use platform::{Compositor, PositionFlags, ShellHierarchy, WindowSystem, ZOrder};
pub use session::{ReadyReceiver, ReadySender, SessionHandle, SessionOptions, ready_signal};
pub use style::{StyleManager, WindowStyleMask};
