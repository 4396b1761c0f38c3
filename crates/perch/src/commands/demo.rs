//! A frameless host window that perches itself on the desktop.
//!
//! The window signals readiness from `resumed`, right after it has been
//! created, so setup never races window creation.

use clap::Args;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use perch_core::{Config, PerchError, PerchResult, ReadySender};

use super::attach::Mode;

pub const DEMO_WIDTH: f64 = 440.0;
pub const DEMO_HEIGHT: f64 = 300.0;

/// Arguments for the `demo` subcommand.
#[derive(Args)]
pub struct DemoArgs {
    /// Window title (defaults to the configured title)
    #[arg(long)]
    pub title: Option<String>,
    /// Placement mode (ignored where the window is leveled instead)
    #[arg(long, value_enum, default_value_t = Mode::Desktop)]
    pub mode: Mode,
    /// Keep the widget fully opaque
    #[arg(long)]
    pub opaque: bool,
}

struct DemoApp {
    title: String,
    window: Option<Window>,
    ready: Option<ReadySender>,
}

impl DemoApp {
    fn on_created(&self, window: &Window) {
        info!(title = %self.title, id = ?window.id(), "demo window created");
        #[cfg(target_os = "macos")]
        level(window);
    }
}

#[cfg(target_os = "macos")]
fn level(window: &Window) {
    use std::sync::Arc;

    use perch_core::{Placement, WindowHandle, WindowLeveler};
    use perch_macos::AppKitCompositor;

    let leveler = WindowLeveler::new(Arc::new(AppKitCompositor::new()));
    let handle = WindowHandle::from_raw(u64::from(window.id()) as usize);
    if let Err(e) = leveler.place(handle) {
        error!(error = %e, "failed to level demo window");
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_decorations(false)
            .with_resizable(false)
            .with_inner_size(LogicalSize::new(DEMO_WIDTH, DEMO_HEIGHT));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                self.on_created(&window);
                self.window = Some(window);
                if let Some(ready) = self.ready.take() {
                    ready.signal();
                }
            }
            Err(e) => {
                error!(error = %e, "failed to create demo window");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
        }
    }
}

/// Opens the demo window and runs its event loop until it is closed.
pub fn execute(args: &DemoArgs, config: &Config) -> PerchResult<()> {
    let mut options = config.session_options();
    if let Some(title) = &args.title {
        options.title = title.clone();
    }

    let event_loop = EventLoop::new().map_err(|e| PerchError::os("EventLoop::new", e))?;
    let (ready_tx, ready_rx) = perch_core::ready_signal();

    #[cfg(windows)]
    let session = {
        let system = std::sync::Arc::new(perch_windows::Win32Desktop::new());
        let attach_args = super::attach::AttachArgs {
            title: None,
            mode: args.mode,
            opaque: args.opaque,
        };
        super::attach::start(&attach_args, config, &system, options.clone(), ready_rx)
    };
    #[cfg(not(windows))]
    {
        // Leveling happens on the UI thread as soon as the window exists.
        let _ = (args.mode, args.opaque);
        drop(ready_rx);
    }

    let mut app = DemoApp {
        title: options.title,
        window: None,
        ready: Some(ready_tx),
    };
    let result = event_loop
        .run_app(&mut app)
        .map_err(|e| PerchError::os("EventLoop::run_app", e));

    // Releases the readiness sender if the window never came up.
    drop(app);
    #[cfg(windows)]
    session.join();

    result
}
