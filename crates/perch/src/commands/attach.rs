use clap::{Args, ValueEnum};

use perch_core::{Config, PerchResult};

/// How the widget is put on the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Reparent into the desktop shell, below every application
    #[default]
    Desktop,
    /// Only restyle the window and let the monitor manage its z-order
    Style,
}

/// Arguments for the `attach` subcommand.
#[derive(Args)]
pub struct AttachArgs {
    /// Exact title of the window (defaults to the configured title)
    #[arg(long)]
    pub title: Option<String>,
    /// Placement mode
    #[arg(long, value_enum, default_value_t = Mode::Desktop)]
    pub mode: Mode,
    /// Keep the widget fully opaque
    #[arg(long)]
    pub opaque: bool,
}

/// Waits for the window to appear, places it, then keeps the foreground
/// monitor running until Ctrl+C.
pub fn execute(args: &AttachArgs, config: &Config) -> PerchResult<()> {
    #[cfg(windows)]
    {
        windows_impl::run(args, config)
    }
    #[cfg(not(windows))]
    {
        let _ = (args, config);
        Err(perch_core::PerchError::Unsupported {
            operation: "attaching another process's window",
        })
    }
}

/// Resolves the opacity for the desktop mode.
#[cfg_attr(not(windows), allow(dead_code))]
pub fn opacity(args_opaque: bool, config: &Config) -> Option<u8> {
    if args_opaque {
        None
    } else {
        config.desktop.opacity()
    }
}

#[cfg(windows)]
pub use windows_impl::start;

#[cfg(windows)]
mod windows_impl {
    use std::sync::Arc;
    use std::sync::mpsc;

    use perch_core::session::{self, SessionHandle};
    use perch_core::{Config, DesktopAttach, PerchResult, StyleOnly, ready_signal};
    use perch_windows::Win32Desktop;
    use tracing::info;

    use super::{AttachArgs, Mode, opacity};

    pub fn run(args: &AttachArgs, config: &Config) -> PerchResult<()> {
        let mut options = config.session_options();
        if let Some(title) = &args.title {
            options.title = title.clone();
        }

        let system = Arc::new(Win32Desktop::new());
        let (ready_tx, ready_rx) = ready_signal();
        println!("Waiting for \"{}\"...", options.title);
        let probe = session::spawn_title_probe(
            Arc::clone(&system),
            options.title.clone(),
            options.ready_timeout,
            ready_tx,
        );

        let mut session = start(args, config, &system, options, ready_rx);
        let placed = session.wait_for_setup();
        let _ = probe.join();
        let widget = match placed {
            Ok(widget) => widget,
            Err(e) => {
                session.join();
                return Err(e);
            }
        };

        println!("Perched window {widget}. Press Ctrl+C to stop the foreground monitor.");
        let (stop_tx, stop_rx) = mpsc::channel();
        perch_windows::ctrl_c::set_handler(stop_tx)?;
        let _ = stop_rx.recv();

        info!(%widget, "stopping");
        session.join();
        Ok(())
    }

    /// Spawns the session with the placement matching `args.mode`.
    pub fn start(
        args: &AttachArgs,
        config: &Config,
        system: &Arc<Win32Desktop>,
        options: session::SessionOptions,
        ready: perch_core::ReadyReceiver,
    ) -> SessionHandle {
        match args.mode {
            Mode::Desktop => {
                let placement = DesktopAttach::new(Arc::clone(system))
                    .with_opacity(opacity(args.opaque, config));
                session::spawn(Arc::clone(system), placement, options, ready)
            }
            Mode::Style => {
                let placement = StyleOnly::new(Arc::clone(system));
                session::spawn(Arc::clone(system), placement, options, ready)
            }
        }
    }
}
