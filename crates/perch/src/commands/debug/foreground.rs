use perch_core::{Config, PerchResult};

/// Prints each foreground change and whether the monitor would elevate the
/// widget for it. Press Ctrl+C to stop.
pub fn execute(config: &Config) -> PerchResult<()> {
    #[cfg(windows)]
    {
        windows_impl::run(config)
    }
    #[cfg(not(windows))]
    {
        let _ = config;
        Err(perch_core::PerchError::Unsupported {
            operation: "watching the foreground window",
        })
    }
}

#[cfg(windows)]
mod windows_impl {
    use std::sync::mpsc;

    use perch_core::monitor::{POLL_INTERVAL, is_system_window};
    use perch_core::{Config, PerchResult, WindowSystem};
    use perch_windows::Win32Desktop;

    pub fn run(config: &Config) -> PerchResult<()> {
        println!("Watching the foreground window (press Ctrl+C to stop)...\n");

        let (stop_tx, stop_rx) = mpsc::channel();
        perch_windows::ctrl_c::set_handler(stop_tx)?;

        let desktop = Win32Desktop::new();
        let extra = &config.monitor.extra_system_titles;
        let mut last = None;
        let mut first = true;

        loop {
            match stop_rx.recv_timeout(POLL_INTERVAL) {
                Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                Err(mpsc::RecvTimeoutError::Timeout) => {}
            }

            let foreground = desktop.foreground_window();
            if foreground == last && !first {
                continue;
            }
            first = false;
            last = foreground;

            let kind = if is_system_window(&desktop, foreground, extra) {
                "system"
            } else {
                "application"
            };
            match foreground {
                Some(handle) => {
                    let title = desktop.window_title(handle);
                    println!("{handle} {kind} \"{title}\"");
                }
                None => println!("(none) {kind}"),
            }
        }
        Ok(())
    }
}
