//! Wires setup and monitoring together on background threads.
//!
//! The host signals readiness once its window exists. The setup thread then
//! locates and places the widget and hands its handle to the monitor
//! thread. If setup fails the handoff sender is dropped and the monitor
//! exits without ever running.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::DEFAULT_WIDGET_TITLE;
use crate::locator::locate;
use crate::monitor::ForegroundMonitor;
use crate::placement::Placement;
use crate::platform::WindowSystem;
use crate::{PerchError, PerchResult, WindowHandle};

/// How long setup waits for the host by default.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

/// How often [`spawn_title_probe`] looks for the window.
pub const PROBE_INTERVAL: Duration = Duration::from_millis(250);

/// Host side of the one-shot readiness signal.
pub struct ReadySender(mpsc::Sender<()>);

impl ReadySender {
    /// Reports that the host window exists. Dropping the sender without
    /// signaling tells setup the window will never come.
    pub fn signal(self) {
        let _ = self.0.send(());
    }
}

/// Setup side of the one-shot readiness signal.
pub struct ReadyReceiver(mpsc::Receiver<()>);

impl ReadyReceiver {
    /// Blocks until the host signals, gives up, or `timeout` passes.
    pub fn wait(&self, timeout: Duration) -> PerchResult<()> {
        let started = Instant::now();
        match self.0.recv_timeout(timeout) {
            Ok(()) => Ok(()),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(PerchError::NotReady { waited: timeout }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(PerchError::NotReady {
                waited: started.elapsed(),
            }),
        }
    }
}

pub fn ready_signal() -> (ReadySender, ReadyReceiver) {
    let (tx, rx) = mpsc::channel();
    (ReadySender(tx), ReadyReceiver(rx))
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Exact title of the widget window.
    pub title: String,
    /// Upper bound on the wait for the readiness signal.
    pub ready_timeout: Duration,
    /// Extra titles the monitor treats as shell windows.
    pub extra_system_titles: Vec<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_WIDGET_TITLE.to_string(),
            ready_timeout: DEFAULT_READY_TIMEOUT,
            extra_system_titles: Vec::new(),
        }
    }
}

/// Controls a running session.
pub struct SessionHandle {
    stop: Arc<AtomicBool>,
    setup_result: Option<mpsc::Receiver<PerchResult<WindowHandle>>>,
    setup: thread::JoinHandle<()>,
    monitor: thread::JoinHandle<bool>,
}

impl SessionHandle {
    /// Blocks until setup finishes and returns the placed widget.
    ///
    /// The outcome can be taken only once.
    pub fn wait_for_setup(&mut self) -> PerchResult<WindowHandle> {
        let rx = self.setup_result.take().ok_or(PerchError::Os {
            context: "session",
            message: "setup result already taken".into(),
        })?;
        rx.recv().unwrap_or_else(|_| {
            Err(PerchError::Os {
                context: "session",
                message: "setup thread exited without a result".into(),
            })
        })
    }

    /// Shared flag that stops the monitor when set.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Stops the monitor and waits for both threads.
    ///
    /// Returns whether the monitor received a widget and ran.
    pub fn join(self) -> bool {
        self.stop();
        if self.setup.join().is_err() {
            warn!("setup thread panicked");
        }
        self.monitor.join().unwrap_or_else(|_| {
            warn!("monitor thread panicked");
            false
        })
    }
}

/// Starts the setup and monitor threads.
///
/// Setup waits for `ready`, locates the window titled `options.title`,
/// and hands it to `placement`. Every failure is logged and reported
/// through [`SessionHandle::wait_for_setup`]; none of them panic.
pub fn spawn<W, P>(
    system: Arc<W>,
    placement: P,
    options: SessionOptions,
    ready: ReadyReceiver,
) -> SessionHandle
where
    W: WindowSystem + ?Sized + 'static,
    P: Placement + 'static,
{
    let (handoff_tx, handoff_rx) = mpsc::channel::<WindowHandle>();
    let (result_tx, result_rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));

    let setup_system = Arc::clone(&system);
    let SessionOptions {
        title,
        ready_timeout,
        extra_system_titles,
    } = options;
    let setup = thread::spawn(move || {
        let result = run_setup(
            setup_system.as_ref(),
            &placement,
            &title,
            &ready,
            ready_timeout,
        );
        match &result {
            Ok(widget) => {
                let _ = handoff_tx.send(*widget);
            }
            Err(e) => {
                warn!(%title, mode = placement.name(), error = %e, "widget setup failed");
                drop(handoff_tx);
            }
        }
        let _ = result_tx.send(result);
    });

    let monitor_stop = Arc::clone(&stop);
    let monitor = thread::spawn(move || {
        let Ok(widget) = handoff_rx.recv() else {
            debug!("setup did not produce a widget; monitor not started");
            return false;
        };
        ForegroundMonitor::new(system, widget)
            .with_extra_system_titles(extra_system_titles)
            .run(&monitor_stop);
        true
    });

    SessionHandle {
        stop,
        setup_result: Some(result_rx),
        setup,
        monitor,
    }
}

fn run_setup<W, P>(
    system: &W,
    placement: &P,
    title: &str,
    ready: &ReadyReceiver,
    ready_timeout: Duration,
) -> PerchResult<WindowHandle>
where
    W: WindowSystem + ?Sized,
    P: Placement + ?Sized,
{
    ready.wait(ready_timeout)?;
    let widget = locate(system, title)?;
    placement.place(widget)?;
    info!(%widget, title, mode = placement.name(), "widget placed");
    Ok(widget)
}

/// Signals `ready` as soon as a window titled `title` exists.
///
/// For hosts that have no window-created event, such as an external
/// process. Gives up silently after `timeout`, which the setup side sees
/// as an early [`PerchError::NotReady`].
pub fn spawn_title_probe<W>(
    system: Arc<W>,
    title: String,
    timeout: Duration,
    ready: ReadySender,
) -> thread::JoinHandle<()>
where
    W: WindowSystem + ?Sized + 'static,
{
    thread::spawn(move || {
        let started = Instant::now();
        loop {
            if system.find_window_by_title(&title).is_some() {
                debug!(%title, waited = ?started.elapsed(), "window appeared");
                ready.signal();
                return;
            }
            if started.elapsed() >= timeout {
                debug!(%title, "window did not appear before timeout");
                return;
            }
            thread::sleep(PROBE_INTERVAL);
        }
    })
}
