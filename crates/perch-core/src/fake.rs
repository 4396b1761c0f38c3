//! Scripted in-memory desktop used by the unit tests.
//!
//! `FakeDesktop` models a window list in z-order with parent links,
//! classes, titles, visibility and style masks, and records every
//! mutating call. `FakeCompositor` records leveler calls and holds
//! dispatched jobs until a test pumps them.

use std::sync::Mutex;
use std::time::Duration;

use crate::platform::{
    Appearance, CollectionBehavior, Compositor, PositionFlags, ShellHierarchy, UiJob,
    WindowSystem, ZOrder,
};
use crate::{PerchError, PerchResult, WindowHandle, WindowStyleMask};

#[derive(Debug, Clone)]
pub struct FakeWindow {
    title: String,
    class: String,
    visible: bool,
    style: WindowStyleMask,
    parent: Option<WindowHandle>,
    alive: bool,
    opacity: Option<u8>,
}

impl FakeWindow {
    /// A visible application window with a taskbar button.
    pub fn app(title: &str) -> Self {
        Self {
            title: title.to_string(),
            class: "ApplicationFrameWindow".into(),
            visible: true,
            style: WindowStyleMask {
                shown_in_taskbar: true,
                ..Default::default()
            },
            parent: None,
            alive: true,
            opacity: None,
        }
    }

    /// A window of the given class with an empty title.
    pub fn of_class(class: &str) -> Self {
        Self {
            class: class.to_string(),
            style: WindowStyleMask::default(),
            ..Self::app("")
        }
    }

    pub fn with_style(mut self, style: WindowStyleMask) -> Self {
        self.style = style;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[derive(Default)]
struct DesktopState {
    windows: Vec<(WindowHandle, FakeWindow)>,
    next_handle: usize,
    foreground: Option<WindowHandle>,
    shell_messages_fail: bool,
    spawn_icon_host_on_message: bool,
    set_parent_fails: bool,
    sent_messages: Vec<(WindowHandle, u32, usize, isize)>,
    position_calls: Vec<(WindowHandle, ZOrder, PositionFlags)>,
}

impl DesktopState {
    fn insert(&mut self, window: FakeWindow) -> WindowHandle {
        self.next_handle += 1;
        let handle = WindowHandle::from_raw(0x1000 + self.next_handle * 0x10);
        self.windows.push((handle, window));
        handle
    }

    fn get(&self, handle: WindowHandle) -> Option<&FakeWindow> {
        self.windows
            .iter()
            .find(|(h, w)| *h == handle && w.alive)
            .map(|(_, w)| w)
    }

    fn get_mut(&mut self, handle: WindowHandle) -> Option<&mut FakeWindow> {
        self.windows
            .iter_mut()
            .find(|(h, w)| *h == handle && w.alive)
            .map(|(_, w)| w)
    }

    fn top_level(&self) -> impl Iterator<Item = (WindowHandle, &FakeWindow)> {
        self.windows
            .iter()
            .filter(|(_, w)| w.alive && w.parent.is_none())
            .map(|(h, w)| (*h, w))
    }
}

#[derive(Default)]
pub struct FakeDesktop {
    state: Mutex<DesktopState>,
}

impl FakeDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    /// A desktop whose shell already spawned the icon-hosting container:
    /// `Progman`, an empty `WorkerW`, and a `WorkerW` owning the icon view.
    pub fn with_shell() -> (Self, WindowHandle, WindowHandle) {
        let desktop = Self::new();
        let progman = desktop.add(FakeWindow::of_class("Progman").with_title("Program Manager"));
        desktop.add(FakeWindow::of_class("WorkerW"));
        let icon_host = desktop.add(FakeWindow::of_class("WorkerW"));
        desktop.add_child(icon_host, FakeWindow::of_class("SHELLDLL_DefView"));
        (desktop, progman, icon_host)
    }

    pub fn add(&self, window: FakeWindow) -> WindowHandle {
        self.lock().insert(window)
    }

    pub fn add_child(&self, parent: WindowHandle, mut window: FakeWindow) -> WindowHandle {
        window.parent = Some(parent);
        self.lock().insert(window)
    }

    pub fn destroy(&self, handle: WindowHandle) {
        if let Some(window) = self.lock().get_mut(handle) {
            window.alive = false;
        }
    }

    pub fn set_foreground(&self, handle: Option<WindowHandle>) {
        self.lock().foreground = handle;
    }

    pub fn fail_shell_messages(&self) {
        self.lock().shell_messages_fail = true;
    }

    /// The second spawn message creates an icon-hosting `WorkerW`, the way
    /// the real shell does.
    pub fn spawn_icon_host_on_message(&self) {
        self.lock().spawn_icon_host_on_message = true;
    }

    pub fn fail_set_parent(&self) {
        self.lock().set_parent_fails = true;
    }

    pub fn style_of(&self, handle: WindowHandle) -> WindowStyleMask {
        self.lock().get(handle).map(|w| w.style).unwrap_or_default()
    }

    pub fn parent_of(&self, handle: WindowHandle) -> Option<WindowHandle> {
        self.lock().get(handle).and_then(|w| w.parent)
    }

    pub fn opacity_of(&self, handle: WindowHandle) -> Option<u8> {
        self.lock().get(handle).and_then(|w| w.opacity)
    }

    pub fn sent_messages(&self) -> Vec<(WindowHandle, u32, usize, isize)> {
        self.lock().sent_messages.clone()
    }

    pub fn position_calls(&self) -> Vec<(WindowHandle, ZOrder, PositionFlags)> {
        self.lock().position_calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DesktopState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WindowSystem for FakeDesktop {
    fn find_window_by_title(&self, title: &str) -> Option<WindowHandle> {
        self.lock()
            .top_level()
            .find(|(_, w)| w.title == title)
            .map(|(h, _)| h)
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        self.lock().get(handle).is_some()
    }

    fn extended_style(&self, handle: WindowHandle) -> PerchResult<WindowStyleMask> {
        self.lock()
            .get(handle)
            .map(|w| w.style)
            .ok_or(PerchError::InvalidHandle { handle })
    }

    fn set_extended_style(&self, handle: WindowHandle, mask: WindowStyleMask) -> PerchResult<()> {
        let mut state = self.lock();
        let window = state
            .get_mut(handle)
            .ok_or(PerchError::InvalidHandle { handle })?;
        window.style = mask;
        Ok(())
    }

    fn set_window_pos(
        &self,
        handle: WindowHandle,
        z_order: ZOrder,
        flags: PositionFlags,
    ) -> PerchResult<()> {
        let mut state = self.lock();
        if state.get(handle).is_none() {
            return Err(PerchError::InvalidHandle { handle });
        }
        state.position_calls.push((handle, z_order, flags));
        Ok(())
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        self.lock().foreground
    }

    fn is_window_visible(&self, handle: WindowHandle) -> bool {
        self.lock().get(handle).is_some_and(|w| w.visible)
    }

    fn window_title(&self, handle: WindowHandle) -> String {
        self.lock()
            .get(handle)
            .map(|w| w.title.clone())
            .unwrap_or_default()
    }
}

impl ShellHierarchy for FakeDesktop {
    fn find_window_by_class(&self, class: &str) -> Option<WindowHandle> {
        self.lock()
            .top_level()
            .find(|(_, w)| w.class == class)
            .map(|(h, _)| h)
    }

    fn send_message_timeout(
        &self,
        target: WindowHandle,
        message: u32,
        wparam: usize,
        lparam: isize,
        _timeout: Duration,
    ) -> bool {
        let mut state = self.lock();
        state.sent_messages.push((target, message, wparam, lparam));
        if state.shell_messages_fail || state.get(target).is_none() {
            return false;
        }
        if state.spawn_icon_host_on_message && lparam == 1 {
            state.spawn_icon_host_on_message = false;
            let host = state.insert(FakeWindow::of_class("WorkerW"));
            let mut view = FakeWindow::of_class("SHELLDLL_DefView");
            view.parent = Some(host);
            state.insert(view);
        }
        true
    }

    fn top_level_windows(&self) -> Box<dyn Iterator<Item = WindowHandle> + '_> {
        let handles: Vec<WindowHandle> = self.lock().top_level().map(|(h, _)| h).collect();
        Box::new(handles.into_iter())
    }

    fn class_name(&self, handle: WindowHandle) -> String {
        self.lock()
            .get(handle)
            .map(|w| w.class.clone())
            .unwrap_or_default()
    }

    fn find_child_by_class(&self, parent: WindowHandle, class: &str) -> Option<WindowHandle> {
        self.lock()
            .windows
            .iter()
            .find(|(_, w)| w.alive && w.parent == Some(parent) && w.class == class)
            .map(|(h, _)| *h)
    }

    fn set_parent(&self, child: WindowHandle, parent: WindowHandle) -> bool {
        let mut state = self.lock();
        if state.set_parent_fails || state.get(parent).is_none() {
            return false;
        }
        match state.get_mut(child) {
            Some(window) => {
                window.parent = Some(parent);
                true
            }
            None => false,
        }
    }

    fn set_opacity(&self, handle: WindowHandle, alpha: u8) -> PerchResult<()> {
        let mut state = self.lock();
        let window = state
            .get_mut(handle)
            .ok_or(PerchError::InvalidHandle { handle })?;
        window.opacity = Some(alpha);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompositorCall {
    Level(WindowHandle, isize),
    Collection(WindowHandle, CollectionBehavior),
    Borderless(WindowHandle),
    MouseEvents {
        handle: WindowHandle,
        accepts_moved: bool,
        ignores: bool,
    },
    MovableByBackground(WindowHandle, bool),
    Appearance(WindowHandle, Appearance),
    OrderFront(WindowHandle),
}

#[derive(Default)]
struct CompositorState {
    on_ui_thread: bool,
    window: Option<WindowHandle>,
    calls: Vec<CompositorCall>,
    queued: Vec<UiJob>,
}

#[derive(Default)]
pub struct FakeCompositor {
    state: Mutex<CompositorState>,
}

impl FakeCompositor {
    pub fn new(window: Option<WindowHandle>, on_ui_thread: bool) -> Self {
        Self {
            state: Mutex::new(CompositorState {
                on_ui_thread,
                window,
                ..Default::default()
            }),
        }
    }

    pub fn calls(&self) -> Vec<CompositorCall> {
        self.lock().calls.clone()
    }

    pub fn queued_jobs(&self) -> usize {
        self.lock().queued.len()
    }

    /// Runs every queued job as the UI thread would.
    pub fn pump(&self) {
        let jobs = {
            let mut state = self.lock();
            state.on_ui_thread = true;
            std::mem::take(&mut state.queued)
        };
        for job in jobs {
            job();
        }
    }

    fn record(&self, call: CompositorCall) {
        self.lock().calls.push(call);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CompositorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Compositor for FakeCompositor {
    fn is_ui_thread(&self) -> bool {
        self.lock().on_ui_thread
    }

    fn dispatch_to_ui(&self, job: UiJob) {
        self.lock().queued.push(job);
    }

    fn first_window(&self) -> Option<WindowHandle> {
        self.lock().window
    }

    fn set_level(&self, handle: WindowHandle, level: isize) {
        self.record(CompositorCall::Level(handle, level));
    }

    fn set_collection_behavior(&self, handle: WindowHandle, behavior: CollectionBehavior) {
        self.record(CompositorCall::Collection(handle, behavior));
    }

    fn make_borderless(&self, handle: WindowHandle) {
        self.record(CompositorCall::Borderless(handle));
    }

    fn set_mouse_events(&self, handle: WindowHandle, accepts_moved: bool, ignores: bool) {
        self.record(CompositorCall::MouseEvents {
            handle,
            accepts_moved,
            ignores,
        });
    }

    fn set_movable_by_background(&self, handle: WindowHandle, movable: bool) {
        self.record(CompositorCall::MovableByBackground(handle, movable));
    }

    fn set_appearance(&self, handle: WindowHandle, appearance: Appearance) {
        self.record(CompositorCall::Appearance(handle, appearance));
    }

    fn order_front_without_activation(&self, handle: WindowHandle) {
        self.record(CompositorCall::OrderFront(handle));
    }
}
