//! [`Compositor`] on top of AppKit.
//!
//! Window handles are AppKit window numbers. Every window call resolves
//! the number back to an `NSWindow` through the shared application, which
//! only works on the main thread.
//!
//! Some of these AppKit bindings are `unsafe` depending on the binding
//! version, so every call sits in an `unsafe` block. They are all plain
//! property accesses on a live window owned by this process.

#![allow(unused_unsafe)]

use dispatch2::DispatchQueue;
use objc2::rc::Retained;
use objc2_app_kit::{
    NSApplication, NSColor, NSWindow, NSWindowCollectionBehavior, NSWindowStyleMask,
};
use objc2_foundation::MainThreadMarker;
use perch_core::WindowHandle;
use perch_core::platform::{Appearance, CollectionBehavior, Compositor, UiJob};
use tracing::warn;

/// The AppKit compositor of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppKitCompositor;

impl AppKitCompositor {
    pub fn new() -> Self {
        Self
    }

    fn window(&self, handle: WindowHandle) -> Option<Retained<NSWindow>> {
        let Some(mtm) = MainThreadMarker::new() else {
            warn!(%handle, "AppKit window access off the main thread");
            return None;
        };
        let number = handle.raw() as isize;
        let app = NSApplication::sharedApplication(mtm);
        let window = unsafe { app.windowWithWindowNumber(number) };
        if window.is_none() {
            warn!(%handle, "no window with that number");
        }
        window
    }
}

pub fn handle_of(window: &NSWindow) -> WindowHandle {
    WindowHandle::from_raw(unsafe { window.windowNumber() } as usize)
}

impl Compositor for AppKitCompositor {
    fn is_ui_thread(&self) -> bool {
        MainThreadMarker::new().is_some()
    }

    fn dispatch_to_ui(&self, job: UiJob) {
        DispatchQueue::main().exec_async(job);
    }

    fn first_window(&self) -> Option<WindowHandle> {
        let mtm = MainThreadMarker::new()?;
        let windows = unsafe { NSApplication::sharedApplication(mtm).windows() };
        windows.firstObject().map(|w| handle_of(&w))
    }

    fn set_level(&self, handle: WindowHandle, level: isize) {
        if let Some(window) = self.window(handle) {
            unsafe { window.setLevel(level) };
        }
    }

    fn set_collection_behavior(&self, handle: WindowHandle, behavior: CollectionBehavior) {
        let Some(window) = self.window(handle) else {
            return;
        };
        let mut native = NSWindowCollectionBehavior::empty();
        if behavior.all_spaces {
            native |= NSWindowCollectionBehavior::CanJoinAllSpaces;
        }
        if behavior.stationary {
            native |= NSWindowCollectionBehavior::Stationary;
        }
        if behavior.ignores_cycle {
            native |= NSWindowCollectionBehavior::IgnoresCycle;
        }
        unsafe { window.setCollectionBehavior(native) };
    }

    fn make_borderless(&self, handle: WindowHandle) {
        if let Some(window) = self.window(handle) {
            // Borderless is the empty mask, so clearing Titled is enough.
            let mut mask = unsafe { window.styleMask() };
            mask.remove(NSWindowStyleMask::Titled);
            unsafe { window.setStyleMask(mask) };
        }
    }

    fn set_mouse_events(&self, handle: WindowHandle, accepts_moved: bool, ignores: bool) {
        if let Some(window) = self.window(handle) {
            unsafe {
                window.setAcceptsMouseMovedEvents(accepts_moved);
                window.setIgnoresMouseEvents(ignores);
            }
        }
    }

    fn set_movable_by_background(&self, handle: WindowHandle, movable: bool) {
        if let Some(window) = self.window(handle) {
            unsafe { window.setMovableByWindowBackground(movable) };
        }
    }

    fn set_appearance(&self, handle: WindowHandle, appearance: Appearance) {
        let Some(window) = self.window(handle) else {
            return;
        };
        unsafe {
            window.setOpaque(appearance.opaque);
            window.setHasShadow(appearance.has_shadow);
            window.setAlphaValue(appearance.alpha);
            if appearance.clear_background {
                window.setBackgroundColor(Some(&NSColor::clearColor()));
            }
        }
    }

    fn order_front_without_activation(&self, handle: WindowHandle) {
        if let Some(window) = self.window(handle) {
            unsafe { window.orderFrontRegardless() };
        }
    }
}
