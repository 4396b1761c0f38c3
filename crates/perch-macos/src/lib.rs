/// `Compositor` implementation backed by AppKit.
#[cfg(target_os = "macos")]
pub mod compositor;

#[cfg(target_os = "macos")]
pub use compositor::AppKitCompositor;
