//! Mapping between Win32 style words and [`WindowStyleMask`].
//!
//! Plain integer math so it can be tested on any host. Bits outside the
//! mask are always carried over unchanged.

use perch_core::WindowStyleMask;

pub const WS_EX_TOOLWINDOW: u32 = 0x0000_0080;
pub const WS_EX_APPWINDOW: u32 = 0x0004_0000;
pub const WS_EX_LAYERED: u32 = 0x0008_0000;
pub const WS_EX_NOACTIVATE: u32 = 0x0800_0000;

pub const WS_CAPTION: u32 = 0x00C0_0000;
pub const WS_THICKFRAME: u32 = 0x0004_0000;

const FRAME_BITS: u32 = WS_CAPTION | WS_THICKFRAME;

/// The `GWL_STYLE` and `GWL_EXSTYLE` words of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleWords {
    pub style: u32,
    pub ex_style: u32,
}

impl StyleWords {
    pub fn to_mask(self) -> WindowStyleMask {
        WindowStyleMask {
            excluded_from_switcher: self.ex_style & WS_EX_TOOLWINDOW != 0,
            non_activating: self.ex_style & WS_EX_NOACTIVATE != 0,
            supports_layered_alpha: self.ex_style & WS_EX_LAYERED != 0,
            shown_in_taskbar: self.ex_style & WS_EX_APPWINDOW != 0,
            borderless: self.style & FRAME_BITS == 0,
        }
    }

    /// Returns these words rewritten to express `mask`.
    ///
    /// Clearing `borderless` on a frameless window gives it a caption and
    /// sizing frame. A window that already has either keeps its frame as is.
    pub fn with_mask(self, mask: WindowStyleMask) -> Self {
        let mut ex_style = self.ex_style;
        set_bit(&mut ex_style, WS_EX_TOOLWINDOW, mask.excluded_from_switcher);
        set_bit(&mut ex_style, WS_EX_NOACTIVATE, mask.non_activating);
        set_bit(&mut ex_style, WS_EX_LAYERED, mask.supports_layered_alpha);
        set_bit(&mut ex_style, WS_EX_APPWINDOW, mask.shown_in_taskbar);

        let style = if mask.borderless {
            self.style & !FRAME_BITS
        } else if self.style & FRAME_BITS == 0 {
            self.style | FRAME_BITS
        } else {
            self.style
        };

        Self { style, ex_style }
    }
}

fn set_bit(word: &mut u32, bit: u32, on: bool) {
    if on {
        *word |= bit;
    } else {
        *word &= !bit;
    }
}
