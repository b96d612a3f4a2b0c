//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
//! Normalised host input.
//!
//! Hosts either build [`Event`] values directly or pass GLFW style
//! `(kind, p1, p2, p3, p4)` tuples through [`Event::from_raw`].

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Keyboard key, numbered like GLFW key codes. Printable keys use their upper case ASCII value.
pub struct Key(pub i32);

#[allow(missing_docs)]
impl Key {
    pub const SPACE: Key = Key(32);
    pub const ESCAPE: Key = Key(256);
    pub const ENTER: Key = Key(257);
    pub const TAB: Key = Key(258);
    pub const BACKSPACE: Key = Key(259);
    pub const INSERT: Key = Key(260);
    pub const DELETE: Key = Key(261);
    pub const RIGHT: Key = Key(262);
    pub const LEFT: Key = Key(263);
    pub const DOWN: Key = Key(264);
    pub const UP: Key = Key(265);
    pub const PAGE_UP: Key = Key(266);
    pub const PAGE_DOWN: Key = Key(267);
    pub const HOME: Key = Key(268);
    pub const END: Key = Key(269);
    pub const F1: Key = Key(290);
    pub const F4: Key = Key(293);
    pub const LEFT_SHIFT: Key = Key(340);
    pub const LEFT_CONTROL: Key = Key(341);
    pub const RIGHT_SHIFT: Key = Key(344);
    pub const RIGHT_CONTROL: Key = Key(345);
}

impl Key {
    /// Key producing the letter or digit `c`.
    pub fn from_char(c: char) -> Self { Self(c.to_ascii_uppercase() as i32) }

    /// Raw key code.
    pub fn code(self) -> i32 { self.0 }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Modifier keys held during an event.
    pub struct KeyMods : u32 {
        /// Super/Windows/Command key.
        const SUPER = 8;
        /// Alt key.
        const ALT = 4;
        /// Control key.
        const CTRL = 2;
        /// Shift key.
        const SHIFT = 1;
        /// No modifiers.
        const NONE = 0;
    }
}

impl KeyMods {
    /// Returns `true` if shift is held.
    pub fn is_shift(&self) -> bool { self.intersects(Self::SHIFT) }
    /// Returns `true` if control is held.
    pub fn is_ctrl(&self) -> bool { self.intersects(Self::CTRL) }
    /// Returns `true` if alt is held.
    pub fn is_alt(&self) -> bool { self.intersects(Self::ALT) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Key or button transition.
pub enum Action {
    /// Released.
    Release,
    /// Pressed.
    Press,
    /// Held long enough to auto-repeat.
    Repeat,
}

impl Action {
    fn from_raw(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::Release),
            1 => Some(Self::Press),
            2 => Some(Self::Repeat),
            _ => None,
        }
    }

    /// Returns `true` for press and repeat.
    pub fn is_down(self) -> bool { self != Self::Release }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Pointer button.
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Middle button.
    Middle,
    /// Any other button, by host index.
    Other(i32),
}

impl MouseButton {
    fn from_raw(v: i32) -> Self {
        match v {
            0 => Self::Left,
            1 => Self::Right,
            2 => Self::Middle,
            v => Self::Other(v),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
/// Discriminant of a raw host message.
pub enum MessageKind {
    /// `(button, action, mods)`.
    MouseButton = 0,
    /// `(x, y)` in window pixels, origin top-left.
    CursorPos = 1,
    /// `(entered)`.
    CursorEnter = 2,
    /// `(dx * 1000, dy * 1000)`.
    Scroll = 3,
    /// `(key, scancode, action, mods)`.
    Key = 4,
    /// `(code point)`.
    UnicodeChar = 5,
    /// `(width, height)` of the window.
    Resize = 6,
    /// `(width, height)` of the framebuffer.
    FramebufferSize = 7,
    /// `(x, y)` of the window on screen.
    Pos = 8,
    /// `(focused)`.
    Focus = 9,
    /// `(iconified)`.
    Iconify = 10,
    /// Window close requested.
    Close = 11,
    /// Window contents need redrawing.
    Refresh = 12,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// A host event after normalisation.
pub enum Event {
    /// Pointer button transition at the last known cursor position.
    MouseButton {
        /// Button.
        button: MouseButton,
        /// Press or release.
        action: Action,
        /// Held modifiers.
        mods: KeyMods,
    },
    /// Pointer moved, in window pixels with the origin at the top-left.
    CursorPos {
        /// Horizontal pixel.
        x: i32,
        /// Vertical pixel, growing downward.
        y: i32,
    },
    /// Pointer entered (`true`) or left the window.
    CursorEnter(bool),
    /// Wheel motion in lines.
    Scroll {
        /// Horizontal delta.
        dx: f32,
        /// Vertical delta, positive away from the user.
        dy: f32,
    },
    /// Key transition.
    Key {
        /// Key.
        key: Key,
        /// Platform scancode.
        scancode: i32,
        /// Transition.
        action: Action,
        /// Held modifiers.
        mods: KeyMods,
    },
    /// Text input.
    Char(char),
    /// Window resized, in pixels.
    Resize {
        /// Width.
        width: i32,
        /// Height.
        height: i32,
    },
    /// Framebuffer resized, in pixels.
    FramebufferSize {
        /// Width.
        width: i32,
        /// Height.
        height: i32,
    },
    /// Window moved.
    Pos {
        /// Horizontal screen position.
        x: i32,
        /// Vertical screen position.
        y: i32,
    },
    /// Window gained (`true`) or lost keyboard focus.
    Focus(bool),
    /// Window minimised (`true`) or restored.
    Iconify(bool),
    /// Close requested.
    Close,
    /// Redraw requested.
    Refresh,
}

impl Event {
    /// Builds an event from a raw host tuple. Unknown kinds and malformed payloads yield `None`.
    pub fn from_raw(kind: MessageKind, p1: i32, p2: i32, p3: i32, p4: i32) -> Option<Self> {
        Some(match kind {
            MessageKind::MouseButton => Event::MouseButton {
                button: MouseButton::from_raw(p1),
                action: Action::from_raw(p2)?,
                mods: KeyMods::from_bits_truncate(p3 as u32),
            },
            MessageKind::CursorPos => Event::CursorPos { x: p1, y: p2 },
            MessageKind::CursorEnter => Event::CursorEnter(p1 != 0),
            MessageKind::Scroll => Event::Scroll { dx: p1 as f32 / 1000.0, dy: p2 as f32 / 1000.0 },
            MessageKind::Key => Event::Key {
                key: Key(p1),
                scancode: p2,
                action: Action::from_raw(p3)?,
                mods: KeyMods::from_bits_truncate(p4 as u32),
            },
            MessageKind::UnicodeChar => Event::Char(char::from_u32(p1 as u32)?),
            MessageKind::Resize => Event::Resize { width: p1, height: p2 },
            MessageKind::FramebufferSize => Event::FramebufferSize { width: p1, height: p2 },
            MessageKind::Pos => Event::Pos { x: p1, y: p2 },
            MessageKind::Focus => Event::Focus(p1 != 0),
            MessageKind::Iconify => Event::Iconify(p1 != 0),
            MessageKind::Close => Event::Close,
            MessageKind::Refresh => Event::Refresh,
        })
    }

    /// Returns `true` for pointer driven events.
    pub fn is_pointer(&self) -> bool { matches!(self, Event::MouseButton { .. } | Event::CursorPos { .. } | Event::Scroll { .. }) }

    /// Returns `true` for keyboard driven events.
    pub fn is_keyboard(&self) -> bool { matches!(self, Event::Key { .. } | Event::Char(_)) }
}

/// Size of one dialog unit in pixels: the shorter window side.
pub fn pixel_unit(width: i32, height: i32) -> f32 { width.min(height).max(1) as f32 }

/// Maps a window pixel (origin top-left) into normalised y-up screen space.
///
/// The centred square of side `min(width, height)` spans `[0, 1]` on both axes; the
/// longer axis extends past it on both sides.
pub fn screen_to_normalized(x: f32, y: f32, width: i32, height: i32) -> Point {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    let y = h - y;
    if w >= h {
        Vec2f::new((x - (w - h) * 0.5) / h, y / h)
    } else {
        Vec2f::new(x / w, (y - (h - w) * 0.5) / w)
    }
}

/// Inverse of [`screen_to_normalized`].
pub fn normalized_to_screen(p: Point, width: i32, height: i32) -> (f32, f32) {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    if w >= h { (p.x * h + (w - h) * 0.5, h - p.y * h) } else { (p.x * w, h - (p.y * w + (h - w) * 0.5)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_tuples_normalise() {
        assert_eq!(
            Event::from_raw(MessageKind::MouseButton, 0, 1, 3, 0),
            Some(Event::MouseButton { button: MouseButton::Left, action: Action::Press, mods: KeyMods::SHIFT | KeyMods::CTRL })
        );
        assert_eq!(Event::from_raw(MessageKind::Scroll, 0, -1500, 0, 0), Some(Event::Scroll { dx: 0.0, dy: -1.5 }));
        assert_eq!(Event::from_raw(MessageKind::UnicodeChar, 'a' as i32, 0, 0, 0), Some(Event::Char('a')));
        assert_eq!(Event::from_raw(MessageKind::Key, 32, 0, 7, 0), None);
        assert_eq!(Event::from_raw(MessageKind::UnicodeChar, 0xD800, 0, 0, 0), None);
    }

    #[test]
    fn landscape_window_centres_the_unit_square() {
        let p = screen_to_normalized(100.0, 600.0, 800, 600);
        assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
        let p = screen_to_normalized(700.0, 0.0, 800, 600);
        assert!((p.x - 1.0).abs() < 1e-6 && (p.y - 1.0).abs() < 1e-6);
        let (x, y) = normalized_to_screen(Vec2f::new(0.5, 0.25), 800, 600);
        assert!((x - 400.0).abs() < 1e-3 && (y - 450.0).abs() < 1e-3);
    }

    #[test]
    fn portrait_window_centres_the_unit_square() {
        let p = screen_to_normalized(0.0, 500.0, 400, 600);
        assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
        assert_eq!(pixel_unit(400, 600), 400.0);
    }
}
