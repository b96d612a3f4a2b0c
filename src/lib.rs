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
#![deny(missing_docs)]
//! `retained-ui` is a retained-mode dialog and widget toolkit drawn through an OpenGL style backend.
//! Dialogs own their controls, a central [`ResourceManager`] owns the dialogs, fonts, textures and
//! draw batches, and the host feeds it normalised window events once per frame before asking it to render.

use std::sync::{Arc, PoisonError, RwLock};

mod batch;
mod blend;
mod dialog;
mod dispatch;
mod draw_context;
mod error;
mod font;
#[cfg(feature = "gl")]
mod gl_renderer;
mod input;
mod resource;
mod text_buffer;
mod texture;
mod theme;
mod widgets;

pub use batch::*;
pub use blend::*;
pub use dialog::*;
pub use error::*;
pub use font::*;
#[cfg(feature = "gl")]
pub use gl_renderer::*;
pub use input::*;
pub use resource::*;
pub use rs_math3d::*;
pub use text_buffer::*;
pub use texture::*;
pub use widgets::*;

use bitflags::*;

/// Depth assigned to the layer drawn on top inside a control.
pub const NEAR_BUTTON_DEPTH: f32 = -0.6;
/// Depth assigned to the layer drawn first inside a control.
pub const FAR_BUTTON_DEPTH: f32 = -0.8;
/// Depth of the dialog background quad.
pub const BACKGROUND_DEPTH: f32 = -0.99;

/// Point in dialog space.
pub type Point = Vec2f;

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    /// Opaque white.
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    /// Opaque black.
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };

    /// Returns the color as normalized `[r, g, b, a]` floats.
    pub fn to_f32(self) -> [f32; 4] { [self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0, self.a as f32 / 255.0] }

    /// Builds a color from normalized channels, clamping each to `[0, 1]`.
    pub fn from_f32(c: [f32; 4]) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r: q(c[0]), g: q(c[1]), b: q(c[2]), a: q(c[3]) }
    }

    /// Per-channel linear interpolation on normalized channels.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let a = self.to_f32();
        let b = other.to_f32();
        Self::from_f32([a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t, a[2] + (b[2] - a[2]) * t, a[3] + (b[3] - a[3]) * t])
    }
}

/// Shorthand constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

#[derive(Default, Copy, Clone, Debug, PartialEq)]
/// Axis aligned rectangle in y-up space: `top` is numerically greater than `bottom`.
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// Creates a rectangle from its four edges.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self { Self { left, top, right, bottom } }

    /// Creates a rectangle from its bottom-left corner and size.
    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self { Self::new(x, y + height, x + width, y) }

    /// Horizontal extent.
    pub fn width(&self) -> f32 { self.right - self.left }

    /// Vertical extent.
    pub fn height(&self) -> f32 { self.top - self.bottom }

    /// Returns `true` when the point lies inside the rectangle (left/bottom inclusive, right/top exclusive).
    pub fn contains(&self, pt: Point) -> bool { pt.x >= self.left && pt.x < self.right && pt.y >= self.bottom && pt.y < self.top }

    /// Translates the rectangle.
    pub fn offset(&self, dx: f32, dy: f32) -> Self { Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy) }

    /// Grows the rectangle by `dx` on the left and right and by `dy` on the top and bottom. Negative values shrink it.
    pub fn inflate(&self, dx: f32, dy: f32) -> Self { Self::new(self.left - dx, self.top + dy, self.right + dx, self.bottom - dy) }

    /// Returns the overlap of two rectangles, if any.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(self.left.max(other.left), self.top.min(other.top), self.right.min(other.right), self.bottom.max(other.bottom));
        if r.width() > 0.0 && r.height() > 0.0 { Some(r) } else { None }
    }

    /// Returns `true` if the rectangle encloses no area.
    pub fn is_empty(&self) -> bool { self.width() <= 0.0 || self.height() <= 0.0 }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
/// Visual state of a control, used to pick target colors.
pub enum ControlState {
    /// Idle.
    Normal = 0,
    /// The control is disabled.
    Disabled = 1,
    /// The control is hidden.
    Hidden = 2,
    /// The control owns keyboard focus.
    Focus = 3,
    /// The pointer hovers the control.
    MouseOver = 4,
    /// The pointer button (or space) is held on the control.
    Pressed = 5,
}

impl ControlState {
    /// Number of distinct states.
    pub const COUNT: usize = 6;

    /// Picks the first applicable state in priority order.
    pub fn resolve(visible: bool, enabled: bool, pressed: bool, mouse_over: bool, focused: bool) -> Self {
        if !visible {
            Self::Hidden
        } else if !enabled {
            Self::Disabled
        } else if pressed {
            Self::Pressed
        } else if mouse_over {
            Self::MouseOver
        } else if focused {
            Self::Focus
        } else {
            Self::Normal
        }
    }

    /// Blend rate used while animating toward this state.
    pub fn blend_rate(self) -> f32 { if self == Self::Pressed { 0.0 } else { 0.8 } }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Text placement inside a destination rectangle.
    /// The low nibble holds the horizontal mode and the next nibble the vertical mode.
    pub struct TextFormat : u32 {
        /// Horizontally centered.
        const CENTER = 0x01;
        /// Left aligned.
        const LEFT = 0x02;
        /// Right aligned.
        const RIGHT = 0x03;
        /// Vertically centered.
        const VCENTER = 0x10;
        /// Top aligned.
        const TOP = 0x20;
        /// Bottom aligned.
        const BOTTOM = 0x30;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Alignment along one axis.
pub enum Align {
    /// Left or top.
    Start,
    /// Centered.
    Center,
    /// Right or bottom.
    End,
}

impl TextFormat {
    /// Returns the horizontal alignment.
    pub fn horizontal(&self) -> Align {
        match self.bits() & 0x0F {
            0x01 => Align::Center,
            0x03 => Align::End,
            _ => Align::Start,
        }
    }

    /// Returns the vertical alignment.
    pub fn vertical(&self) -> Align {
        match self.bits() & 0xF0 {
            0x10 => Align::Center,
            0x30 => Align::End,
            _ => Align::Start,
        }
    }
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Identifier of a texture created on the renderer.
pub struct TextureId(u32);

impl TextureId {
    /// Wraps a raw identifier.
    pub fn new(raw: u32) -> Self { Self(raw) }

    /// Returns the raw numeric identifier stored inside the handle.
    pub fn raw(self) -> u32 { self.0 }
}

/// Trait implemented by render backends used by the resource manager.
pub trait Renderer {
    /// Begins a frame. `projection` maps clip-ready positions to the aspect preserving viewport.
    fn begin(&mut self, width: i32, height: i32, projection: &Mat4f);
    /// Draws indexed quads, four vertices each. `None` selects the untextured program.
    fn draw_quads(&mut self, texture: Option<TextureId>, vertices: &[SpriteVertex]);
    /// Draws glyph triangles sampling alpha from `texture`, tinted by `color`.
    fn draw_text(&mut self, texture: TextureId, color: Color, vertices: &[TextVertex]);
    /// Creates a texture owned by the renderer.
    fn create_texture(&mut self, id: TextureId, format: PixelFormat, width: i32, height: i32, pixels: &[u8]);
    /// Destroys a previously created texture.
    fn destroy_texture(&mut self, id: TextureId);
    /// Ends the frame.
    fn end(&mut self);
}

/// Shared handle to the host's [`Renderer`]. Clones point at the same renderer.
pub struct RendererHandle<R: Renderer> {
    handle: Arc<RwLock<R>>,
}

impl<R: Renderer> Clone for RendererHandle<R> {
    fn clone(&self) -> Self { Self { handle: self.handle.clone() } }
}

impl<R: Renderer> RendererHandle<R> {
    /// Takes ownership of `renderer`.
    pub fn new(renderer: R) -> Self { Self { handle: Arc::new(RwLock::new(renderer)) } }

    /// Runs `f` with read access to the renderer.
    pub fn scope<Res>(&self, f: impl FnOnce(&R) -> Res) -> Res { f(&*self.handle.read().unwrap_or_else(PoisonError::into_inner)) }

    /// Runs `f` with write access to the renderer. A poisoned lock is recovered.
    pub fn scope_mut<Res>(&mut self, f: impl FnOnce(&mut R) -> Res) -> Res { f(&mut *self.handle.write().unwrap_or_else(PoisonError::into_inner)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::from_origin(0.1, 0.1, 0.2, 0.05);
        assert!(r.contains(Vec2f::new(0.15, 0.12)));
        assert!(r.contains(Vec2f::new(0.1, 0.1)));
        assert!(!r.contains(Vec2f::new(0.3, 0.12)));
        assert!(!r.contains(Vec2f::new(0.15, 0.15)));
    }

    #[test]
    fn rect_inflate_negative_shrinks() {
        let r = Rect::new(0.0, 1.0, 1.0, 0.0).inflate(-0.1, -0.2);
        assert!((r.left - 0.1).abs() < 1e-6);
        assert!((r.top - 0.8).abs() < 1e-6);
        assert!((r.right - 0.9).abs() < 1e-6);
        assert!((r.bottom - 0.2).abs() < 1e-6);
    }

    #[test]
    fn rect_intersection_of_disjoint_is_none() {
        let a = Rect::new(0.0, 1.0, 1.0, 0.0);
        let b = Rect::new(2.0, 3.0, 3.0, 2.0);
        assert!(a.intersect(&b).is_none());
        assert_eq!(a.intersect(&a), Some(a));
    }

    #[test]
    fn control_state_priority() {
        assert_eq!(ControlState::resolve(false, false, true, true, true), ControlState::Hidden);
        assert_eq!(ControlState::resolve(true, false, true, true, true), ControlState::Disabled);
        assert_eq!(ControlState::resolve(true, true, true, true, true), ControlState::Pressed);
        assert_eq!(ControlState::resolve(true, true, false, true, true), ControlState::MouseOver);
        assert_eq!(ControlState::resolve(true, true, false, false, true), ControlState::Focus);
        assert_eq!(ControlState::resolve(true, true, false, false, false), ControlState::Normal);
        assert_eq!(ControlState::Pressed.blend_rate(), 0.0);
        assert_eq!(ControlState::Focus.blend_rate(), 0.8);
    }

    #[test]
    fn text_format_axes() {
        let f = TextFormat::LEFT | TextFormat::VCENTER;
        assert_eq!(f.horizontal(), Align::Start);
        assert_eq!(f.vertical(), Align::Center);
        let f = TextFormat::RIGHT | TextFormat::BOTTOM;
        assert_eq!(f.horizontal(), Align::End);
        assert_eq!(f.vertical(), Align::End);
        assert_eq!((TextFormat::CENTER | TextFormat::TOP).horizontal(), Align::Center);
    }

    #[test]
    fn color_lerp_endpoints() {
        let a = color(0, 0, 0, 0);
        let b = color(255, 128, 64, 255);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn renderer_handle_clones_share_one_renderer() {
        use crate::batch::tests::{Call, RecordingRenderer};
        let mut a = RendererHandle::new(RecordingRenderer::default());
        let b = a.clone();
        a.scope_mut(|r| r.end());
        assert_eq!(b.scope(|r| r.calls.clone()), vec![Call::End]);
    }
}
