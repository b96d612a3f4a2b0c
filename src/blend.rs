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
//! Per-state colour animation and the element descriptor controls are skinned with.

use crate::*;

/// Rate used by layers that do not track interaction states.
pub const DEFAULT_BLEND_RATE: f32 = 0.7;

/// Default tint of a disabled element.
pub const DISABLED_COLOR: Color = Color { r: 200, g: 128, b: 128, a: 100 };

#[derive(Copy, Clone, Debug, PartialEq)]
/// Colour animated toward one of six per-state targets.
///
/// The current value is kept in normalised floats so slow rates keep converging
/// instead of stalling on 8-bit rounding.
pub struct BlendColor {
    states: [Color; ControlState::COUNT],
    current: [f32; 4],
}

impl Default for BlendColor {
    fn default() -> Self { Self::new(Color::WHITE) }
}

impl BlendColor {
    /// Creates an animator with every state set to `default`, the standard disabled tint and a transparent hidden state.
    pub fn new(default: Color) -> Self { Self::with_states(default, DISABLED_COLOR, Color::TRANSPARENT) }

    /// Creates an animator with explicit disabled and hidden colours. The current colour starts hidden.
    pub fn with_states(default: Color, disabled: Color, hidden: Color) -> Self {
        let mut states = [default; ControlState::COUNT];
        states[ControlState::Disabled as usize] = disabled;
        states[ControlState::Hidden as usize] = hidden;
        Self { states, current: hidden.to_f32() }
    }

    /// Re-initialises all targets, resetting the current colour to hidden.
    pub fn init(&mut self, default: Color, disabled: Color, hidden: Color) { *self = Self::with_states(default, disabled, hidden) }

    /// Moves the current colour toward the target of `state`.
    ///
    /// `rate` is the fraction of the remaining distance left after 1/30 s; `0` snaps, values near `1` crawl.
    pub fn blend(&mut self, state: ControlState, dt: f32, rate: f32) {
        let t = 1.0 - rate.powf(30.0 * dt);
        let target = self.states[state as usize].to_f32();
        for i in 0..4 {
            self.current[i] += (target[i] - self.current[i]) * t;
        }
    }

    /// Target colour for `state`.
    pub fn state(&self, state: ControlState) -> Color { self.states[state as usize] }

    /// Replaces the target colour for `state`.
    pub fn set_state(&mut self, state: ControlState, color: Color) { self.states[state as usize] = color }

    /// Current interpolated colour.
    pub fn current(&self) -> Color { Color::from_f32(self.current) }

    /// Current colour as normalised floats.
    pub fn current_f32(&self) -> [f32; 4] { self.current }

    /// Sets the current colour directly, bypassing the animation.
    pub fn set_current(&mut self, color: Color) { self.current = color.to_f32() }

    /// Snaps the current colour to the target of `state`.
    pub fn set_current_state(&mut self, state: ControlState) { self.current = self.states[state as usize].to_f32() }
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// One visual layer of a control: a texture sub-rect, a font slot, text placement and two tints.
pub struct Element {
    /// Dialog-local texture slot.
    pub texture_index: usize,
    /// Sub-rect of the texture in normalised coordinates; `top` maps to the sprite's top edge.
    pub texture_rect: Rect,
    /// Dialog-local font slot.
    pub font_index: usize,
    /// Text placement flags.
    pub text_format: TextFormat,
    /// Tint applied to the sprite.
    pub texture_color: BlendColor,
    /// Tint applied to text.
    pub font_color: BlendColor,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            texture_index: 0,
            texture_rect: Rect::default(),
            font_index: 0,
            text_format: TextFormat::CENTER | TextFormat::VCENTER,
            texture_color: BlendColor::new(color(255, 255, 255, 0)),
            font_color: BlendColor::new(Color::BLACK),
        }
    }
}

impl Element {
    /// Assigns the texture slot and sub-rect, resetting the texture tint to `default_color`.
    pub fn set_texture(&mut self, index: usize, rect: Rect, default_color: Color) {
        self.texture_index = index;
        self.texture_rect = rect;
        self.texture_color = BlendColor::new(default_color);
    }

    /// Assigns the font slot and text format, resetting the font tint to `default_color`.
    pub fn set_font(&mut self, index: usize, default_color: Color, format: TextFormat) {
        self.font_index = index;
        self.text_format = format;
        self.font_color = BlendColor::new(default_color);
    }

    /// Builder form of [`Element::set_texture`] with the untinted default.
    pub fn with_texture(mut self, index: usize, rect: Rect) -> Self {
        self.set_texture(index, rect, color(255, 255, 255, 0));
        self
    }

    /// Builder form of [`Element::set_font`] with black text.
    pub fn with_font(mut self, index: usize, format: TextFormat) -> Self {
        self.set_font(index, Color::BLACK, format);
        self
    }

    /// Forces both tints back to their hidden colour so they animate in again.
    pub fn refresh(&mut self) {
        self.texture_color.set_current_state(ControlState::Hidden);
        self.font_color.set_current_state(ControlState::Hidden);
    }

    /// Advances both tints toward `state`.
    pub fn blend(&mut self, state: ControlState, dt: f32, rate: f32) {
        self.texture_color.blend(state, dt, rate);
        self.font_color.blend(state, dt, rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 4], b: [f32; 4], eps: f32) -> bool { a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= eps) }

    #[test]
    fn starts_hidden() {
        let b = BlendColor::new(color(10, 20, 30, 255));
        assert_eq!(b.current(), Color::TRANSPARENT);
        assert_eq!(b.state(ControlState::Disabled), DISABLED_COLOR);
        assert_eq!(b.state(ControlState::Focus), color(10, 20, 30, 255));
    }

    #[test]
    fn blend_with_infinite_time_reaches_target() {
        let mut b = BlendColor::new(color(10, 20, 30, 255));
        b.blend(ControlState::Normal, f32::INFINITY, 0.8);
        assert!(close(b.current_f32(), color(10, 20, 30, 255).to_f32(), f32::EPSILON));
    }

    #[test]
    fn zero_rate_snaps() {
        let mut b = BlendColor::new(color(100, 100, 100, 255));
        b.blend(ControlState::Pressed, 1.0 / 60.0, 0.0);
        assert_eq!(b.current(), color(100, 100, 100, 255));
    }

    #[test]
    fn frame_rate_independent() {
        let target = color(255, 0, 128, 255);
        let mut a = BlendColor::new(target);
        let mut b = BlendColor::new(target);
        for _ in 0..60 {
            a.blend(ControlState::Normal, 1.0 / 60.0, 0.8);
        }
        for _ in 0..30 {
            b.blend(ControlState::Normal, 1.0 / 30.0, 0.8);
        }
        assert!(close(a.current_f32(), b.current_f32(), 1e-4));
        // after one second both are effectively at equilibrium
        assert!(close(a.current_f32(), target.to_f32(), 1e-2));
    }

    #[test]
    fn blend_is_deterministic() {
        let mut a = BlendColor::new(Color::WHITE);
        let mut b = a;
        a.blend(ControlState::Focus, 0.016, 0.8);
        b.blend(ControlState::Focus, 0.016, 0.8);
        assert_eq!(a.current_f32(), b.current_f32());
    }

    #[test]
    fn element_refresh_hides_both_tints() {
        let mut e = Element::default().with_texture(0, Rect::new(0.0, 0.0, 1.0, 1.0)).with_font(0, TextFormat::LEFT);
        e.blend(ControlState::Normal, 10.0, 0.5);
        assert_eq!(e.font_color.current(), Color::BLACK);
        e.refresh();
        assert_eq!(e.font_color.current(), Color::TRANSPARENT);
        assert_eq!(e.texture_color.current(), Color::TRANSPARENT);
    }
}
