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
use super::*;

#[derive(Clone, Debug)]
/// Horizontal slider over a float range.
pub struct Slider {
    min: f32,
    max: f32,
    value: f32,
    step: f32,
    bounds: Rect,
    button_rect: Rect,
    button_x: f32,
    drag_x: f32,
    drag_offset: f32,
    pub(crate) pressed: bool,
}

impl Slider {
    /// Creates a slider over `min..=max`. `value` is clamped into the range.
    pub fn new(min: f32, max: f32, value: f32) -> Result<Self> {
        check_range(min, max)?;
        Ok(Self {
            min,
            max,
            value: value.max(min).min(max),
            step: 1.0,
            bounds: Rect::default(),
            button_rect: Rect::default(),
            button_x: 0.0,
            drag_x: 0.0,
            drag_offset: 0.0,
            pressed: false,
        })
    }

    /// Current value.
    pub fn value(&self) -> f32 { self.value }

    /// `(min, max)`.
    pub fn range(&self) -> (f32, f32) { (self.min, self.max) }

    /// Keyboard and wheel increment.
    pub fn step(&self) -> f32 { self.step }

    /// Thumb rectangle.
    pub fn button_rect(&self) -> Rect { self.button_rect }

    /// `true` while the thumb is held.
    pub fn is_pressed(&self) -> bool { self.pressed }

    pub(crate) fn update_rects(&mut self, bounds: Rect) {
        self.bounds = bounds;
        let side = bounds.height();
        let span = self.max - self.min;
        self.button_x = if span != 0.0 { (self.value - self.min) * bounds.width() / span } else { 0.0 };
        self.button_rect = Rect::new(bounds.left, bounds.top, bounds.left + side, bounds.bottom).offset(self.button_x - side * 0.5, 0.0);
    }

    fn value_from_pos(&self, x: f32) -> f32 {
        let width = self.bounds.width();
        if width <= 0.0 {
            return self.value;
        }
        self.min + (self.max - self.min) / width * (x - self.bounds.left)
    }

    /// Clamps and stores `value`, refreshes the thumb and reports the change.
    ///
    /// Consecutive identical values are still reported; consumers must be idempotent.
    fn set_value_internal(&mut self, base: &mut ControlBase, value: f32, from_user: bool) {
        self.value = value.max(self.min).min(self.max);
        self.update_rects(self.bounds);
        base.emit(ControlEvent::SliderValueChanged, from_user);
    }

    pub(crate) fn handle(&mut self, base: &mut ControlBase, ctx: &mut ControlCtx<'_>, msg: ControlMsg) -> bool {
        let pt = ctx.mouse;
        match msg {
            ControlMsg::Press { button: MouseButton::Left, .. } => {
                if self.button_rect.contains(pt) {
                    self.pressed = true;
                    self.drag_x = pt.x;
                    self.drag_offset = self.bounds.left + self.button_x - self.drag_x;
                    if !base.has_focus {
                        base.request_focus();
                    }
                    return true;
                }
                if self.bounds.contains(pt) {
                    if !base.has_focus {
                        base.request_focus();
                    }
                    let v = self.value_from_pos(pt.x);
                    self.set_value_internal(base, v, true);
                    return true;
                }
                false
            }
            ControlMsg::Release { button: MouseButton::Left, .. } if self.pressed => {
                self.pressed = false;
                base.emit(ControlEvent::SliderValueChangedUp, true);
                true
            }
            ControlMsg::Move if self.pressed => {
                let v = self.value_from_pos(pt.x + self.drag_offset);
                self.set_value_internal(base, v, true);
                true
            }
            ControlMsg::Scroll(lines) => {
                let v = self.value - lines * self.step;
                self.set_value_internal(base, v, true);
                true
            }
            ControlMsg::Key { key, action, .. } if action.is_down() => {
                let page = ((self.max - self.min) / 8.0).max(0.01);
                let v = match key {
                    Key::HOME => self.min,
                    Key::END => self.max,
                    Key::LEFT | Key::DOWN => self.value - self.step,
                    Key::RIGHT | Key::UP => self.value + self.step,
                    Key::PAGE_DOWN => self.value - page,
                    Key::PAGE_UP => self.value + page,
                    _ => return false,
                };
                self.set_value_internal(base, v, true);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn render(&mut self, base: &mut ControlBase, draw: &mut DrawCtx<'_>, dt: f32) {
        let state = base.state(self.pressed);
        let rate = state.blend_rate();
        blend_sprite(draw, base, 0, state, dt, rate, self.bounds, FAR_BUTTON_DEPTH);
        blend_sprite(draw, base, 1, state, dt, rate, self.button_rect, NEAR_BUTTON_DEPTH);
    }
}

fn check_range(min: f32, max: f32) -> Result<()> {
    if min > max {
        return Err(Error::invalid(format!("slider range {}..{} is inverted", min, max)));
    }
    Ok(())
}

impl WidgetMut<'_, Slider> {
    /// Sets the value as a non-user change.
    pub fn set_value(&mut self, value: f32) { self.widget.set_value_internal(self.base, value, false) }

    /// Replaces the range and re-clamps the value. An inverted range leaves the slider untouched.
    pub fn set_range(&mut self, min: f32, max: f32) -> Result<()> {
        check_range(min, max)?;
        self.widget.min = min;
        self.widget.max = max;
        let v = self.widget.value;
        self.widget.set_value_internal(self.base, v, false);
        Ok(())
    }

    /// Sets the keyboard and wheel increment.
    pub fn set_step(&mut self, step: f32) { self.widget.step = step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::tests::*;

    fn slider() -> (ControlBase, Slider) {
        let rect = Rect::from_origin(0.1, 0.1, 0.5, 0.05);
        let mut s = match Slider::new(0.0, 100.0, 50.0) {
            Ok(s) => s,
            Err(e) => panic!("slider: {}", e),
        };
        s.update_rects(rect);
        (ControlBase::new(9, rect), s)
    }

    #[test]
    fn thumb_sits_at_value() {
        let (_, s) = slider();
        let b = s.button_rect();
        assert!(((b.left + b.right) * 0.5 - 0.35).abs() < 1e-5);
    }

    #[test]
    fn track_click_jumps_to_pointer() {
        let mut h = Harness::new();
        let (mut base, mut s) = slider();
        assert!(s.handle(&mut base, &mut h.ctx(0.5, 0.12), press()));
        assert!((s.value() - 80.0).abs() < 1e-3);
        assert!(!s.is_pressed());
        assert_eq!(events(&mut base), vec![ControlEvent::SliderValueChanged]);
    }

    #[test]
    fn drag_keeps_grip_and_reports_release() {
        let mut h = Harness::new();
        let (mut base, mut s) = slider();
        // grab slightly right of the thumb centre
        assert!(s.handle(&mut base, &mut h.ctx(0.36, 0.12), press()));
        assert!(s.is_pressed());
        assert!(s.handle(&mut base, &mut h.ctx(0.41, 0.12), ControlMsg::Move));
        assert!((s.value() - 60.0).abs() < 1e-3);
        assert!(s.handle(&mut base, &mut h.ctx(0.41, 0.12), release()));
        assert_eq!(events(&mut base), vec![ControlEvent::SliderValueChanged, ControlEvent::SliderValueChangedUp]);
    }

    #[test]
    fn value_is_always_clamped() {
        let mut h = Harness::new();
        let (mut base, mut s) = slider();
        for k in [Key::END, Key::PAGE_UP, Key::RIGHT, Key::HOME, Key::PAGE_DOWN, Key::LEFT] {
            s.handle(&mut base, &mut h.ctx(0.0, 0.0), key(k, Action::Press));
            assert!(s.value() >= 0.0 && s.value() <= 100.0);
        }
        assert_eq!(s.value(), 0.0);
        s.handle(&mut base, &mut h.ctx(0.0, 0.0), ControlMsg::Scroll(-500.0));
        assert_eq!(s.value(), 100.0);
        // repeated clamping still reports
        s.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::END, Action::Press));
        assert_eq!(events(&mut base).len(), 8);
    }

    #[test]
    fn set_range_reclamps_as_non_user() {
        let (mut base, mut s) = slider();
        let mut view = WidgetMut { base: &mut base, widget: &mut s };
        assert!(view.set_range(0.0, 10.0).is_ok());
        assert_eq!(view.value(), 10.0);
        assert_eq!(base.outbox, vec![Effect::Event(ControlEvent::SliderValueChanged, false)]);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(Slider::new(10.0, 0.0, 5.0), Err(Error::InvalidArgument(_))));

        let (mut base, mut s) = slider();
        let mut view = WidgetMut { base: &mut base, widget: &mut s };
        assert!(matches!(view.set_range(10.0, 0.0), Err(Error::InvalidArgument(_))));
        assert_eq!(view.range(), (0.0, 100.0));
        assert_eq!(view.value(), 50.0);
        assert!(base.outbox.is_empty());
    }
}
