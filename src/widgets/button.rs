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

/// Press, release and hot-key behaviour shared by push-style controls.
pub(crate) trait Clickable {
    fn pressed(&self) -> bool;
    fn set_pressed(&mut self, pressed: bool);
    /// Action performed when a press completes inside the control.
    fn on_click(&mut self, base: &mut ControlBase);

    fn handle_click(&mut self, base: &mut ControlBase, ctx: &mut ControlCtx<'_>, msg: ControlMsg) -> bool {
        match msg {
            ControlMsg::Key { key, action, .. } if key == Key::SPACE => {
                match action {
                    Action::Press => self.set_pressed(true),
                    Action::Release => {
                        if self.pressed() {
                            self.set_pressed(false);
                            self.on_click(base);
                        }
                    }
                    Action::Repeat => (),
                }
                true
            }
            ControlMsg::Move => {
                if self.pressed() && !base.rect.contains(ctx.mouse) {
                    self.set_pressed(false);
                    if !ctx.keyboard_input {
                        base.clear_focus();
                    }
                }
                false
            }
            ControlMsg::Press { button: MouseButton::Left, .. } if base.rect.contains(ctx.mouse) => {
                self.set_pressed(true);
                if !base.has_focus {
                    base.request_focus();
                }
                true
            }
            ControlMsg::Release { button: MouseButton::Left, .. } if self.pressed() => {
                self.set_pressed(false);
                if !ctx.keyboard_input {
                    base.clear_focus();
                }
                if base.rect.contains(ctx.mouse) {
                    self.on_click(base);
                }
                true
            }
            _ => false,
        }
    }

    /// Hot-key activation skips the pressed animation.
    fn click_hotkey(&mut self, base: &mut ControlBase, ctx: &ControlCtx<'_>) {
        if ctx.keyboard_input {
            base.request_focus();
        }
        self.on_click(base);
    }
}

/// Checked state shared by check boxes and radio buttons.
pub(crate) trait Checkable {
    fn checked(&self) -> bool;
    /// Stores the state and reports it; radio buttons clear their group first when checking.
    fn apply_checked(&mut self, base: &mut ControlBase, checked: bool, from_user: bool);
}

#[derive(Clone, Debug)]
/// Push button.
pub struct Button {
    text: String,
    pub(crate) pressed: bool,
}

impl Button {
    /// Creates a button labelled `text`.
    pub fn new(text: &str) -> Self { Self { text: text.to_string(), pressed: false } }

    /// Label.
    pub fn text(&self) -> &str { &self.text }

    /// `true` while the pointer or space bar holds the button down.
    pub fn is_pressed(&self) -> bool { self.pressed }

    pub(crate) fn render(&mut self, base: &mut ControlBase, draw: &mut DrawCtx<'_>, dt: f32) {
        let state = base.state(self.pressed);
        let rate = state.blend_rate();
        let (dx, dy) = press_offset(state, draw.pixel());
        let rect = base.rect.offset(dx, dy);

        if let Some(e) = base.elements.get_mut(0) {
            e.blend(state, dt, rate);
            draw.draw_sprite(e, rect, FAR_BUTTON_DEPTH);
        }
        if let Some(e) = base.elements.get_mut(1) {
            e.blend(state, dt, rate);
            draw.draw_sprite(e, rect, NEAR_BUTTON_DEPTH);
            draw.draw_text(&self.text, e, rect, true);
        }
    }
}

impl Clickable for Button {
    fn pressed(&self) -> bool { self.pressed }
    fn set_pressed(&mut self, pressed: bool) { self.pressed = pressed }
    fn on_click(&mut self, base: &mut ControlBase) { base.emit(ControlEvent::ButtonClicked, true) }
}

impl WidgetMut<'_, Button> {
    /// Replaces the label.
    pub fn set_text(&mut self, text: &str) { self.widget.text = text.to_string() }
}

#[derive(Clone, Debug)]
/// Check box: a button whose click toggles a checked flag.
pub struct CheckBox {
    text: String,
    checked: bool,
    pub(crate) pressed: bool,
    button_rect: Rect,
    text_rect: Rect,
}

/// Geometry shared by check boxes and radio buttons: a square box on the left, then the label.
fn check_rects(bounds: Rect) -> (Rect, Rect) {
    let mut button = bounds;
    button.right = button.left + bounds.height();
    (button, bounds.offset(button.width() * 1.25, 0.0))
}

/// Rendering shared by check boxes and radio buttons.
#[allow(clippy::too_many_arguments)]
fn render_checkable(text: &str, checked: bool, pressed: bool, button: Rect, label: Rect, base: &mut ControlBase, draw: &mut DrawCtx<'_>, dt: f32) {
    let state = base.state(pressed);
    let rate = state.blend_rate();
    if let Some(e) = base.elements.get_mut(0) {
        e.blend(state, dt, rate);
        draw.draw_sprite(e, button, FAR_BUTTON_DEPTH);
        draw.draw_text(text, e, label, false);
    }
    // the overlay fades out once checked
    let overlay = if checked { ControlState::Hidden } else { state };
    blend_sprite(draw, base, 1, overlay, dt, rate, button, NEAR_BUTTON_DEPTH);
}

impl CheckBox {
    /// Creates a check box labelled `text`.
    pub fn new(text: &str, checked: bool) -> Self {
        Self { text: text.to_string(), checked, pressed: false, button_rect: Rect::default(), text_rect: Rect::default() }
    }

    /// Label.
    pub fn text(&self) -> &str { &self.text }

    /// Checked flag.
    pub fn is_checked(&self) -> bool { self.checked }

    /// `true` while held down.
    pub fn is_pressed(&self) -> bool { self.pressed }

    /// Square box rectangle.
    pub fn button_rect(&self) -> Rect { self.button_rect }

    /// Label rectangle.
    pub fn text_rect(&self) -> Rect { self.text_rect }

    pub(crate) fn update_rects(&mut self, bounds: Rect) { (self.button_rect, self.text_rect) = check_rects(bounds) }

    pub(crate) fn render(&mut self, base: &mut ControlBase, draw: &mut DrawCtx<'_>, dt: f32) {
        render_checkable(&self.text, self.checked, self.pressed, self.button_rect, self.text_rect, base, draw, dt)
    }
}

impl Checkable for CheckBox {
    fn checked(&self) -> bool { self.checked }
    fn apply_checked(&mut self, base: &mut ControlBase, checked: bool, from_user: bool) {
        self.checked = checked;
        base.emit(ControlEvent::CheckBoxChanged, from_user);
    }
}

impl Clickable for CheckBox {
    fn pressed(&self) -> bool { self.pressed }
    fn set_pressed(&mut self, pressed: bool) { self.pressed = pressed }
    fn on_click(&mut self, base: &mut ControlBase) {
        let checked = !self.checked();
        self.apply_checked(base, checked, true)
    }
}

impl WidgetMut<'_, CheckBox> {
    /// Sets the checked flag, reporting it as a non-user change.
    pub fn set_checked(&mut self, checked: bool) { self.widget.apply_checked(self.base, checked, false) }

    /// Replaces the label.
    pub fn set_text(&mut self, text: &str) { self.widget.text = text.to_string() }
}

#[derive(Clone, Debug)]
/// Radio button: a check box that belongs to a group of which at most one member is checked.
pub struct RadioButton {
    text: String,
    checked: bool,
    group: u32,
    pub(crate) pressed: bool,
    button_rect: Rect,
    text_rect: Rect,
}

impl RadioButton {
    /// Creates a radio button in `group`.
    pub fn new(group: u32, text: &str, checked: bool) -> Self {
        Self { text: text.to_string(), checked, group, pressed: false, button_rect: Rect::default(), text_rect: Rect::default() }
    }

    /// Label.
    pub fn text(&self) -> &str { &self.text }

    /// Checked flag.
    pub fn is_checked(&self) -> bool { self.checked }

    /// Group identifier.
    pub fn group(&self) -> u32 { self.group }

    /// `true` while held down.
    pub fn is_pressed(&self) -> bool { self.pressed }

    /// Square box rectangle.
    pub fn button_rect(&self) -> Rect { self.button_rect }

    pub(crate) fn update_rects(&mut self, bounds: Rect) { (self.button_rect, self.text_rect) = check_rects(bounds) }

    /// Sets the state with explicit control over group clearing.
    pub(crate) fn set_checked_internal(&mut self, base: &mut ControlBase, checked: bool, clear_group: bool, from_user: bool) {
        if checked && clear_group {
            base.outbox.push(Effect::ClearRadioGroup(self.group));
        }
        self.checked = checked;
        base.emit(ControlEvent::RadioButtonChanged, from_user);
    }

    pub(crate) fn render(&mut self, base: &mut ControlBase, draw: &mut DrawCtx<'_>, dt: f32) {
        render_checkable(&self.text, self.checked, self.pressed, self.button_rect, self.text_rect, base, draw, dt)
    }
}

impl Checkable for RadioButton {
    fn checked(&self) -> bool { self.checked }
    fn apply_checked(&mut self, base: &mut ControlBase, checked: bool, from_user: bool) { self.set_checked_internal(base, checked, true, from_user) }
}

impl Clickable for RadioButton {
    fn pressed(&self) -> bool { self.pressed }
    fn set_pressed(&mut self, pressed: bool) { self.pressed = pressed }
    fn on_click(&mut self, base: &mut ControlBase) {
        // only another member of the group can uncheck a radio button
        if !self.checked() {
            self.apply_checked(base, true, true)
        }
    }
}

impl WidgetMut<'_, RadioButton> {
    /// Sets the checked flag as a non-user change. Checking clears the rest of the group when `clear_group` is set.
    pub fn set_checked(&mut self, checked: bool, clear_group: bool) { self.widget.set_checked_internal(self.base, checked, clear_group, false) }

    /// Moves the button to another group.
    pub fn set_button_group(&mut self, group: u32) { self.widget.group = group }

    /// Replaces the label.
    pub fn set_text(&mut self, text: &str) { self.widget.text = text.to_string() }
}
