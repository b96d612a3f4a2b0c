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
//! Controls owned by a [`Dialog`](crate::Dialog) and the plumbing they use to report back to it.
//!
//! A control never touches its dialog directly. Handlers queue [`Effect`]s on their
//! [`ControlBase`] and the dialog applies them once the handler returns, which keeps
//! focus changes, radio groups and the event callback in one place.

macro_rules! implement_widget {
    ($ty:ty, $variant:ident) => {
        impl Widget for $ty {
            const TYPE: ControlType = ControlType::$variant;
            fn from_kind(kind: &ControlKind) -> Option<&Self> {
                match kind {
                    ControlKind::$variant(w) => Some(w),
                    _ => None,
                }
            }
            fn from_kind_mut(kind: &mut ControlKind) -> Option<&mut Self> {
                match kind {
                    ControlKind::$variant(w) => Some(w),
                    _ => None,
                }
            }
        }
    };
}

mod button;
mod combo_box;
mod edit_box;
mod list_box;
mod scroll_bar;
mod slider;
mod static_text;

pub use button::*;
pub use combo_box::*;
pub use edit_box::*;
pub use list_box::*;
pub use scroll_bar::*;
pub use slider::*;
pub use static_text::*;

use std::ops::Deref;

use crate::draw_context::DrawCtx;
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Type tag of a control. Also keys the dialog's default-element table.
pub enum ControlType {
    /// Push button.
    Button,
    /// Text label.
    Static,
    /// Two-state check box.
    CheckBox,
    /// Grouped, mutually exclusive check box.
    RadioButton,
    /// Drop-down list.
    ComboBox,
    /// Horizontal value slider.
    Slider,
    /// Single line text field.
    EditBox,
    /// Scrollable item list.
    ListBox,
    /// Vertical scroll bar.
    ScrollBar,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Notification delivered to the dialog callback.
pub enum ControlEvent {
    /// A button was clicked.
    ButtonClicked,
    /// A combo box committed a new selection.
    ComboBoxSelectionChanged,
    /// A radio button changed its checked state.
    RadioButtonChanged,
    /// A check box changed its checked state.
    CheckBoxChanged,
    /// A slider value changed.
    SliderValueChanged,
    /// The pointer was released after dragging a slider.
    SliderValueChangedUp,
    /// Enter was pressed inside an edit box.
    EditBoxString,
    /// The text of an edit box changed.
    EditBoxChange,
    /// A list box row was double clicked, or space was pressed on it.
    ListBoxItemDoubleClick,
    /// The list box selection changed.
    ListBoxSelection,
    /// A list box selection gesture ended.
    ListBoxSelectionEnd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Side effect a control asks its dialog to perform.
pub(crate) enum Effect {
    /// Fire an event; the flag tells whether it came from user input.
    Event(ControlEvent, bool),
    RequestFocus,
    ClearFocus,
    /// Uncheck every other radio button of the group.
    ClearRadioGroup(u32),
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Input routed to a single control. Pointer messages read the position from [`ControlCtx::mouse`].
pub(crate) enum ControlMsg {
    Key { key: Key, action: Action, mods: KeyMods },
    Char(char),
    Press { button: MouseButton, mods: KeyMods },
    Release { button: MouseButton, mods: KeyMods },
    Move,
    /// Wheel movement in lines, positive away from the user.
    Scroll(f32),
}

/// What a handler may read while processing one message.
pub(crate) struct ControlCtx<'a> {
    /// Pointer position in dialog-local space.
    pub(crate) mouse: Point,
    pub(crate) now: f64,
    /// One window pixel in dialog units.
    pub(crate) pixel: f32,
    /// Whether the owning dialog accepts keyboard navigation.
    pub(crate) keyboard_input: bool,
    pub(crate) config: &'a ResourceConfig,
    pub(crate) clipboard: &'a mut dyn Clipboard,
    pub(crate) fonts: &'a [Option<FontNode>],
}

impl ControlCtx<'_> {
    pub(crate) fn font(&self, slot: usize) -> Option<&FontNode> { self.fonts.get(slot).and_then(|f| f.as_ref()) }
}

#[derive(Clone, Debug)]
/// State shared by every control kind.
pub struct ControlBase {
    pub(crate) id: i32,
    pub(crate) rect: Rect,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) mouse_over: bool,
    pub(crate) has_focus: bool,
    pub(crate) is_default: bool,
    pub(crate) hotkey: Option<Key>,
    pub(crate) user_data: usize,
    pub(crate) elements: Vec<Element>,
    pub(crate) outbox: Vec<Effect>,
    /// Derived rectangles need recomputing before the next use.
    pub(crate) stale: bool,
}

impl ControlBase {
    pub(crate) fn new(id: i32, rect: Rect) -> Self {
        Self {
            id,
            rect,
            visible: true,
            enabled: true,
            mouse_over: false,
            has_focus: false,
            is_default: false,
            hotkey: None,
            user_data: 0,
            elements: Vec::new(),
            outbox: Vec::new(),
            stale: true,
        }
    }

    /// Identifier given when the control was added.
    pub fn id(&self) -> i32 { self.id }

    /// Bounding rectangle in dialog-local space.
    pub fn rect(&self) -> Rect { self.rect }

    /// Visibility flag.
    pub fn is_visible(&self) -> bool { self.visible }

    /// Enabled flag.
    pub fn is_enabled(&self) -> bool { self.enabled }

    /// `true` while the pointer hovers the control.
    pub fn is_mouse_over(&self) -> bool { self.mouse_over }

    /// `true` while the control owns keyboard focus.
    pub fn has_focus(&self) -> bool { self.has_focus }

    /// `true` for the dialog's default control.
    pub fn is_default(&self) -> bool { self.is_default }

    /// Activation key, if any.
    pub fn hotkey(&self) -> Option<Key> { self.hotkey }

    /// Opaque value attached by the host.
    pub fn user_data(&self) -> usize { self.user_data }

    /// Visual layers of the control.
    pub fn elements(&self) -> &[Element] { &self.elements }

    /// Visual layer `index`, if present.
    pub fn element(&self, index: usize) -> Option<&Element> { self.elements.get(index) }

    pub(crate) fn emit(&mut self, event: ControlEvent, from_user: bool) { self.outbox.push(Effect::Event(event, from_user)) }

    pub(crate) fn request_focus(&mut self) { self.outbox.push(Effect::RequestFocus) }

    pub(crate) fn clear_focus(&mut self) { self.outbox.push(Effect::ClearFocus) }

    pub(crate) fn state(&self, pressed: bool) -> ControlState { ControlState::resolve(self.visible, self.enabled, pressed, self.mouse_over, self.has_focus) }
}

/// Blends element `index` toward `state` and queues its sprite over `rect`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn blend_sprite(draw: &mut DrawCtx<'_>, base: &mut ControlBase, index: usize, state: ControlState, dt: f32, rate: f32, rect: Rect, depth: f32) {
    if let Some(e) = base.elements.get_mut(index) {
        e.texture_color.blend(state, dt, rate);
        draw.draw_sprite(e, rect, depth);
    }
}

/// Offset applied to pressed and hovered push-style controls.
pub(crate) fn press_offset(state: ControlState, pixel: f32) -> (f32, f32) {
    match state {
        ControlState::Pressed => (pixel, 2.0 * pixel),
        ControlState::MouseOver => (-pixel, -2.0 * pixel),
        _ => (0.0, 0.0),
    }
}

#[derive(Clone, Debug)]
/// Widget specific state of a control.
pub enum ControlKind {
    /// Text label.
    Static(StaticText),
    /// Push button.
    Button(Button),
    /// Check box.
    CheckBox(CheckBox),
    /// Radio button.
    RadioButton(RadioButton),
    /// Combo box.
    ComboBox(ComboBox),
    /// Slider.
    Slider(Slider),
    /// Edit box.
    EditBox(EditBox),
    /// List box.
    ListBox(ListBox),
    /// Scroll bar.
    ScrollBar(ScrollBar),
}

/// Typed access to the widget inside a [`ControlKind`].
pub trait Widget: Sized {
    /// Tag of the control kind holding this widget.
    const TYPE: ControlType;
    /// Borrows the widget out of `kind` when the variant matches.
    fn from_kind(kind: &ControlKind) -> Option<&Self>;
    /// Mutably borrows the widget out of `kind` when the variant matches.
    fn from_kind_mut(kind: &mut ControlKind) -> Option<&mut Self>;
}

implement_widget!(StaticText, Static);
implement_widget!(Button, Button);
implement_widget!(CheckBox, CheckBox);
implement_widget!(RadioButton, RadioButton);
implement_widget!(ComboBox, ComboBox);
implement_widget!(Slider, Slider);
implement_widget!(EditBox, EditBox);
implement_widget!(ListBox, ListBox);
implement_widget!(ScrollBar, ScrollBar);

/// Mutable view of one widget together with its shared control state.
///
/// Events raised through the setters are queued on the control and delivered by
/// [`Dialog::flush_events`](crate::Dialog::flush_events) or the next message or render pass.
pub struct WidgetMut<'a, W> {
    pub(crate) base: &'a mut ControlBase,
    pub(crate) widget: &'a mut W,
}

impl<W> Deref for WidgetMut<'_, W> {
    type Target = W;
    fn deref(&self) -> &W { self.widget }
}

impl<W> WidgetMut<'_, W> {
    /// Shared control state.
    pub fn base(&self) -> &ControlBase { self.base }
}

#[derive(Clone, Debug)]
/// A control: shared state plus the widget specific part.
pub struct Control {
    pub(crate) base: ControlBase,
    pub(crate) kind: ControlKind,
}

impl Control {
    pub(crate) fn new(base: ControlBase, kind: ControlKind) -> Self { Self { base, kind } }

    /// Identifier given when the control was added.
    pub fn id(&self) -> i32 { self.base.id }

    /// Shared control state.
    pub fn base(&self) -> &ControlBase { &self.base }

    /// Widget specific state.
    pub fn kind(&self) -> &ControlKind { &self.kind }

    /// Borrows the widget as `W` when the kind matches.
    pub fn widget<W: Widget>(&self) -> Option<&W> { W::from_kind(&self.kind) }

    /// Type tag.
    pub fn control_type(&self) -> ControlType {
        match &self.kind {
            ControlKind::Static(_) => ControlType::Static,
            ControlKind::Button(_) => ControlType::Button,
            ControlKind::CheckBox(_) => ControlType::CheckBox,
            ControlKind::RadioButton(_) => ControlType::RadioButton,
            ControlKind::ComboBox(_) => ControlType::ComboBox,
            ControlKind::Slider(_) => ControlType::Slider,
            ControlKind::EditBox(_) => ControlType::EditBox,
            ControlKind::ListBox(_) => ControlType::ListBox,
            ControlKind::ScrollBar(_) => ControlType::ScrollBar,
        }
    }

    /// Moves the bottom-left corner, keeping the size.
    pub fn set_location(&mut self, x: f32, y: f32) {
        let r = self.base.rect;
        self.base.rect = Rect::from_origin(x, y, r.width(), r.height());
        self.base.stale = true;
    }

    /// Resizes the control, keeping the bottom-left corner.
    pub fn set_size(&mut self, width: f32, height: f32) {
        let r = self.base.rect;
        self.base.rect = Rect::from_origin(r.left, r.bottom, width, height);
        self.base.stale = true;
    }

    /// Sets or clears the activation key.
    pub fn set_hotkey(&mut self, key: Option<Key>) { self.base.hotkey = key }

    /// Attaches an opaque value.
    pub fn set_user_data(&mut self, data: usize) { self.base.user_data = data }

    /// Replaces visual layer `index`, growing the table with defaults if needed.
    pub fn set_element(&mut self, index: usize, element: &Element) {
        if self.base.elements.len() <= index {
            self.base.elements.resize(index + 1, Element::default());
        }
        self.base.elements[index] = *element;
        self.base.stale = true;
    }

    /// Sets the normal-state text colour of the layers that carry text.
    pub fn set_text_color(&mut self, color: Color) {
        match &mut self.kind {
            ControlKind::EditBox(e) => e.text_color = color,
            ControlKind::ComboBox(_) => {
                for i in [0, 2] {
                    if let Some(e) = self.base.elements.get_mut(i) {
                        e.font_color.set_state(ControlState::Normal, color);
                    }
                }
            }
            _ => {
                if let Some(e) = self.base.elements.get_mut(0) {
                    e.font_color.set_state(ControlState::Normal, color);
                }
            }
        }
    }

    /// Enables or disables the control. Disabling drops any press in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.base.enabled = enabled;
        if !enabled {
            self.cancel_press();
        }
    }

    /// Shows or hides the control. Hiding drops any press in progress.
    pub fn set_visible(&mut self, visible: bool) {
        self.base.visible = visible;
        if !visible {
            self.cancel_press();
        }
    }

    fn cancel_press(&mut self) {
        match &mut self.kind {
            ControlKind::Button(w) => w.pressed = false,
            ControlKind::CheckBox(w) => w.pressed = false,
            ControlKind::RadioButton(w) => w.pressed = false,
            ControlKind::ComboBox(w) => w.pressed = false,
            ControlKind::Slider(w) => w.pressed = false,
            _ => (),
        }
    }

    pub(crate) fn split_mut<W: Widget>(&mut self) -> Option<WidgetMut<'_, W>> {
        let Control { base, kind } = self;
        W::from_kind_mut(kind).map(|widget| WidgetMut { base, widget })
    }

    pub(crate) fn is_edit_box(&self) -> bool { matches!(self.kind, ControlKind::EditBox(_)) }

    /// Recomputes derived rectangles from the bounding box.
    pub(crate) fn update_rects(&mut self, fonts: &[Option<FontNode>], pixel: f32) {
        let font = |slot: Option<usize>| slot.and_then(|s| fonts.get(s)).and_then(|f| f.as_ref());
        let base = &self.base;
        match &mut self.kind {
            ControlKind::CheckBox(w) => w.update_rects(base.rect),
            ControlKind::RadioButton(w) => w.update_rects(base.rect),
            ControlKind::Slider(w) => w.update_rects(base.rect),
            ControlKind::ScrollBar(w) => w.update_rects(base.rect, pixel),
            ControlKind::ListBox(w) => w.update_rects(base.rect, font(base.elements.first().map(|e| e.font_index)), pixel),
            ControlKind::ComboBox(w) => w.update_rects(base.rect, font(base.elements.get(2).map(|e| e.font_index)), pixel),
            ControlKind::EditBox(w) => w.update_rects(base.rect, font(base.elements.first().map(|e| e.font_index)), pixel),
            ControlKind::Static(_) | ControlKind::Button(_) => (),
        }
        self.base.stale = false;
    }

    /// Hit test used for pointer routing.
    pub(crate) fn contains_point(&self, pt: Point) -> bool {
        match &self.kind {
            ControlKind::Static(_) => false,
            ControlKind::Slider(w) => self.base.rect.contains(pt) || w.button_rect().contains(pt),
            ControlKind::ComboBox(w) => self.base.rect.contains(pt) || w.dropdown_contains(pt),
            _ => self.base.rect.contains(pt),
        }
    }

    pub(crate) fn can_have_focus(&self) -> bool {
        match &self.kind {
            ControlKind::Static(_) => false,
            _ => self.base.visible && self.base.enabled,
        }
    }

    /// Offers `msg` to the control. Returns `true` when it was consumed.
    pub(crate) fn handle(&mut self, ctx: &mut ControlCtx<'_>, msg: ControlMsg) -> bool {
        if !self.base.enabled || !self.base.visible {
            return false;
        }
        let base = &mut self.base;
        match &mut self.kind {
            ControlKind::Static(_) => false,
            ControlKind::Button(w) => w.handle_click(base, ctx, msg),
            ControlKind::CheckBox(w) => w.handle_click(base, ctx, msg),
            ControlKind::RadioButton(w) => w.handle_click(base, ctx, msg),
            ControlKind::ComboBox(w) => w.handle(base, ctx, msg),
            ControlKind::Slider(w) => w.handle(base, ctx, msg),
            ControlKind::EditBox(w) => w.handle(base, ctx, msg),
            ControlKind::ListBox(w) => w.handle(base, ctx, msg),
            ControlKind::ScrollBar(w) => w.handle(ctx, msg),
        }
    }

    pub(crate) fn on_focus_in(&mut self, now: f64) {
        self.base.has_focus = true;
        if let ControlKind::EditBox(w) = &mut self.kind {
            w.reset_blink(now);
        }
    }

    pub(crate) fn on_focus_out(&mut self) {
        self.base.has_focus = false;
        match &mut self.kind {
            ControlKind::ScrollBar(w) => w.cancel_drag(),
            ControlKind::ListBox(w) => w.cancel_drag(),
            ControlKind::ComboBox(w) => w.close(),
            ControlKind::EditBox(w) => w.cancel_drag(),
            _ => (),
        }
    }

    pub(crate) fn on_mouse_enter(&mut self) { self.base.mouse_over = true }

    pub(crate) fn on_mouse_leave(&mut self) { self.base.mouse_over = false }

    /// Activates the control through its hot-key.
    pub(crate) fn on_hotkey(&mut self, ctx: &mut ControlCtx<'_>) {
        let base = &mut self.base;
        match &mut self.kind {
            ControlKind::Button(w) => w.click_hotkey(base, ctx),
            ControlKind::CheckBox(w) => w.click_hotkey(base, ctx),
            ControlKind::RadioButton(w) => w.click_hotkey(base, ctx),
            ControlKind::ComboBox(w) => w.on_hotkey(base, ctx),
            _ => (),
        }
    }

    /// Drops transient interaction state and forces every element to fade in again.
    pub(crate) fn refresh(&mut self) {
        self.base.mouse_over = false;
        self.base.has_focus = false;
        for e in &mut self.base.elements {
            e.refresh();
        }
        self.cancel_press();
        if let ControlKind::ComboBox(w) = &mut self.kind {
            w.close();
        }
    }

    pub(crate) fn render(&mut self, draw: &mut DrawCtx<'_>, dt: f32) {
        if !self.base.visible {
            return;
        }
        let base = &mut self.base;
        match &mut self.kind {
            ControlKind::Static(w) => w.render(base, draw, dt),
            ControlKind::Button(w) => w.render(base, draw, dt),
            ControlKind::CheckBox(w) => w.render(base, draw, dt),
            ControlKind::RadioButton(w) => w.render(base, draw, dt),
            ControlKind::ComboBox(w) => w.render(base, draw, dt),
            ControlKind::Slider(w) => w.render(base, draw, dt),
            ControlKind::EditBox(w) => w.render(base, draw, dt),
            ControlKind::ListBox(w) => w.render(base, draw, dt),
            ControlKind::ScrollBar(w) => w.render(base.enabled, base.mouse_over, base.has_focus, &mut base.elements, draw, dt),
        }
    }
}
