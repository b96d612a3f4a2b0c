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
//! Dialogs: ordered control lists with a caption, a background, a theme table and the
//! per-dialog half of event routing.

use std::rc::Rc;

use tracing::trace;

use crate::draw_context::{layout_block, DrawCtx};
use crate::resource::Shared;
use crate::theme;
use crate::widgets::{ControlCtx, ControlMsg, Effect};
use crate::*;

/// Callback receiving `(event, control id, control)` for every delivered control event.
pub type EventCallback = Box<dyn FnMut(ControlEvent, i32, &Control)>;

/// Outcome of offering one event to a dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Routed {
    Handled,
    Ignored,
    /// Focus navigation requested; `true` moves forward.
    CycleFocus(bool),
}

const DEFAULT_CAPTION_HEIGHT: f32 = 18.0;

/// A movable, minimisable group of controls.
pub struct Dialog {
    id: DialogId,
    shared: Rc<Shared>,
    pub(crate) controls: Vec<Control>,
    defaults: Vec<(ControlType, usize, Element)>,
    fonts: Vec<Option<FontNode>>,
    textures: Vec<Option<TextureId>>,
    callback: Option<EventCallback>,

    x: f32,
    y: f32,
    width: f32,
    height: f32,

    caption: bool,
    caption_text: String,
    caption_height_px: f32,
    caption_element: Element,
    colors: [Color; 4],

    visible: bool,
    minimized: bool,
    drag: Option<Point>,
    drag_moved: bool,

    keyboard_input: bool,
    mouse_input: bool,
    non_user_events: bool,

    mouse_over: Option<usize>,
    overlay: Vec<(Rect, Color)>,
    last_refresh: f64,
}

impl Dialog {
    pub(crate) fn new(id: DialogId, shared: Rc<Shared>) -> Self {
        let last_refresh = shared.now();
        Self {
            id,
            shared,
            controls: Vec::new(),
            defaults: theme::default_elements(),
            fonts: Vec::new(),
            textures: Vec::new(),
            callback: None,
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            caption: false,
            caption_text: String::new(),
            caption_height_px: DEFAULT_CAPTION_HEIGHT,
            caption_element: theme::caption_element(),
            colors: [Color::TRANSPARENT; 4],
            visible: true,
            minimized: false,
            drag: None,
            drag_moved: false,
            keyboard_input: false,
            mouse_input: true,
            non_user_events: false,
            mouse_over: None,
            overlay: Vec::new(),
            last_refresh,
        }
    }

    /// Identifier assigned by the resource manager.
    pub fn id(&self) -> DialogId { self.id }

    ////////////////////////////////////////////////////////////////////////////
    // adding controls
    ////////////////////////////////////////////////////////////////////////////

    /// Adds a fully built control. The dialog's default elements for its type are applied first.
    pub fn add_control(&mut self, id: i32, rect: Rect, kind: ControlKind) -> Result<()> { self.add_with(id, rect, kind, None, false, |_| Ok(())) }

    #[allow(clippy::too_many_arguments)]
    fn add_with<F: FnOnce(&mut Control) -> Result<()>>(&mut self, id: i32, rect: Rect, kind: ControlKind, hotkey: Option<Key>, is_default: bool, init: F) -> Result<()> {
        if self.controls.iter().any(|c| c.id() == id) {
            return Err(Error::invalid(format!("control id {} is already used in this dialog", id)));
        }
        self.controls.try_reserve(1).map_err(|_| Error::OutOfMemory)?;

        let mut base = ControlBase::new(id, rect);
        base.hotkey = hotkey;
        base.is_default = is_default;
        let mut control = Control::new(base, kind);
        self.init_control(&mut control);
        init(&mut control)?;
        control.base.outbox.clear();
        self.controls.push(control);
        Ok(())
    }

    fn init_control(&self, control: &mut Control) {
        let ty = control.control_type();
        for (t, index, e) in &self.defaults {
            if *t == ty {
                control.set_element(*index, e);
            }
        }
        let mut bar: Vec<(usize, Element)> = self.defaults.iter().filter(|(t, _, _)| *t == ControlType::ScrollBar).map(|(_, i, e)| (*i, *e)).collect();
        bar.sort_by_key(|(i, _)| *i);
        let bar: Vec<Element> = bar.into_iter().map(|(_, e)| e).collect();
        match &mut control.kind {
            ControlKind::ListBox(w) => w.bar_elements = bar,
            ControlKind::ComboBox(w) => w.bar_elements = bar,
            _ => (),
        }
    }

    /// Adds a text label.
    #[allow(clippy::too_many_arguments)]
    pub fn add_static(&mut self, id: i32, text: &str, x: f32, y: f32, width: f32, height: f32, is_default: bool) -> Result<()> {
        self.add_with(id, Rect::from_origin(x, y, width, height), ControlKind::Static(StaticText::new(text)), None, is_default, |_| Ok(()))
    }

    /// Adds a push button.
    #[allow(clippy::too_many_arguments)]
    pub fn add_button(&mut self, id: i32, text: &str, x: f32, y: f32, width: f32, height: f32, hotkey: Option<Key>, is_default: bool) -> Result<()> {
        self.add_with(id, Rect::from_origin(x, y, width, height), ControlKind::Button(Button::new(text)), hotkey, is_default, |_| Ok(()))
    }

    /// Adds a check box.
    #[allow(clippy::too_many_arguments)]
    pub fn add_check_box(&mut self, id: i32, text: &str, x: f32, y: f32, width: f32, height: f32, checked: bool, hotkey: Option<Key>, is_default: bool) -> Result<()> {
        self.add_with(id, Rect::from_origin(x, y, width, height), ControlKind::CheckBox(CheckBox::new(text, checked)), hotkey, is_default, |_| Ok(()))
    }

    /// Adds a radio button to `group`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_radio_button(&mut self, id: i32, group: u32, text: &str, x: f32, y: f32, width: f32, height: f32, checked: bool, hotkey: Option<Key>, is_default: bool) -> Result<()> {
        self.add_with(id, Rect::from_origin(x, y, width, height), ControlKind::RadioButton(RadioButton::new(group, text, checked)), hotkey, is_default, |_| Ok(()))
    }

    /// Adds an empty combo box.
    #[allow(clippy::too_many_arguments)]
    pub fn add_combo_box(&mut self, id: i32, x: f32, y: f32, width: f32, height: f32, hotkey: Option<Key>, is_default: bool) -> Result<()> {
        self.add_with(id, Rect::from_origin(x, y, width, height), ControlKind::ComboBox(ComboBox::new()), hotkey, is_default, |_| Ok(()))
    }

    /// Adds a slider over `min..=max`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_slider(&mut self, id: i32, x: f32, y: f32, width: f32, height: f32, min: f32, max: f32, value: f32, is_default: bool) -> Result<()> {
        let slider = Slider::new(min, max, value)?;
        self.add_with(id, Rect::from_origin(x, y, width, height), ControlKind::Slider(slider), None, is_default, |_| Ok(()))
    }

    /// Adds an edit box holding `text`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_edit_box(&mut self, id: i32, text: &str, x: f32, y: f32, width: f32, height: f32, is_default: bool) -> Result<()> {
        let text = text.to_string();
        let fonts = self.fonts.clone();
        let pixel = self.shared.pixel();
        self.add_with(id, Rect::from_origin(x, y, width, height), ControlKind::EditBox(EditBox::new()), None, is_default, move |c| {
            c.update_rects(&fonts, pixel);
            match c.split_mut::<EditBox>() {
                Some(mut eb) => eb.set_text(&text, false),
                None => Ok(()),
            }
        })
    }

    /// Adds an empty list box.
    #[allow(clippy::too_many_arguments)]
    pub fn add_list_box(&mut self, id: i32, x: f32, y: f32, width: f32, height: f32, style: ListBoxStyle) -> Result<()> {
        self.add_with(id, Rect::from_origin(x, y, width, height), ControlKind::ListBox(ListBox::new(style)), None, false, |_| Ok(()))
    }

    /// Adds a free standing scroll bar.
    pub fn add_scroll_bar(&mut self, id: i32, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.add_with(id, Rect::from_origin(x, y, width, height), ControlKind::ScrollBar(ScrollBar::new()), None, false, |_| Ok(()))
    }

    ////////////////////////////////////////////////////////////////////////////
    // lookup
    ////////////////////////////////////////////////////////////////////////////

    /// Number of controls.
    pub fn control_count(&self) -> usize { self.controls.len() }

    /// Controls in insertion order.
    pub fn controls(&self) -> &[Control] { &self.controls }

    fn index_of(&self, id: i32) -> Option<usize> { self.controls.iter().position(|c| c.id() == id) }

    /// Control with identifier `id`.
    pub fn get_control(&self, id: i32) -> Option<&Control> { self.controls.iter().find(|c| c.id() == id) }

    /// Mutable control with identifier `id`.
    pub fn get_control_mut(&mut self, id: i32) -> Option<&mut Control> { self.controls.iter_mut().find(|c| c.id() == id) }

    /// Control `id` when it is of type `ty`.
    pub fn get_control_of_type(&self, id: i32, ty: ControlType) -> Option<&Control> { self.get_control(id).filter(|c| c.control_type() == ty) }

    /// Widget state of control `id` when it is a `W`.
    pub fn widget<W: Widget>(&self, id: i32) -> Option<&W> { self.get_control(id).and_then(|c| c.widget::<W>()) }

    /// Mutable widget view of control `id` when it is a `W`.
    pub fn widget_mut<W: Widget>(&mut self, id: i32) -> Option<WidgetMut<'_, W>> { self.get_control_mut(id).and_then(|c| c.split_mut::<W>()) }

    /// Label `id`.
    pub fn static_text(&self, id: i32) -> Option<&StaticText> { self.widget(id) }
    /// Mutable label `id`.
    pub fn static_text_mut(&mut self, id: i32) -> Option<WidgetMut<'_, StaticText>> { self.widget_mut(id) }
    /// Button `id`.
    pub fn button(&self, id: i32) -> Option<&Button> { self.widget(id) }
    /// Mutable button `id`.
    pub fn button_mut(&mut self, id: i32) -> Option<WidgetMut<'_, Button>> { self.widget_mut(id) }
    /// Check box `id`.
    pub fn check_box(&self, id: i32) -> Option<&CheckBox> { self.widget(id) }
    /// Mutable check box `id`.
    pub fn check_box_mut(&mut self, id: i32) -> Option<WidgetMut<'_, CheckBox>> { self.widget_mut(id) }
    /// Radio button `id`.
    pub fn radio_button(&self, id: i32) -> Option<&RadioButton> { self.widget(id) }
    /// Mutable radio button `id`.
    pub fn radio_button_mut(&mut self, id: i32) -> Option<WidgetMut<'_, RadioButton>> { self.widget_mut(id) }
    /// Combo box `id`.
    pub fn combo_box(&self, id: i32) -> Option<&ComboBox> { self.widget(id) }
    /// Mutable combo box `id`.
    pub fn combo_box_mut(&mut self, id: i32) -> Option<WidgetMut<'_, ComboBox>> { self.widget_mut(id) }
    /// Slider `id`.
    pub fn slider(&self, id: i32) -> Option<&Slider> { self.widget(id) }
    /// Mutable slider `id`.
    pub fn slider_mut(&mut self, id: i32) -> Option<WidgetMut<'_, Slider>> { self.widget_mut(id) }
    /// Edit box `id`.
    pub fn edit_box(&self, id: i32) -> Option<&EditBox> { self.widget(id) }
    /// Mutable edit box `id`.
    pub fn edit_box_mut(&mut self, id: i32) -> Option<WidgetMut<'_, EditBox>> { self.widget_mut(id) }
    /// List box `id`.
    pub fn list_box(&self, id: i32) -> Option<&ListBox> { self.widget(id) }
    /// Mutable list box `id`.
    pub fn list_box_mut(&mut self, id: i32) -> Option<WidgetMut<'_, ListBox>> { self.widget_mut(id) }
    /// Scroll bar `id`.
    pub fn scroll_bar(&self, id: i32) -> Option<&ScrollBar> { self.widget(id) }
    /// Mutable scroll bar `id`.
    pub fn scroll_bar_mut(&mut self, id: i32) -> Option<&mut ScrollBar> { self.get_control_mut(id).and_then(|c| ScrollBar::from_kind_mut(&mut c.kind)) }

    fn control_index_at(&self, pt: Point) -> Option<usize> { self.controls.iter().position(|c| c.base.enabled && c.base.visible && c.contains_point(pt)) }

    /// First enabled, visible control containing the dialog-local point `pt`.
    pub fn control_at_point(&self, pt: Point) -> Option<&Control> { self.control_index_at(pt).map(|i| &self.controls[i]) }

    /// Enabled flag of control `id`; `false` when there is no such control.
    pub fn control_enabled(&self, id: i32) -> bool { self.get_control(id).is_some_and(|c| c.base.enabled) }

    /// Enables or disables control `id`.
    pub fn set_control_enabled(&mut self, id: i32, enabled: bool) -> Result<()> {
        let c = self.get_control_mut(id).ok_or_else(|| Error::invalid(format!("no control {}", id)))?;
        c.set_enabled(enabled);
        Ok(())
    }

    ////////////////////////////////////////////////////////////////////////////
    // removal and refresh
    ////////////////////////////////////////////////////////////////////////////

    /// Removes control `id`, clearing focus, pressed and hover references to it.
    pub fn remove_control(&mut self, id: i32) -> Option<Control> {
        let index = self.index_of(id)?;
        let control = self.controls.remove(index);
        self.shared.input.borrow_mut().forget_control(self.id, index);
        self.mouse_over = match self.mouse_over {
            Some(i) if i == index => None,
            Some(i) if i > index => Some(i - 1),
            m => m,
        };
        Some(control)
    }

    /// Removes every control.
    pub fn remove_all_controls(&mut self) {
        self.shared.input.borrow_mut().forget_dialog(self.id);
        self.controls.clear();
        self.mouse_over = None;
    }

    /// Drops focus, press and hover state and makes every element fade in again. With keyboard
    /// input enabled the default control then takes focus.
    pub fn refresh(&mut self) {
        {
            let mut input = self.shared.input.borrow_mut();
            if input.focus.is_some_and(|k| k.dialog == self.id) {
                input.set_focus(None, false);
            }
            if input.pressed.is_some_and(|k| k.dialog == self.id) {
                input.pressed = None;
            }
            input.blurred.retain(|k| k.dialog != self.id);
        }
        self.mouse_over = None;
        for c in &mut self.controls {
            c.refresh();
        }
        if self.keyboard_input {
            self.focus_default_control();
        }
        self.last_refresh = self.shared.now();
    }

    /// Moves focus to the first control flagged as default.
    pub fn focus_default_control(&mut self) {
        if let Some(i) = self.controls.iter().position(|c| c.base.is_default) {
            self.focus_index(i);
        }
    }

    /// Gives focus to control `id`. Returns `false` when it cannot take focus.
    pub fn request_focus(&mut self, id: i32) -> bool {
        match self.index_of(id) {
            Some(i) => self.focus_index(i),
            None => false,
        }
    }

    /// Removes focus from whichever control has it.
    pub fn clear_focus(&mut self) {
        self.shared.input.borrow_mut().set_focus(None, false);
        self.settle_focus();
    }

    /// Index of the focused control when it lives in this dialog.
    pub fn focused_index(&self) -> Option<usize> { self.shared.input.borrow().focus_in(self.id) }

    pub(crate) fn focus_index(&mut self, index: usize) -> bool {
        let Some(c) = self.controls.get(index) else { return false };
        if !c.can_have_focus() {
            return false;
        }
        let key = ControlKey { dialog: self.id, index };
        if self.shared.input.borrow().focus == Some(key) {
            return true;
        }
        let is_edit = c.is_edit_box();
        self.shared.input.borrow_mut().set_focus(Some(key), is_edit);
        self.settle_focus();
        let now = self.shared.now();
        self.controls[index].on_focus_in(now);
        true
    }

    /// Runs focus-out on controls of this dialog that lost focus; others stay queued for their dialogs.
    fn settle_focus(&mut self) {
        let mine: Vec<usize> = {
            let mut input = self.shared.input.borrow_mut();
            let id = self.id;
            let mine = input.blurred.iter().filter(|k| k.dialog == id).map(|k| k.index).collect();
            input.blurred.retain(|k| k.dialog != id);
            mine
        };
        for i in mine {
            self.blur_control(i);
        }
    }

    pub(crate) fn blur_control(&mut self, index: usize) {
        if let Some(c) = self.controls.get_mut(index) {
            trace!(dialog = self.id.raw(), control = c.id(), "focus out");
            c.on_focus_out();
        }
    }

    /// Unchecks every radio button of `group`.
    pub fn clear_radio_button_group(&mut self, group: u32) { self.uncheck_group(group, None) }

    fn uncheck_group(&mut self, group: u32, except: Option<usize>) {
        for (i, c) in self.controls.iter_mut().enumerate() {
            if Some(i) == except {
                continue;
            }
            let Control { base, kind } = c;
            if let ControlKind::RadioButton(r) = kind {
                if r.group() == group && r.is_checked() {
                    r.set_checked_internal(base, false, false, false);
                }
            }
        }
    }

    /// Removes every entry of combo box `id`.
    pub fn clear_combo_box(&mut self, id: i32) -> Result<()> {
        let mut cb = self.combo_box_mut(id).ok_or_else(|| Error::invalid(format!("no combo box {}", id)))?;
        cb.remove_all_items();
        Ok(())
    }

    ////////////////////////////////////////////////////////////////////////////
    // theme, fonts, textures
    ////////////////////////////////////////////////////////////////////////////

    /// Sets the element installed as layer `index` of controls of type `ty` added from now on.
    pub fn set_default_element(&mut self, ty: ControlType, index: usize, element: &Element) {
        match self.defaults.iter_mut().find(|(t, i, _)| *t == ty && *i == index) {
            Some(slot) => slot.2 = *element,
            None => self.defaults.push((ty, index, *element)),
        }
    }

    /// Default layer `index` for controls of type `ty`.
    pub fn default_element(&self, ty: ControlType, index: usize) -> Option<&Element> { self.defaults.iter().find(|(t, i, _)| *t == ty && *i == index).map(|(_, _, e)| e) }

    /// Maps font slot `slot` to `font`.
    pub fn set_font(&mut self, slot: usize, font: Option<FontNode>) {
        if self.fonts.len() <= slot {
            self.fonts.resize(slot + 1, None);
        }
        self.fonts[slot] = font;
        self.invalidate_layout();
    }

    /// Font in slot `slot`.
    pub fn font(&self, slot: usize) -> Option<&FontNode> { self.fonts.get(slot).and_then(|f| f.as_ref()) }

    /// Maps texture slot `slot` to a renderer texture.
    pub fn set_texture(&mut self, slot: usize, texture: Option<TextureId>) {
        if self.textures.len() <= slot {
            self.textures.resize(slot + 1, None);
        }
        self.textures[slot] = texture;
    }

    /// Texture in slot `slot`.
    pub fn texture(&self, slot: usize) -> Option<TextureId> { self.textures.get(slot).copied().flatten() }

    pub(crate) fn invalidate_layout(&mut self) {
        for c in &mut self.controls {
            c.base.stale = true;
        }
    }

    fn ensure_layout(&mut self) {
        let pixel = self.shared.pixel();
        for c in &mut self.controls {
            if c.base.stale {
                c.update_rects(&self.fonts, pixel);
            }
        }
    }

    /// Bounding box of `text` laid out in `dest` with `element`'s font and format.
    pub fn calc_text_rect(&self, text: &str, element: &Element, dest: Rect) -> Option<Rect> {
        let font = self.font(element.font_index)?;
        Some(layout_block(font, text, element.text_format, dest))
    }

    /// Queues an untextured rectangle in dialog space, drawn above the controls on the next render.
    pub fn draw_rect(&mut self, rect: Rect, color: Color) { self.overlay.push((rect, color)) }

    ////////////////////////////////////////////////////////////////////////////
    // appearance and geometry
    ////////////////////////////////////////////////////////////////////////////

    /// Background gradient by corner.
    pub fn set_background_colors(&mut self, top_left: Color, top_right: Color, bottom_left: Color, bottom_right: Color) {
        self.colors = [top_left, top_right, bottom_right, bottom_left];
    }

    /// Flat background.
    pub fn set_background_color(&mut self, color: Color) { self.colors = [color; 4] }

    /// Shows or hides the caption strip.
    pub fn enable_caption(&mut self, enable: bool) { self.caption = enable }

    /// Caption visibility.
    pub fn is_caption_enabled(&self) -> bool { self.caption }

    /// Caption label.
    pub fn set_caption_text(&mut self, text: &str) { self.caption_text = text.to_string() }

    /// Caption label.
    pub fn caption_text(&self) -> &str { &self.caption_text }

    /// Caption height in pixels.
    pub fn set_caption_height(&mut self, px: f32) { self.caption_height_px = px }

    /// Caption height in pixels.
    pub fn caption_height(&self) -> f32 { self.caption_height_px }

    /// Replaces the caption's element.
    pub fn set_caption_element(&mut self, element: &Element) { self.caption_element = *element }

    /// Bottom-left corner in normalised screen space.
    pub fn location(&self) -> Point { Vec2f::new(self.x, self.y) }

    /// Moves the bottom-left corner.
    pub fn set_location(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Width in dialog units.
    pub fn width(&self) -> f32 { self.width }

    /// Height in dialog units.
    pub fn height(&self) -> f32 { self.height }

    /// Resizes the dialog.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Visibility.
    pub fn is_visible(&self) -> bool { self.visible }

    /// Shows or hides the dialog; hidden dialogs neither draw nor receive events.
    pub fn set_visible(&mut self, visible: bool) { self.visible = visible }

    /// Minimised dialogs only draw their caption.
    pub fn is_minimized(&self) -> bool { self.minimized }

    /// Collapses or restores the dialog.
    pub fn set_minimized(&mut self, minimized: bool) { self.minimized = minimized }

    /// Enables Tab and arrow focus navigation.
    pub fn enable_keyboard_input(&mut self, enable: bool) { self.keyboard_input = enable }

    /// Keyboard navigation flag.
    pub fn is_keyboard_input_enabled(&self) -> bool { self.keyboard_input }

    /// Enables pointer input.
    pub fn enable_mouse_input(&mut self, enable: bool) { self.mouse_input = enable }

    /// Pointer input flag.
    pub fn is_mouse_input_enabled(&self) -> bool { self.mouse_input }

    /// Also deliver events caused by programmatic changes.
    pub fn enable_non_user_events(&mut self, enable: bool) { self.non_user_events = enable }

    /// Non-user event flag.
    pub fn is_non_user_events_enabled(&self) -> bool { self.non_user_events }

    /// Installs the event callback.
    pub fn set_callback(&mut self, callback: EventCallback) { self.callback = Some(callback) }

    /// Removes the event callback.
    pub fn clear_callback(&mut self) { self.callback = None }

    fn caption_height_units(&self) -> f32 { self.caption_height_px * self.shared.pixel() }

    /// Caption strip along the top edge, dialog local.
    fn caption_rect(&self) -> Rect { Rect::new(0.0, self.height, self.width, self.height - self.caption_height_units()) }

    fn local_mouse(&self) -> Point {
        let p = self.shared.cursor();
        Vec2f::new(p.x - self.x, p.y - self.y)
    }

    ////////////////////////////////////////////////////////////////////////////
    // events
    ////////////////////////////////////////////////////////////////////////////

    /// Applies the effects queued by controls and delivers their events to the callback.
    pub fn flush_events(&mut self) {
        loop {
            let mut pending = Vec::new();
            for (i, c) in self.controls.iter_mut().enumerate() {
                pending.extend(c.base.outbox.drain(..).map(|e| (i, e)));
            }
            if pending.is_empty() {
                break;
            }
            for (index, effect) in pending {
                self.apply(index, effect);
            }
        }
    }

    fn apply(&mut self, index: usize, effect: Effect) {
        match effect {
            Effect::Event(event, from_user) => {
                if !from_user && !self.non_user_events {
                    return;
                }
                if let (Some(cb), Some(c)) = (self.callback.as_mut(), self.controls.get(index)) {
                    cb(event, c.id(), c);
                }
            }
            Effect::RequestFocus => {
                self.focus_index(index);
            }
            Effect::ClearFocus => {
                let key = ControlKey { dialog: self.id, index };
                if self.shared.input.borrow().focus == Some(key) {
                    self.clear_focus();
                }
            }
            Effect::ClearRadioGroup(group) => self.uncheck_group(group, Some(index)),
        }
    }

    /// Builds the handler context for control `index` and runs `f` with it.
    fn with_ctx<T>(&mut self, index: usize, f: impl FnOnce(&mut Control, &mut ControlCtx<'_>) -> T) -> Option<T> {
        let shared = self.shared.clone();
        let mouse = self.local_mouse();
        let control = self.controls.get_mut(index)?;
        let mut clipboard = shared.clipboard.borrow_mut();
        let mut ctx = ControlCtx {
            mouse,
            now: shared.now(),
            pixel: shared.pixel(),
            keyboard_input: self.keyboard_input,
            config: &shared.config,
            clipboard: &mut **clipboard,
            fonts: &self.fonts,
        };
        Some(f(control, &mut ctx))
    }

    /// Offers `msg` to control `index`, then settles the effects it queued.
    fn offer(&mut self, index: usize, msg: ControlMsg) -> bool {
        let handled = self.with_ctx(index, |c, ctx| c.handle(ctx, msg)).unwrap_or(false);
        if handled {
            if let ControlMsg::Press { button: MouseButton::Left, .. } = msg {
                self.shared.input.borrow_mut().pressed = Some(ControlKey { dialog: self.id, index });
            }
        }
        self.flush_events();
        handled
    }

    fn on_mouse_move(&mut self, pt: Point) {
        let over = self.control_index_at(pt);
        if over == self.mouse_over {
            return;
        }
        if let Some(c) = self.mouse_over.and_then(|i| self.controls.get_mut(i)) {
            c.on_mouse_leave();
        }
        self.mouse_over = over;
        if let Some(c) = over.and_then(|i| self.controls.get_mut(i)) {
            c.on_mouse_enter();
        }
    }

    /// Index of the hovered control.
    pub fn mouse_over_index(&self) -> Option<usize> { self.mouse_over }

    /// Routes one host event through this dialog.
    pub(crate) fn msg_proc(&mut self, event: &Event) -> Routed {
        if !self.visible {
            return Routed::Ignored;
        }
        self.ensure_layout();

        if self.caption {
            if let Some(r) = self.caption_event(event) {
                return r;
            }
        }

        if self.minimized {
            return Routed::Ignored;
        }

        let msg = control_msg(event);
        let focus = self.focused_index().filter(|i| self.controls.get(*i).is_some_and(|c| c.base.enabled));
        if let (Some(i), Some(msg)) = (focus, msg) {
            if self.offer(i, msg) {
                return Routed::Handled;
            }
        }

        match *event {
            Event::Resize { .. } | Event::Pos { .. } => self.on_mouse_move(Vec2f::new(-1.0, -1.0)),
            Event::Focus(gained) => {
                let now = self.shared.now();
                if let Some(c) = focus.and_then(|i| self.controls.get_mut(i)) {
                    if gained { c.on_focus_in(now) } else { c.on_focus_out() }
                }
            }
            Event::Key { key, action, mods, .. } => {
                if action != Action::Press {
                    return Routed::Ignored;
                }
                if !self.shared.input.borrow().focus_edit {
                    if let Some(i) = self.controls.iter().position(|c| c.base.hotkey == Some(key) && c.base.enabled && c.base.visible) {
                        self.with_ctx(i, |c, ctx| c.on_hotkey(ctx));
                        self.flush_events();
                        return Routed::Handled;
                    }
                }
                if !self.keyboard_input {
                    return Routed::Ignored;
                }
                let (any_focus, mine) = {
                    let input = self.shared.input.borrow();
                    (input.focus.is_some(), input.focus.is_none_or(|k| k.dialog == self.id))
                };
                if !mine {
                    return Routed::Ignored;
                }
                match key {
                    Key::RIGHT | Key::DOWN if any_focus => return Routed::CycleFocus(true),
                    Key::LEFT | Key::UP if any_focus => return Routed::CycleFocus(false),
                    Key::TAB => return Routed::CycleFocus(!mods.is_shift()),
                    _ => (),
                }
            }
            Event::MouseButton { .. } | Event::Scroll { .. } | Event::CursorPos { .. } => {
                if !self.mouse_input {
                    return Routed::Ignored;
                }
                let local = self.local_mouse();
                match self.control_index_at(local) {
                    Some(i) => {
                        if let Some(msg) = msg {
                            if self.offer(i, msg) {
                                return Routed::Handled;
                            }
                        }
                    }
                    None => {
                        if let Event::MouseButton { button: MouseButton::Left, action: Action::Press, .. } = event {
                            if self.focused_index().is_some() {
                                self.clear_focus();
                            }
                        }
                    }
                }
                if let Event::CursorPos { .. } = event {
                    self.on_mouse_move(local);
                }
            }
            Event::CursorEnter(false) => {
                self.drag = None;
            }
            _ => (),
        }
        Routed::Ignored
    }

    /// Caption drag and minimise toggling.
    fn caption_event(&mut self, event: &Event) -> Option<Routed> {
        let local = self.local_mouse();
        let in_caption = self.caption_rect().contains(local);
        match *event {
            Event::MouseButton { button: MouseButton::Left, action: Action::Press, .. } if in_caption => {
                self.drag = Some(self.shared.cursor());
                self.drag_moved = false;
                Some(Routed::Handled)
            }
            Event::MouseButton { button: MouseButton::Left, action: Action::Release, .. } if self.drag.is_some() => {
                self.drag = None;
                if in_caption && !self.drag_moved {
                    self.minimized = !self.minimized;
                }
                Some(Routed::Handled)
            }
            Event::CursorPos { .. } => {
                let from = self.drag?;
                let to = self.shared.cursor();
                self.x += to.x - from.x;
                self.y += to.y - from.y;
                self.drag = Some(to);
                self.drag_moved = true;
                Some(Routed::Handled)
            }
            _ => None,
        }
    }

    ////////////////////////////////////////////////////////////////////////////
    // rendering
    ////////////////////////////////////////////////////////////////////////////

    /// Emits this dialog's geometry. Layers start at `base_layer`: background and caption,
    /// then one per control in insertion order, then the focused control, then the overlay.
    pub(crate) fn render_into(&mut self, sprites: &mut SpriteBatch, text: &mut TextBatch, base_layer: u32, dt: f32) {
        if !self.visible {
            return;
        }
        let now = self.shared.now();
        if let Some(period) = self.shared.config.refresh_time {
            if now - self.last_refresh >= period {
                self.refresh();
            }
        }
        self.ensure_layout();

        let focus = self.focused_index();
        let pixel = self.shared.pixel();
        let top = base_layer + self.controls.len() as u32 + 1;
        let mut draw = DrawCtx::new(sprites, text, &self.textures, &self.fonts, Vec2f::new(self.x, self.y), pixel, now, self.shared.config.caret_blink_period);
        draw.set_layer(base_layer);

        let bounds = Rect::from_origin(0.0, 0.0, self.width, self.height);
        if !self.minimized && self.colors.iter().any(|c| c.a > 0) {
            draw.draw_gradient(bounds, self.colors, BACKGROUND_DEPTH);
        }

        if self.caption {
            let cap = Rect::new(0.0, self.height, self.width, self.height - self.caption_height_px * pixel);
            draw.draw_sprite(&self.caption_element, cap, BACKGROUND_DEPTH);
            let label = if self.minimized { format!("{} (Minimized)", self.caption_text) } else { self.caption_text.clone() };
            draw.draw_text(&label, &self.caption_element, cap.inflate(-4.0 * pixel, 0.0), true);
        }

        if !self.minimized {
            for (i, c) in self.controls.iter_mut().enumerate() {
                if Some(i) == focus {
                    continue;
                }
                draw.set_layer(base_layer + i as u32 + 1);
                c.render(&mut draw, dt);
            }
            if let Some(c) = focus.and_then(|i| self.controls.get_mut(i)) {
                draw.set_layer(top);
                c.render(&mut draw, dt);
            }
            draw.set_layer(top + 1);
            for (rect, color) in self.overlay.drain(..) {
                draw.draw_rect(rect, color, NEAR_BUTTON_DEPTH);
            }
        }
        self.flush_events();
    }
}

/// Translates a host event into what a single control understands.
pub(crate) fn control_msg(event: &Event) -> Option<ControlMsg> {
    match *event {
        Event::MouseButton { button, action: Action::Press, mods } => Some(ControlMsg::Press { button, mods }),
        Event::MouseButton { button, action: Action::Release, mods } => Some(ControlMsg::Release { button, mods }),
        Event::CursorPos { .. } => Some(ControlMsg::Move),
        Event::Scroll { dy, .. } => Some(ControlMsg::Scroll(dy)),
        Event::Key { key, action, mods, .. } => Some(ControlMsg::Key { key, action, mods }),
        Event::Char(c) => Some(ControlMsg::Char(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::tests::{Call, RecordingRenderer};
    use crate::resource::tests::{calls, manager};

    fn dialog(rm: &mut ResourceManager<RecordingRenderer>) -> DialogId { rm.add_dialog() }

    fn with<T>(rm: &mut ResourceManager<RecordingRenderer>, id: DialogId, f: impl FnOnce(&mut Dialog) -> T) -> T {
        match rm.dialog_mut(id) {
            Some(d) => f(d),
            None => panic!("dialog {:?} missing", id),
        }
    }

    #[test]
    fn new_controls_receive_the_default_elements() {
        let (mut rm, _) = manager();
        let d = dialog(&mut rm);
        with(&mut rm, d, |dl| {
            dl.add_button(1, "ok", 0.1, 0.1, 0.2, 0.05, None, false).expect("button");
            dl.add_edit_box(2, "hi", 0.1, 0.3, 0.3, 0.06, false).expect("edit box");
            dl.add_list_box(3, 0.5, 0.1, 0.3, 0.4, ListBoxStyle::NONE).expect("list box");
            assert_eq!(dl.get_control(1).map(|c| c.base().elements().len()), Some(2));
            assert_eq!(dl.get_control(2).map(|c| c.base().elements().len()), Some(9));
            assert_eq!(dl.edit_box(2).map(|e| e.text()), Some("hi".to_string()));
            assert_eq!(dl.list_box(3).map(|l| l.bar_elements.len()), Some(4));
        });
    }

    #[test]
    fn changed_defaults_apply_to_later_controls_only() {
        let (mut rm, _) = manager();
        let d = dialog(&mut rm);
        with(&mut rm, d, |dl| {
            dl.add_button(1, "a", 0.1, 0.1, 0.2, 0.05, None, false).expect("button");
            let e = Element::default().with_texture(0, Rect::new(0.0, 0.5, 0.5, 0.0));
            dl.set_default_element(ControlType::Button, 0, &e);
            dl.add_button(2, "b", 0.1, 0.2, 0.2, 0.05, None, false).expect("button");
            assert_eq!(dl.default_element(ControlType::Button, 0).map(|x| x.texture_rect), Some(e.texture_rect));
            assert_eq!(dl.get_control(2).and_then(|c| c.base().element(0)).map(|x| x.texture_rect), Some(e.texture_rect));
            assert_ne!(dl.get_control(1).and_then(|c| c.base().element(0)).map(|x| x.texture_rect), Some(e.texture_rect));
        });
    }

    #[test]
    fn duplicate_ids_and_bad_ranges_leave_the_dialog_untouched() {
        let (mut rm, _) = manager();
        let d = dialog(&mut rm);
        with(&mut rm, d, |dl| {
            dl.add_button(1, "a", 0.1, 0.1, 0.2, 0.05, None, false).expect("button");
            assert!(matches!(dl.add_check_box(1, "b", 0.1, 0.2, 0.2, 0.05, false, None, false), Err(Error::InvalidArgument(_))));
            assert!(dl.add_slider(2, 0.1, 0.3, 0.2, 0.05, 5.0, 1.0, 2.0, false).is_err());
            assert_eq!(dl.control_count(), 1);
            assert!(dl.get_control_of_type(1, ControlType::Button).is_some());
            assert!(dl.get_control_of_type(1, ControlType::CheckBox).is_none());
        });
    }

    #[test]
    fn point_lookup_skips_disabled_and_static_controls() {
        let (mut rm, _) = manager();
        let d = dialog(&mut rm);
        with(&mut rm, d, |dl| {
            dl.add_static(1, "label", 0.1, 0.1, 0.2, 0.05, false).expect("static");
            dl.add_button(2, "b", 0.1, 0.1, 0.2, 0.05, None, false).expect("button");
            let pt = Vec2f::new(0.15, 0.12);
            assert_eq!(dl.control_at_point(pt).map(|c| c.id()), Some(2));
            dl.set_control_enabled(2, false).expect("exists");
            assert!(!dl.control_enabled(2));
            assert!(dl.control_at_point(pt).is_none());
            assert!(dl.set_control_enabled(99, true).is_err());
        });
    }

    #[test]
    fn focused_control_renders_last() {
        let (mut rm, _) = manager();
        let d = dialog(&mut rm);
        with(&mut rm, d, |dl| {
            dl.set_background_color(color(10, 20, 30, 255));
            dl.add_button(1, "a", 0.1, 0.1, 0.2, 0.05, None, false).expect("button");
            dl.add_button(2, "b", 0.1, 0.2, 0.2, 0.05, None, false).expect("button");
            assert!(dl.request_focus(1));
        });
        rm.render_dialog(d, 1.0 / 60.0).expect("render");
        let (quads, c) = rm.renderer_handle().scope(|r| (r.quads.clone(), r.calls.clone()));
        let frame: Vec<&Call> = c.iter().skip_while(|c| !matches!(c, Call::Begin(..))).collect();
        assert_eq!(frame[1], &Call::Quads(None, 1));
        assert!((quads[0].pos[2] - BACKGROUND_DEPTH).abs() < 1e-6);
        // bottom-left corner of the last quad belongs to button 1
        let last = quads[quads.len() - 1];
        assert!((last.pos[1] - (2.0 * 0.1 - 1.0)).abs() < 1e-5);
        assert_eq!(frame.last(), Some(&&Call::End));
    }

    #[test]
    fn transparent_background_is_skipped() {
        let (mut rm, _) = manager();
        let d = dialog(&mut rm);
        rm.render_dialog(d, 0.0).expect("render");
        let c = calls(&rm);
        assert!(!c.iter().any(|c| matches!(c, Call::Quads(None, _))));
        assert!(rm.render_dialog(DialogId::default(), 0.0).is_err());
    }

    #[test]
    fn minimised_caption_carries_a_marker() {
        let (mut rm, _) = manager();
        let d = dialog(&mut rm);
        with(&mut rm, d, |dl| {
            dl.enable_caption(true);
            dl.set_caption_text("ab");
        });
        rm.render_dialog(d, 0.0).expect("render");
        let count = |rm: &ResourceManager<RecordingRenderer>| {
            calls(rm).iter().rev().take_while(|c| !matches!(c, Call::Begin(..))).map(|c| if let Call::Text(_, _, n) = c { *n } else { 0 }).sum::<usize>()
        };
        // shadow plus text, six vertices per glyph
        assert_eq!(count(&rm), 2 * 2 * 6);
        with(&mut rm, d, |dl| dl.set_minimized(true));
        rm.render_dialog(d, 0.0).expect("render");
        assert_eq!(count(&rm), 2 * "ab (Minimized)".len() * 6);
    }

    #[test]
    fn refresh_resets_state_and_focuses_the_default() {
        let (mut rm, _) = manager();
        let d = dialog(&mut rm);
        with(&mut rm, d, |dl| {
            dl.add_button(1, "a", 0.1, 0.1, 0.2, 0.05, None, false).expect("button");
            dl.add_button(2, "b", 0.1, 0.2, 0.2, 0.05, None, true).expect("button");
            assert!(dl.request_focus(1));
            dl.refresh();
            assert_eq!(dl.focused_index(), None);
            dl.enable_keyboard_input(true);
            dl.refresh();
            assert_eq!(dl.focused_index(), Some(1));
            assert!(dl.get_control(2).is_some_and(|c| c.base().has_focus()));
        });
    }

    #[test]
    fn periodic_refresh_follows_the_clock() {
        let clock = ManualClock::new(0.0);
        let renderer = RendererHandle::new(RecordingRenderer::default());
        let config = ResourceConfig::default().with_refresh_time(2.0);
        let mut rm = ResourceManager::with_services(renderer, config, Box::new(clock.clone()), Box::new(MemoryClipboard::default()));
        let d = rm.add_dialog();
        with(&mut rm, d, |dl| {
            dl.add_button(1, "a", 0.1, 0.1, 0.2, 0.05, None, false).expect("button");
            assert!(dl.request_focus(1));
        });
        clock.set(1.0);
        rm.render_all(0.0);
        assert!(rm.focused_control().is_some());
        clock.set(2.5);
        rm.render_all(0.0);
        assert!(rm.focused_control().is_none());
    }

    #[test]
    fn clearing_helpers() {
        let (mut rm, _) = manager();
        let d = dialog(&mut rm);
        with(&mut rm, d, |dl| {
            dl.add_combo_box(1, 0.1, 0.1, 0.3, 0.05, None, false).expect("combo");
            dl.add_radio_button(2, 4, "x", 0.1, 0.2, 0.2, 0.05, true, None, false).expect("radio");
            dl.add_radio_button(3, 4, "y", 0.1, 0.3, 0.2, 0.05, false, None, false).expect("radio");
            if let Some(mut cb) = dl.combo_box_mut(1) {
                cb.add_item("one", 1).expect("item");
                cb.add_item("two", 2).expect("item");
            }
            dl.clear_combo_box(1).expect("combo exists");
            assert_eq!(dl.combo_box(1).map(|c| c.len()), Some(0));
            assert!(dl.clear_combo_box(2).is_err());
            dl.clear_radio_button_group(4);
            assert!(dl.radio_button(2).is_some_and(|r| !r.is_checked()));
        });
    }

    #[test]
    fn text_rect_uses_the_element_font() {
        let (mut rm, _) = manager();
        let d = dialog(&mut rm);
        with(&mut rm, d, |dl| {
            let e = Element::default().with_font(0, TextFormat::LEFT | TextFormat::TOP);
            let r = dl.calc_text_rect("abcd", &e, Rect::new(0.0, 1.0, 1.0, 0.0)).expect("font present");
            assert!((r.width() - 4.0 * 0.03125).abs() < 1e-6);
            let missing = Element::default().with_font(5, TextFormat::LEFT | TextFormat::TOP);
            assert!(dl.calc_text_rect("abcd", &missing, Rect::new(0.0, 1.0, 1.0, 0.0)).is_none());
        });
    }
}
