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

#[derive(Clone, Debug, PartialEq, Eq)]
/// One entry of a combo box.
pub struct ComboBoxItem {
    /// Entry text.
    pub text: String,
    /// Opaque value attached by the host.
    pub data: usize,
}

#[derive(Clone, Debug)]
/// Closed text field with a button that opens a scrollable drop-down list.
pub struct ComboBox {
    items: Vec<ComboBoxItem>,
    selected: i32,
    focused: i32,
    opened: bool,
    pub(crate) pressed: bool,
    drop_height_px: f32,
    scroll_bar_px: f32,
    text_rect: Rect,
    button_rect: Rect,
    dropdown_rect: Rect,
    dropdown_text_rect: Rect,
    text_height: f32,
    pub(crate) bar: ScrollBar,
    pub(crate) bar_elements: Vec<Element>,
}

impl Default for ComboBox {
    fn default() -> Self { Self::new() }
}

impl ComboBox {
    /// Creates an empty, closed combo box.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: -1,
            focused: -1,
            opened: false,
            pressed: false,
            drop_height_px: 100.0,
            scroll_bar_px: 16.0,
            text_rect: Rect::default(),
            button_rect: Rect::default(),
            dropdown_rect: Rect::default(),
            dropdown_text_rect: Rect::default(),
            text_height: 0.0,
            bar: ScrollBar::new(),
            bar_elements: Vec::new(),
        }
    }

    /// All entries in insertion order.
    pub fn items(&self) -> &[ComboBoxItem] { &self.items }

    /// Entry `index`, if present.
    pub fn item(&self, index: usize) -> Option<&ComboBoxItem> { self.items.get(index) }

    /// Number of entries.
    pub fn len(&self) -> usize { self.items.len() }

    /// `true` when there are no entries.
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Committed selection, or -1.
    pub fn selected_index(&self) -> i32 { self.selected }

    /// Committed entry.
    pub fn selected_item(&self) -> Option<&ComboBoxItem> { usize::try_from(self.selected).ok().and_then(|i| self.items.get(i)) }

    /// Data of the committed entry.
    pub fn selected_data(&self) -> Option<usize> { self.selected_item().map(|it| it.data) }

    /// Data of entry `index`.
    pub fn item_data(&self, index: usize) -> Option<usize> { self.items.get(index).map(|it| it.data) }

    /// Data of the first entry whose text equals `text`.
    pub fn item_data_by_text(&self, text: &str) -> Option<usize> { self.find_item(text, 0).map(|i| self.items[i].data) }

    /// Index of the first entry at or after `start` whose text equals `text`.
    pub fn find_item(&self, text: &str, start: usize) -> Option<usize> { self.items.iter().skip(start).position(|it| it.text == text).map(|i| i + start) }

    /// `true` when an entry at or after `start` has the text `text`.
    pub fn contains_item(&self, text: &str, start: usize) -> bool { self.find_item(text, start).is_some() }

    /// `true` while the drop-down is shown.
    pub fn is_opened(&self) -> bool { self.opened }

    /// `true` while the pointer holds the control.
    pub fn is_pressed(&self) -> bool { self.pressed }

    /// Area of the closed text field.
    pub fn text_rect(&self) -> Rect { self.text_rect }

    /// Area of the drop button.
    pub fn button_rect(&self) -> Rect { self.button_rect }

    /// Area of the drop-down list, excluding its scroll bar.
    pub fn dropdown_rect(&self) -> Rect { self.dropdown_rect }

    /// The drop-down's scroll bar.
    pub fn scroll_bar(&self) -> &ScrollBar { &self.bar }

    pub(crate) fn close(&mut self) { self.opened = false }

    pub(crate) fn dropdown_contains(&self, pt: Point) -> bool { self.opened && (self.dropdown_rect.contains(pt) || self.bar.bounds().contains(pt)) }

    pub(crate) fn update_rects(&mut self, bounds: Rect, font: Option<&FontNode>, pixel: f32) {
        let h = bounds.height();
        let sb_width = self.scroll_bar_px * pixel;
        self.button_rect = Rect::new(bounds.right - h, bounds.top, bounds.right, bounds.bottom);
        self.text_rect = Rect::new(bounds.left, bounds.top, self.button_rect.left, bounds.bottom);

        // the list overlaps the text field by a tenth of its height
        let top = self.text_rect.bottom + 0.1 * h;
        self.dropdown_rect = Rect::new(self.text_rect.left, top, self.text_rect.right - sb_width, top - self.drop_height_px * pixel);
        let (dw, dh) = (self.dropdown_rect.width(), self.dropdown_rect.height());
        self.dropdown_text_rect = self.dropdown_rect.inflate(-0.1 * dw, -0.1 * dh);

        let d = self.dropdown_rect;
        self.bar.update_rects(Rect::new(d.right, d.top, d.right + sb_width, d.bottom), pixel);
        if let Some(font) = font.filter(|f| f.size > 0.0) {
            self.text_height = font.size;
            self.bar.set_page_size((self.dropdown_text_rect.height() / font.size) as i32);
            self.bar.show_item(self.selected);
        }
    }

    fn row_at(&self, pt: Point) -> Option<i32> {
        if self.text_height <= 0.0 || !self.dropdown_text_rect.contains(pt) {
            return None;
        }
        let row = self.bar.track_pos() + ((self.dropdown_text_rect.top - pt.y) / self.text_height).floor() as i32;
        (row >= 0 && row < self.items.len() as i32).then_some(row)
    }

    fn release_focus(base: &mut ControlBase, ctx: &ControlCtx<'_>) {
        if !ctx.keyboard_input {
            base.clear_focus();
        }
    }

    fn step_selection(&mut self, base: &mut ControlBase, forward: bool) {
        let next = if forward { self.focused + 1 } else { self.focused - 1 };
        if next < 0 || next >= self.items.len() as i32 {
            return;
        }
        self.focused = next;
        self.selected = next;
        if !self.opened {
            base.emit(ControlEvent::ComboBoxSelectionChanged, true);
        }
    }

    pub(crate) fn handle(&mut self, base: &mut ControlBase, ctx: &mut ControlCtx<'_>, msg: ControlMsg) -> bool {
        let pt = ctx.mouse;
        if self.opened && self.bar.handle(ctx, msg) {
            return true;
        }
        match msg {
            ControlMsg::Move => {
                if !self.opened {
                    return false;
                }
                match self.row_at(pt) {
                    Some(row) => {
                        self.focused = row;
                        true
                    }
                    None => false,
                }
            }
            ControlMsg::Press { button: MouseButton::Left, .. } => {
                if base.rect.contains(pt) {
                    self.pressed = true;
                    if !base.has_focus {
                        base.request_focus();
                    }
                    self.opened = !self.opened;
                    if !self.opened {
                        Self::release_focus(base, ctx);
                    }
                    return true;
                }
                if self.opened && self.dropdown_text_rect.contains(pt) {
                    if let Some(row) = self.row_at(pt) {
                        self.focused = row;
                        self.selected = row;
                        base.emit(ControlEvent::ComboBoxSelectionChanged, true);
                        self.opened = false;
                        Self::release_focus(base, ctx);
                    }
                    return true;
                }
                if self.opened {
                    self.focused = self.selected;
                    base.emit(ControlEvent::ComboBoxSelectionChanged, true);
                    self.opened = false;
                }
                self.pressed = false;
                Self::release_focus(base, ctx);
                false
            }
            ControlMsg::Release { button: MouseButton::Left, .. } => {
                let was_pressed = std::mem::replace(&mut self.pressed, false);
                was_pressed && base.rect.contains(pt)
            }
            ControlMsg::Scroll(lines) => {
                if self.opened {
                    self.bar.scroll(-(lines * ctx.config.wheel_scroll_lines as f32).round() as i32);
                } else if lines != 0.0 {
                    self.step_selection(base, lines < 0.0);
                }
                true
            }
            ControlMsg::Key { key, action, .. } if action.is_down() => match key {
                Key::ENTER if self.opened => {
                    if self.selected != self.focused {
                        self.selected = self.focused;
                        base.emit(ControlEvent::ComboBoxSelectionChanged, true);
                    }
                    self.opened = false;
                    Self::release_focus(base, ctx);
                    true
                }
                Key::F4 => {
                    if action == Action::Repeat {
                        return true;
                    }
                    self.opened = !self.opened;
                    if !self.opened {
                        base.emit(ControlEvent::ComboBoxSelectionChanged, true);
                        Self::release_focus(base, ctx);
                    }
                    true
                }
                Key::LEFT | Key::UP => {
                    self.step_selection(base, false);
                    true
                }
                Key::RIGHT | Key::DOWN => {
                    self.step_selection(base, true);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Cycles to the next entry unless the list is open or empty.
    pub(crate) fn on_hotkey(&mut self, base: &mut ControlBase, ctx: &ControlCtx<'_>) {
        if self.opened || self.selected == -1 {
            return;
        }
        if ctx.keyboard_input {
            base.request_focus();
        }
        self.selected += 1;
        if self.selected >= self.items.len() as i32 {
            self.selected = 0;
        }
        self.focused = self.selected;
        base.emit(ControlEvent::ComboBoxSelectionChanged, true);
    }

    pub(crate) fn render(&mut self, base: &mut ControlBase, draw: &mut DrawCtx<'_>, dt: f32) {
        let state = if self.opened && base.visible && base.enabled { ControlState::Pressed } else { base.state(self.pressed) };
        let rate = state.blend_rate();

        if self.opened {
            self.bar.render(base.enabled, false, false, &mut self.bar_elements, draw, dt);
            for i in [2, 3] {
                if let Some(e) = base.elements.get_mut(i) {
                    e.blend(ControlState::Normal, dt, DEFAULT_BLEND_RATE);
                }
            }
            if let Some(e) = base.elements.get(2) {
                draw.draw_sprite(e, self.dropdown_rect, NEAR_BUTTON_DEPTH);
            }
            if self.text_height > 0.0 {
                let dt_rect = self.dropdown_text_rect;
                let mut row = Rect::new(dt_rect.left, dt_rect.top, dt_rect.right, dt_rect.top - self.text_height);
                for i in self.bar.track_pos().max(0)..self.items.len() as i32 {
                    if row.bottom < dt_rect.bottom - 1e-6 {
                        break;
                    }
                    let text = &self.items[i as usize].text;
                    if i == self.focused {
                        if let Some(sel) = base.elements.get(3) {
                            let band = Rect::new(self.dropdown_rect.left, row.top, self.dropdown_rect.right, row.bottom);
                            draw.draw_sprite(sel, band, NEAR_BUTTON_DEPTH);
                            draw.draw_text(text, sel, row, false);
                        }
                    } else if let Some(e) = base.elements.get(2) {
                        draw.draw_text(text, e, row, false);
                    }
                    row = row.offset(0.0, -self.text_height);
                }
            }
        }

        let (dx, dy) = press_offset(state, draw.pixel());
        blend_sprite(draw, base, 1, state, dt, rate, self.button_rect.offset(dx, dy), FAR_BUTTON_DEPTH);

        if let Some(e) = base.elements.get_mut(0) {
            e.blend(state, dt, rate);
            draw.draw_sprite(e, self.text_rect, NEAR_BUTTON_DEPTH);
            if let Some(item) = usize::try_from(self.selected).ok().and_then(|i| self.items.get(i)) {
                draw.draw_text(&item.text, e, self.text_rect, false);
            }
        }
    }
}

impl WidgetMut<'_, ComboBox> {
    /// Appends an entry. The first entry becomes the selection.
    pub fn add_item(&mut self, text: &str, data: usize) -> Result<()> {
        let cb = &mut *self.widget;
        cb.items.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        cb.items.push(ComboBoxItem { text: text.to_string(), data });
        cb.bar.set_track_range(0, cb.items.len() as i32);
        if cb.items.len() == 1 {
            cb.selected = 0;
            cb.focused = 0;
            self.base.emit(ControlEvent::ComboBoxSelectionChanged, false);
        }
        Ok(())
    }

    /// Removes entry `index`; out of range indices are ignored.
    pub fn remove_item(&mut self, index: usize) {
        let cb = &mut *self.widget;
        if index >= cb.items.len() {
            return;
        }
        cb.items.remove(index);
        let len = cb.items.len() as i32;
        cb.bar.set_track_range(0, len);
        if cb.selected >= len {
            cb.selected = len - 1;
        }
        if cb.focused >= len {
            cb.focused = len - 1;
        }
    }

    /// Removes every entry.
    pub fn remove_all_items(&mut self) {
        let cb = &mut *self.widget;
        cb.items.clear();
        cb.bar.set_track_range(0, 1);
        cb.selected = -1;
        cb.focused = -1;
    }

    /// Selects entry `index` as a non-user change.
    pub fn set_selected_by_index(&mut self, index: usize) -> Result<()> {
        if index >= self.widget.items.len() {
            return Err(Error::invalid(format!("combo box index {} out of range", index)));
        }
        self.widget.selected = index as i32;
        self.widget.focused = index as i32;
        self.base.emit(ControlEvent::ComboBoxSelectionChanged, false);
        Ok(())
    }

    /// Selects the first entry with text `text` as a non-user change.
    pub fn set_selected_by_text(&mut self, text: &str) -> Result<()> {
        let index = self.widget.find_item(text, 0).ok_or_else(|| Error::invalid(format!("combo box has no item '{}'", text)))?;
        self.set_selected_by_index(index)
    }

    /// Selects the first entry carrying `data` as a non-user change.
    pub fn set_selected_by_data(&mut self, data: usize) -> Result<()> {
        let index = self.widget.items.iter().position(|it| it.data == data).ok_or_else(|| Error::invalid(format!("combo box has no item with data {}", data)))?;
        self.set_selected_by_index(index)
    }

    /// Height of the drop-down list in pixels.
    pub fn set_drop_height(&mut self, px: f32) {
        self.widget.drop_height_px = px;
        self.base.stale = true;
    }

    /// Width of the drop-down scroll bar in pixels.
    pub fn set_scroll_bar_width(&mut self, px: f32) {
        self.widget.scroll_bar_px = px;
        self.base.stale = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::tests::*;

    const ROW: f32 = 0.0625;

    fn combo(n: usize) -> (ControlBase, ComboBox) {
        let h = Harness::new();
        let rect = Rect::from_origin(0.1, 0.6, 0.4, 0.05);
        let mut base = ControlBase::new(9, rect);
        let mut cb = ComboBox::new();
        {
            let mut view = WidgetMut { base: &mut base, widget: &mut cb };
            for (i, name) in ["red", "green", "blue", "cyan", "magenta"].iter().take(n).enumerate() {
                view.add_item(name, 100 + i).unwrap();
            }
        }
        base.outbox.clear();
        cb.update_rects(rect, h.fonts[0].as_ref(), 1.0 / 600.0);
        (base, cb)
    }

    fn row_y(cb: &ComboBox, row: i32) -> f32 { cb.dropdown_text_rect.top - (row as f32 + 0.5) * ROW }

    #[test]
    fn first_item_becomes_selection() {
        let mut base = ControlBase::new(1, Rect::default());
        let mut cb = ComboBox::new();
        let mut view = WidgetMut { base: &mut base, widget: &mut cb };
        view.add_item("only", 5).unwrap();
        view.add_item("second", 6).unwrap();
        assert_eq!(view.selected_index(), 0);
        assert_eq!(view.selected_data(), Some(5));
        assert_eq!(events(&mut base), vec![ControlEvent::ComboBoxSelectionChanged]);
    }

    #[test]
    fn dropdown_hangs_below_the_field() {
        let (_, cb) = combo(3);
        assert!(cb.dropdown_rect().top < cb.text_rect().top);
        assert!(cb.dropdown_rect().bottom < cb.text_rect().bottom);
        assert!((cb.scroll_bar().bounds().right - cb.text_rect().right).abs() < 1e-6);
        assert_eq!(cb.scroll_bar().page_size(), 2);
    }

    #[test]
    fn clicking_a_row_commits_and_closes() {
        let mut h = Harness::new();
        let (mut base, mut cb) = combo(3);
        assert!(cb.handle(&mut base, &mut h.ctx(0.3, 0.62), press()));
        assert!(cb.is_opened());
        assert!(cb.handle(&mut base, &mut h.ctx(0.3, 0.62), release()));
        assert!(cb.dropdown_contains(Vec2f::new(0.2, row_y(&cb, 1))));

        cb.handle(&mut base, &mut h.ctx(0.2, row_y(&cb, 1)), ControlMsg::Move);
        assert!(cb.handle(&mut base, &mut h.ctx(0.2, row_y(&cb, 1)), press()));
        assert!(!cb.is_opened());
        assert_eq!(cb.selected_item().map(|i| i.text.as_str()), Some("green"));
        assert_eq!(events(&mut base), vec![ControlEvent::ComboBoxSelectionChanged]);
    }

    #[test]
    fn clicking_elsewhere_closes_and_reports() {
        let mut h = Harness::new();
        let (mut base, mut cb) = combo(3);
        cb.handle(&mut base, &mut h.ctx(0.3, 0.62), press());
        cb.handle(&mut base, &mut h.ctx(0.3, 0.62), release());
        assert!(!cb.handle(&mut base, &mut h.ctx(0.9, 0.1), press()));
        assert!(!cb.is_opened());
        assert_eq!(cb.selected_index(), 0);
        assert!(base.outbox.contains(&Effect::ClearFocus));
    }

    #[test]
    fn wheel_and_arrows_step_when_closed() {
        let mut h = Harness::new();
        let (mut base, mut cb) = combo(3);
        assert!(cb.handle(&mut base, &mut h.ctx(0.3, 0.62), ControlMsg::Scroll(-1.0)));
        assert_eq!(cb.selected_index(), 1);
        cb.handle(&mut base, &mut h.ctx(0.3, 0.62), key(Key::DOWN, Action::Press));
        cb.handle(&mut base, &mut h.ctx(0.3, 0.62), key(Key::DOWN, Action::Press));
        assert_eq!(cb.selected_index(), 2);
        cb.handle(&mut base, &mut h.ctx(0.3, 0.62), key(Key::UP, Action::Press));
        assert_eq!(cb.selected_index(), 1);
        assert_eq!(events(&mut base).len(), 3);
    }

    #[test]
    fn f4_toggles_and_enter_commits() {
        let mut h = Harness::new();
        h.keyboard_input = true;
        let (mut base, mut cb) = combo(3);
        cb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::F4, Action::Press));
        assert!(cb.is_opened());
        cb.handle(&mut base, &mut h.ctx(0.2, row_y(&cb, 1)), ControlMsg::Move);
        cb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::ENTER, Action::Press));
        assert!(!cb.is_opened());
        assert_eq!(cb.selected_index(), 1);
        assert_eq!(events(&mut base), vec![ControlEvent::ComboBoxSelectionChanged]);
        assert!(!base.outbox.contains(&Effect::ClearFocus));
    }

    #[test]
    fn hotkey_cycles_with_wrap() {
        let mut h = Harness::new();
        h.keyboard_input = true;
        let (mut base, mut cb) = combo(2);
        cb.on_hotkey(&mut base, &h.ctx(0.0, 0.0));
        assert_eq!(cb.selected_index(), 1);
        cb.on_hotkey(&mut base, &h.ctx(0.0, 0.0));
        assert_eq!(cb.selected_index(), 0);
        assert!(base.outbox.contains(&Effect::RequestFocus));

        let (mut base, mut empty) = combo(0);
        empty.on_hotkey(&mut base, &h.ctx(0.0, 0.0));
        assert!(base.outbox.is_empty());
    }

    #[test]
    fn lookups_use_equality() {
        let (mut base, mut cb) = combo(3);
        assert_eq!(cb.find_item("green", 0), Some(1));
        assert_eq!(cb.find_item("gre", 0), None);
        assert_eq!(cb.find_item("red", 1), None);
        assert_eq!(cb.item_data_by_text("blue"), Some(102));
        let mut view = WidgetMut { base: &mut base, widget: &mut cb };
        view.set_selected_by_data(102).unwrap();
        assert_eq!(view.selected_index(), 2);
        assert!(view.set_selected_by_text("black").is_err());
        view.remove_item(2);
        assert_eq!(view.selected_index(), 1);
    }
}
