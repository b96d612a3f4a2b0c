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

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// List box behaviour flags.
    pub struct ListBoxStyle : u32 {
        /// Single selection.
        const NONE = 0;
        /// Allow selecting several rows with ctrl and shift.
        const MULTI_SELECTION = 1;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One row of a list box.
pub struct ListBoxItem {
    /// Row text.
    pub text: String,
    /// Opaque value attached by the host.
    pub data: usize,
    /// Per-row selection, used in multi-selection mode.
    pub selected: bool,
}

#[derive(Clone, Debug)]
/// Scrollable list of text rows with single or multiple selection.
pub struct ListBox {
    items: Vec<ListBoxItem>,
    style: ListBoxStyle,
    selected: i32,
    sel_start: i32,
    drag: bool,
    scroll_bar_px: f32,
    border_px: f32,
    margin_px: f32,
    selection_rect: Rect,
    text_rect: Rect,
    text_height: f32,
    last_click: Option<(i32, f64)>,
    pub(crate) bar: ScrollBar,
    pub(crate) bar_elements: Vec<Element>,
}

impl ListBox {
    /// Creates an empty list.
    pub fn new(style: ListBoxStyle) -> Self {
        Self {
            items: Vec::new(),
            style,
            selected: -1,
            sel_start: 0,
            drag: false,
            scroll_bar_px: 16.0,
            border_px: 6.0,
            margin_px: 5.0,
            selection_rect: Rect::default(),
            text_rect: Rect::default(),
            text_height: 0.0,
            last_click: None,
            bar: ScrollBar::new(),
            bar_elements: Vec::new(),
        }
    }

    /// All rows in insertion order.
    pub fn items(&self) -> &[ListBoxItem] { &self.items }

    /// Row `index`, if present.
    pub fn item(&self, index: usize) -> Option<&ListBoxItem> { self.items.get(index) }

    /// Number of rows.
    pub fn len(&self) -> usize { self.items.len() }

    /// `true` when the list holds no rows.
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Behaviour flags.
    pub fn style(&self) -> ListBoxStyle { self.style }

    /// The embedded scroll bar.
    pub fn scroll_bar(&self) -> &ScrollBar { &self.bar }

    /// Area rows are drawn in.
    pub fn text_rect(&self) -> Rect { self.text_rect }

    /// In single selection mode returns the selected row or -1.
    /// In multi-selection mode returns the first selected row after `previous`; pass -1 to start.
    pub fn selected_index(&self, previous: i32) -> i32 {
        if previous < -1 {
            return -1;
        }
        if self.style.contains(ListBoxStyle::MULTI_SELECTION) {
            let from = (previous + 1) as usize;
            return self.items.iter().enumerate().skip(from).find(|(_, it)| it.selected).map(|(i, _)| i as i32).unwrap_or(-1);
        }
        self.selected
    }

    pub(crate) fn update_rects(&mut self, bounds: Rect, font: Option<&FontNode>, pixel: f32) {
        let sb_width = self.scroll_bar_px * pixel;
        let mut sel = bounds;
        sel.right -= sb_width;
        self.selection_rect = sel.inflate(-self.border_px * pixel, -self.border_px * pixel);
        self.text_rect = self.selection_rect.inflate(-self.margin_px * pixel, 0.0);
        self.bar.update_rects(Rect::new(bounds.right - sb_width, bounds.top, bounds.right, bounds.bottom), pixel);
        if let Some(font) = font.filter(|f| f.size > 0.0) {
            self.text_height = font.size;
            self.bar.set_page_size((self.text_rect.height() / font.size) as i32);
            self.bar.show_item(self.selected);
        }
    }

    fn is_multi(&self) -> bool { self.style.contains(ListBoxStyle::MULTI_SELECTION) }

    fn row_at(&self, y: f32) -> Option<i32> {
        if self.text_height <= 0.0 {
            return None;
        }
        Some(self.bar.track_pos() + ((self.text_rect.top - y) / self.text_height).floor() as i32)
    }

    fn is_visible_row(&self, row: i32) -> bool {
        let first = self.bar.track_pos();
        row >= first && row < self.items.len() as i32 && row < first + self.bar.page_size()
    }

    fn set_range(&mut self, from: i32, to: i32, state: bool) {
        for i in from.max(0)..=to.min(self.items.len() as i32 - 1) {
            self.items[i as usize].selected = state;
        }
    }

    fn anchor_state(&self) -> bool { self.items.get(self.sel_start.max(0) as usize).map(|it| it.selected).unwrap_or(false) }

    fn select_clicked(&mut self, clicked: i32, mods: KeyMods) {
        self.selected = clicked;
        if !mods.is_shift() {
            self.sel_start = clicked;
        }
        if !self.is_multi() {
            return;
        }
        let begin = self.sel_start.min(clicked);
        let end = self.sel_start.max(clicked);
        match (mods.is_ctrl(), mods.is_shift()) {
            (true, false) => {
                let item = &mut self.items[clicked as usize];
                item.selected = !item.selected;
            }
            (false, true) => {
                let len = self.items.len() as i32;
                self.set_range(0, len - 1, false);
                self.set_range(begin, end, true);
            }
            (true, true) => {
                let state = self.anchor_state();
                self.set_range(begin + 1, end - 1, state);
                self.items[clicked as usize].selected = true;
                self.selected = self.sel_start;
            }
            (false, false) => {
                let len = self.items.len() as i32;
                self.set_range(0, len - 1, false);
                self.items[clicked as usize].selected = true;
            }
        }
    }

    fn move_selection(&mut self, base: &mut ControlBase, key: Key, mods: KeyMods) {
        if self.items.is_empty() {
            return;
        }
        let old = self.selected;
        let last = self.items.len() as i32 - 1;
        let page = self.bar.page_size() - 1;
        let next = match key {
            Key::UP => self.selected - 1,
            Key::DOWN => self.selected + 1,
            Key::PAGE_DOWN => self.selected + page,
            Key::PAGE_UP => self.selected - page,
            Key::HOME => 0,
            _ => last,
        };
        self.selected = next.max(0).min(last);
        if old == self.selected {
            return;
        }
        if self.is_multi() {
            self.set_range(0, last, false);
            if mods.is_shift() {
                let (a, b) = (self.sel_start.min(self.selected), self.sel_start.max(self.selected));
                self.set_range(a, b, true);
            } else {
                self.items[self.selected as usize].selected = true;
                self.sel_start = self.selected;
            }
        } else {
            self.sel_start = self.selected;
        }
        self.bar.show_item(self.selected);
        base.emit(ControlEvent::ListBoxSelection, true);
    }

    pub(crate) fn cancel_drag(&mut self) {
        self.drag = false;
        self.bar.cancel_drag();
    }

    pub(crate) fn handle(&mut self, base: &mut ControlBase, ctx: &mut ControlCtx<'_>, msg: ControlMsg) -> bool {
        let pt = ctx.mouse;
        if let ControlMsg::Press { button: MouseButton::Left, .. } = msg {
            if !base.has_focus {
                base.request_focus();
            }
        }
        if self.bar.handle(ctx, msg) {
            return true;
        }
        match msg {
            ControlMsg::Press { button: MouseButton::Left, mods } => {
                if self.items.is_empty() || !self.selection_rect.contains(pt) {
                    return false;
                }
                let Some(clicked) = self.row_at(pt.y).filter(|&r| self.is_visible_row(r)) else { return true };
                self.drag = true;
                if let Some((row, at)) = self.last_click {
                    if row == clicked && ctx.now - at <= ctx.config.double_click_interval {
                        self.last_click = None;
                        base.emit(ControlEvent::ListBoxItemDoubleClick, true);
                        return true;
                    }
                }
                self.last_click = Some((clicked, ctx.now));
                self.select_clicked(clicked, mods);
                base.emit(ControlEvent::ListBoxSelection, true);
                true
            }
            ControlMsg::Release { button: MouseButton::Left, .. } => {
                if !std::mem::replace(&mut self.drag, false) {
                    return false;
                }
                if self.selected >= 0 && (self.selected as usize) < self.items.len() {
                    let state = self.anchor_state();
                    let (a, b) = (self.sel_start.min(self.selected), self.sel_start.max(self.selected));
                    self.set_range(a + 1, b - 1, state);
                    self.items[self.selected as usize].selected = state;
                    if self.sel_start != self.selected {
                        base.emit(ControlEvent::ListBoxSelection, true);
                    }
                    base.emit(ControlEvent::ListBoxSelectionEnd, true);
                }
                true
            }
            ControlMsg::Move if self.drag => {
                let Some(row) = self.row_at(pt.y) else { return true };
                let first = self.bar.track_pos();
                if self.is_visible_row(row) {
                    self.selected = row;
                    base.emit(ControlEvent::ListBoxSelection, true);
                } else if row < first {
                    self.bar.scroll(-1);
                    self.selected = self.bar.track_pos();
                    base.emit(ControlEvent::ListBoxSelection, true);
                } else if row >= first + self.bar.page_size() {
                    self.bar.scroll(1);
                    self.selected = (self.items.len() as i32).min(self.bar.track_pos() + self.bar.page_size()) - 1;
                    base.emit(ControlEvent::ListBoxSelection, true);
                }
                true
            }
            ControlMsg::Scroll(lines) => {
                self.bar.scroll(-(lines * ctx.config.wheel_scroll_lines as f32).round() as i32);
                true
            }
            ControlMsg::Key { key, action, mods } if action.is_down() => match key {
                Key::UP | Key::DOWN | Key::PAGE_UP | Key::PAGE_DOWN | Key::HOME | Key::END => {
                    self.move_selection(base, key, mods);
                    true
                }
                Key::SPACE => {
                    base.emit(ControlEvent::ListBoxItemDoubleClick, true);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn row_selected_style(&self, i: i32) -> bool {
        if !self.is_multi() {
            return i == self.selected;
        }
        let in_drag = (i >= self.selected && i < self.sel_start) || (i <= self.selected && i > self.sel_start);
        if self.drag && in_drag {
            return self.anchor_state();
        }
        self.items[i as usize].selected
    }

    pub(crate) fn render(&mut self, base: &mut ControlBase, draw: &mut DrawCtx<'_>, dt: f32) {
        for e in base.elements.iter_mut().take(2) {
            e.blend(ControlState::Normal, dt, DEFAULT_BLEND_RATE);
        }
        if let Some(e) = base.elements.first() {
            draw.draw_sprite(e, base.rect, FAR_BUTTON_DEPTH);
        }

        if self.text_height > 0.0 {
            let mut row = Rect::new(self.text_rect.left, self.text_rect.top, self.text_rect.right, self.text_rect.top - self.text_height);
            for i in self.bar.track_pos().max(0)..self.items.len() as i32 {
                if row.bottom < self.text_rect.bottom - 1e-6 {
                    break;
                }
                let text = &self.items[i as usize].text;
                if self.row_selected_style(i) {
                    if let Some(sel) = base.elements.get(1) {
                        let band = Rect::new(self.selection_rect.left, row.top, self.selection_rect.right, row.bottom);
                        draw.draw_sprite(sel, band, NEAR_BUTTON_DEPTH);
                        draw.draw_text(text, sel, row, false);
                    }
                } else if let Some(e) = base.elements.first() {
                    draw.draw_text(text, e, row, false);
                }
                row = row.offset(0.0, -self.text_height);
            }
        }
        self.bar.render(base.enabled, false, false, &mut self.bar_elements, draw, dt);
    }
}

impl WidgetMut<'_, ListBox> {
    /// Appends a row.
    pub fn add_item(&mut self, text: &str, data: usize) -> Result<()> {
        let lb = &mut *self.widget;
        lb.items.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        lb.items.push(ListBoxItem { text: text.to_string(), data, selected: false });
        lb.bar.set_track_range(0, lb.items.len() as i32);
        Ok(())
    }

    /// Inserts a row before `index`.
    pub fn insert_item(&mut self, index: usize, text: &str, data: usize) -> Result<()> {
        let lb = &mut *self.widget;
        if index > lb.items.len() {
            return Err(Error::invalid(format!("list box insert position {} past end {}", index, lb.items.len())));
        }
        lb.items.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        lb.items.insert(index, ListBoxItem { text: text.to_string(), data, selected: false });
        lb.bar.set_track_range(0, lb.items.len() as i32);
        Ok(())
    }

    /// Removes row `index`; out of range indices are ignored.
    pub fn remove_item(&mut self, index: usize) {
        let lb = &mut *self.widget;
        if index >= lb.items.len() {
            return;
        }
        lb.items.remove(index);
        lb.bar.set_track_range(0, lb.items.len() as i32);
        if lb.selected >= lb.items.len() as i32 {
            lb.selected = lb.items.len() as i32 - 1;
        }
        self.base.emit(ControlEvent::ListBoxSelection, false);
    }

    /// Removes every row.
    pub fn remove_all_items(&mut self) {
        let lb = &mut *self.widget;
        lb.items.clear();
        lb.selected = -1;
        lb.sel_start = 0;
        lb.bar.set_track_range(0, 1);
    }

    /// Selects row `index`, capped to the list, and scrolls it into view.
    pub fn select_item(&mut self, index: i32) {
        let lb = &mut *self.widget;
        if lb.items.is_empty() {
            return;
        }
        let old = lb.selected;
        lb.selected = index.max(0).min(lb.items.len() as i32 - 1);
        if old != lb.selected {
            if lb.is_multi() {
                lb.items[lb.selected as usize].selected = true;
            }
            lb.sel_start = lb.selected;
            lb.bar.show_item(lb.selected);
        }
        self.base.emit(ControlEvent::ListBoxSelection, false);
    }

    /// Replaces the behaviour flags.
    pub fn set_style(&mut self, style: ListBoxStyle) { self.widget.style = style }

    /// Width of the embedded scroll bar in pixels.
    pub fn set_scroll_bar_width(&mut self, px: f32) {
        self.widget.scroll_bar_px = px;
        self.base.stale = true;
    }

    /// Border and text margin in pixels.
    pub fn set_border_pixels(&mut self, border: f32, margin: f32) {
        self.widget.border_px = border;
        self.widget.margin_px = margin;
        self.base.stale = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::tests::*;

    const ROW: f32 = 0.0625;

    fn list(style: ListBoxStyle, n: usize) -> (ControlBase, ListBox) {
        let h = Harness::new();
        let rect = Rect::from_origin(0.1, 0.1, 0.4, 0.5);
        let mut base = ControlBase::new(4, rect);
        let mut lb = ListBox::new(style);
        {
            let mut view = WidgetMut { base: &mut base, widget: &mut lb };
            for i in 0..n {
                view.add_item(&format!("item {}", i), i).unwrap();
            }
        }
        lb.update_rects(rect, h.fonts[0].as_ref(), 1.0 / 600.0);
        base.has_focus = true;
        (base, lb)
    }

    fn row_y(lb: &ListBox, row: i32) -> f32 { lb.text_rect().top - (row as f32 + 0.5) * ROW }

    fn click(lb: &mut ListBox, base: &mut ControlBase, h: &mut Harness, row: i32, mods: KeyMods) {
        let y = row_y(lb, row);
        lb.handle(base, &mut h.ctx(0.3, y), ControlMsg::Press { button: MouseButton::Left, mods });
        lb.handle(base, &mut h.ctx(0.3, y), ControlMsg::Release { button: MouseButton::Left, mods });
    }

    #[test]
    fn page_size_follows_font() {
        let (_, lb) = list(ListBoxStyle::NONE, 20);
        assert_eq!(lb.scroll_bar().page_size(), 7);
        assert_eq!(lb.scroll_bar().track_end(), 20);
    }

    #[test]
    fn single_click_selects_row() {
        let mut h = Harness::new();
        let (mut base, mut lb) = list(ListBoxStyle::NONE, 5);
        click(&mut lb, &mut base, &mut h, 2, KeyMods::NONE);
        assert_eq!(lb.selected_index(-1), 2);
        assert_eq!(events(&mut base), vec![ControlEvent::ListBoxSelection, ControlEvent::ListBoxSelectionEnd]);
    }

    #[test]
    fn keys_move_and_cap_selection() {
        let mut h = Harness::new();
        let (mut base, mut lb) = list(ListBoxStyle::NONE, 5);
        assert!(lb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::DOWN, Action::Press)));
        assert_eq!(lb.selected_index(-1), 0);
        lb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::END, Action::Press));
        assert_eq!(lb.selected_index(-1), 4);
        lb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::DOWN, Action::Press));
        assert_eq!(lb.selected_index(-1), 4);
        lb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::PAGE_UP, Action::Press));
        assert_eq!(lb.selected_index(-1), 0);
        assert_eq!(events(&mut base).len(), 3);
    }

    #[test]
    fn multi_selection_modifiers() {
        let mut h = Harness::new();
        let (mut base, mut lb) = list(ListBoxStyle::MULTI_SELECTION, 5);
        click(&mut lb, &mut base, &mut h, 1, KeyMods::NONE);
        h.now += 1.0;
        click(&mut lb, &mut base, &mut h, 3, KeyMods::CTRL);
        let picked: Vec<bool> = lb.items().iter().map(|i| i.selected).collect();
        assert_eq!(picked, vec![false, true, false, true, false]);

        h.now += 1.0;
        click(&mut lb, &mut base, &mut h, 0, KeyMods::SHIFT);
        let picked: Vec<bool> = lb.items().iter().map(|i| i.selected).collect();
        assert_eq!(picked, vec![true, true, true, true, false]);

        let mut order = Vec::new();
        let mut i = lb.selected_index(-1);
        while i != -1 {
            order.push(i);
            i = lb.selected_index(i);
        }
        assert_eq!(order, vec![0, 1, 2, 3]);

        h.now += 1.0;
        click(&mut lb, &mut base, &mut h, 4, KeyMods::NONE);
        let picked: Vec<bool> = lb.items().iter().map(|i| i.selected).collect();
        assert_eq!(picked, vec![false, false, false, false, true]);
    }

    #[test]
    fn ctrl_shift_click_extends_with_anchor_state() {
        let mut h = Harness::new();
        let (mut base, mut lb) = list(ListBoxStyle::MULTI_SELECTION, 6);
        click(&mut lb, &mut base, &mut h, 1, KeyMods::NONE);
        h.now += 1.0;
        click(&mut lb, &mut base, &mut h, 4, KeyMods::CTRL | KeyMods::SHIFT);
        let picked: Vec<bool> = lb.items().iter().map(|i| i.selected).collect();
        assert_eq!(picked, vec![false, true, true, true, true, false]);
    }

    #[test]
    fn second_press_on_same_row_is_a_double_click() {
        let mut h = Harness::new();
        let (mut base, mut lb) = list(ListBoxStyle::NONE, 5);
        click(&mut lb, &mut base, &mut h, 2, KeyMods::NONE);
        events(&mut base);
        h.now = 0.2;
        let y = row_y(&lb, 2);
        lb.handle(&mut base, &mut h.ctx(0.3, y), press());
        assert_eq!(events(&mut base), vec![ControlEvent::ListBoxItemDoubleClick]);
        assert!(lb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::SPACE, Action::Press)));
        assert_eq!(events(&mut base), vec![ControlEvent::ListBoxItemDoubleClick]);
    }

    #[test]
    fn dragging_extends_and_scrolls() {
        let mut h = Harness::new();
        let (mut base, mut lb) = list(ListBoxStyle::NONE, 20);
        let y0 = row_y(&lb, 0);
        lb.handle(&mut base, &mut h.ctx(0.3, y0), press());
        lb.handle(&mut base, &mut h.ctx(0.3, row_y(&lb, 3)), ControlMsg::Move);
        assert_eq!(lb.selected_index(-1), 3);
        lb.handle(&mut base, &mut h.ctx(0.3, 0.0), ControlMsg::Move);
        assert_eq!(lb.scroll_bar().track_pos(), 1);
        assert_eq!(lb.selected_index(-1), 7);
        let selected = lb.selected_index(-1);
        assert!(selected >= -1 && selected < lb.len() as i32);
    }

    #[test]
    fn removing_rows_keeps_selection_in_range() {
        let (mut base, mut lb) = list(ListBoxStyle::NONE, 3);
        let mut view = WidgetMut { base: &mut base, widget: &mut lb };
        view.select_item(2);
        view.remove_item(2);
        assert_eq!(view.selected_index(-1), 1);
        view.remove_all_items();
        assert_eq!(view.selected_index(-1), -1);
        assert!(view.insert_item(1, "x", 0).is_err());
    }
}
