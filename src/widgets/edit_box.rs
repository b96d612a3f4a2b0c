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

/// Characters accepted while tokenising a float array.
fn in_float_charset(c: char) -> bool { c == '-' || c == '.' || c.is_ascii_digit() }

#[derive(Clone, Debug)]
/// Single line text field with caret, selection, insert/overwrite mode and clipboard access.
pub struct EditBox {
    buffer: TextBuffer,
    caret: usize,
    sel_start: usize,
    first_visible: usize,
    insert_mode: bool,
    caret_on: bool,
    last_blink: f64,
    hide_caret: bool,
    drag: bool,
    border_px: f32,
    spacing_px: f32,
    pub(crate) text_color: Color,
    sel_text_color: Color,
    sel_bk_color: Color,
    caret_color: Color,
    text_rect: Rect,
    render_rects: [Rect; 9],
}

impl Default for EditBox {
    fn default() -> Self { Self::new() }
}

impl EditBox {
    /// Creates an empty field in insert mode.
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            caret: 0,
            sel_start: 0,
            first_visible: 0,
            insert_mode: true,
            caret_on: true,
            last_blink: 0.0,
            hide_caret: false,
            drag: false,
            border_px: 5.0,
            spacing_px: 4.0,
            text_color: color(16, 16, 16, 255),
            sel_text_color: color(255, 255, 255, 255),
            sel_bk_color: color(40, 50, 92, 255),
            caret_color: color(0, 0, 0, 255),
            text_rect: Rect::default(),
            render_rects: [Rect::default(); 9],
        }
    }

    /// Current content.
    pub fn text(&self) -> String { self.buffer.text() }

    /// Number of characters.
    pub fn len(&self) -> usize { self.buffer.len() }

    /// `true` when the field holds no text.
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    /// Caret position in characters.
    pub fn caret(&self) -> usize { self.caret }

    /// Anchor of the selection; equals the caret when nothing is selected.
    pub fn selection_start(&self) -> usize { self.sel_start }

    /// Selected text, empty when nothing is selected.
    pub fn selected_text(&self) -> String {
        let (a, b) = self.selection();
        self.buffer.text_range(a, b)
    }

    /// First character drawn at the left edge of the text area.
    pub fn first_visible(&self) -> usize { self.first_visible }

    /// `false` in overwrite mode.
    pub fn is_insert_mode(&self) -> bool { self.insert_mode }

    /// Whether the caret is in the visible half of its blink cycle.
    pub fn is_caret_on(&self) -> bool { self.caret_on }

    /// Area the text is laid out in.
    pub fn text_rect(&self) -> Rect { self.text_rect }

    /// Text colour.
    pub fn text_color(&self) -> Color { self.text_color }

    /// Reads up to `count` numbers separated by spaces. Malformed tokens read as zero.
    pub fn parse_float_array(&self, count: usize) -> Vec<f32> {
        let text = self.buffer.text();
        let mut out = Vec::new();
        let mut rest = text.as_str();
        while out.len() < count {
            rest = rest.trim_start_matches(' ');
            let Some(first) = rest.chars().next() else { break };
            let end = rest.find(|c: char| !in_float_charset(c)).unwrap_or(rest.len());
            if end == 0 {
                // skip a character outside the number charset
                rest = &rest[first.len_utf8()..];
                continue;
            }
            out.push(rest[..end].parse::<f32>().unwrap_or(0.0));
            rest = &rest[end..];
        }
        out
    }

    fn selection(&self) -> (usize, usize) { (self.caret.min(self.sel_start), self.caret.max(self.sel_start)) }

    pub(crate) fn update_rects(&mut self, bounds: Rect, font: Option<&FontNode>, pixel: f32) {
        let b = bounds;
        let t = b.inflate(-self.border_px * pixel, -self.border_px * pixel);
        self.render_rects = [
            t,
            Rect::new(b.left, b.top, t.left, t.top),
            Rect::new(t.left, b.top, t.right, t.top),
            Rect::new(t.right, b.top, b.right, t.top),
            Rect::new(b.left, t.top, t.left, t.bottom),
            Rect::new(t.right, t.top, b.right, t.bottom),
            Rect::new(b.left, t.bottom, t.left, b.bottom),
            Rect::new(t.left, t.bottom, t.right, b.bottom),
            Rect::new(t.right, t.bottom, b.right, b.bottom),
        ];
        self.text_rect = t.inflate(-self.spacing_px * pixel, -self.spacing_px * pixel);
        if font.is_some() {
            self.buffer.set_font(font.cloned());
        }
        self.place_caret(self.caret);
    }

    /// Moves the caret to `cp` and scrolls so it stays inside the text area.
    fn place_caret(&mut self, cp: usize) {
        self.caret = cp.min(self.buffer.len());
        self.first_visible = self.first_visible.min(self.buffer.len());
        if self.scroll_to_caret().is_err() {
            // no font yet; the next layout pass settles the scroll position
            self.first_visible = self.first_visible.min(self.caret);
        }
    }

    fn scroll_to_caret(&mut self) -> Result<()> {
        let cp = self.caret;
        let x_first = self.buffer.cp_to_x(self.first_visible, false)?;
        let x = self.buffer.cp_to_x(cp, false)?;
        let x2 = if cp == self.buffer.len() { x } else { self.buffer.cp_to_x(cp, true)? };
        let width = self.text_rect.width();

        if x < x_first {
            self.first_visible = cp;
        } else if x2 > x_first + width {
            let new_left = x2 - width;
            let (mut first, _) = self.buffer.x_to_cp(new_left)?;
            if self.buffer.cp_to_x(first, false)? < new_left {
                first += 1;
            }
            self.first_visible = first.min(cp);
        }
        Ok(())
    }

    pub(crate) fn reset_blink(&mut self, now: f64) {
        self.caret_on = true;
        self.last_blink = now;
    }

    /// Flips the caret whenever a full blink period has passed.
    fn update_blink(&mut self, now: f64, period: f64) {
        if now - self.last_blink >= period {
            self.caret_on = !self.caret_on;
            self.last_blink = now;
        }
    }

    pub(crate) fn cancel_drag(&mut self) { self.drag = false }

    fn delete_selection(&mut self) {
        let (first, last) = self.selection();
        self.buffer.remove_range(first, last);
        self.place_caret(first);
        self.sel_start = self.caret;
    }

    fn copy_to_clipboard(&self, clipboard: &mut dyn Clipboard) {
        if self.caret != self.sel_start {
            clipboard.set_text(&self.selected_text());
        }
    }

    fn paste_from_clipboard(&mut self, clipboard: &dyn Clipboard) {
        self.delete_selection();
        let Some(text) = clipboard.get_text() else { return };
        if self.buffer.insert_str(Some(self.caret), &text).is_ok() {
            self.place_caret(self.caret + text.chars().count());
        }
        self.sel_start = self.caret;
    }

    fn select_all(&mut self) {
        if self.sel_start == self.caret {
            self.sel_start = 0;
            self.place_caret(self.buffer.len());
        }
    }

    fn type_char(&mut self, ch: char) {
        if self.caret != self.sel_start {
            self.delete_selection();
        }
        let written = if !self.insert_mode && self.caret < self.buffer.len() {
            self.buffer.overwrite_char(self.caret, ch)
        } else {
            self.buffer.insert_char(Some(self.caret), ch)
        };
        if written.is_ok() {
            self.place_caret(self.caret + 1);
            self.sel_start = self.caret;
        }
    }

    fn backspace(&mut self, base: &mut ControlBase) {
        if self.caret != self.sel_start {
            self.delete_selection();
            base.emit(ControlEvent::EditBoxChange, true);
        } else if self.caret > 0 {
            self.place_caret(self.caret - 1);
            self.sel_start = self.caret;
            self.buffer.remove_char(self.caret);
            base.emit(ControlEvent::EditBoxChange, true);
        }
    }

    /// Caret position under dialog-local `x`, rounding to the nearer character edge.
    fn cp_at(&mut self, x: f32) -> Option<usize> {
        let x_first = self.buffer.cp_to_x(self.first_visible, false).ok()?;
        let (cp, trailing) = self.buffer.x_to_cp(x - self.text_rect.left + x_first).ok()?;
        Some(if trailing && cp < self.buffer.len() { cp + 1 } else { cp })
    }

    fn handle_char(&mut self, base: &mut ControlBase, ctx: &mut ControlCtx<'_>, ch: char) {
        match ch as u32 {
            8 => self.backspace(base),
            24 | 3 => {
                self.copy_to_clipboard(ctx.clipboard);
                if ch as u32 == 24 {
                    self.delete_selection();
                    base.emit(ControlEvent::EditBoxChange, true);
                }
            }
            22 => {
                self.paste_from_clipboard(ctx.clipboard);
                base.emit(ControlEvent::EditBoxChange, true);
            }
            1 => self.select_all(),
            13 => base.emit(ControlEvent::EditBoxString, true),
            c if c < 32 || c == 127 => (),
            _ => {
                self.type_char(ch);
                self.reset_blink(ctx.now);
                base.emit(ControlEvent::EditBoxChange, true);
            }
        }
    }

    fn move_caret(&mut self, to: usize, mods: KeyMods, now: f64) {
        self.place_caret(to);
        if !mods.is_shift() {
            self.sel_start = self.caret;
        }
        self.reset_blink(now);
    }

    fn handle_key(&mut self, base: &mut ControlBase, ctx: &mut ControlCtx<'_>, key: Key, mods: KeyMods) -> bool {
        match key {
            Key::TAB | Key::ESCAPE => return false,
            Key::HOME => self.move_caret(0, mods, ctx.now),
            Key::END => self.move_caret(self.buffer.len(), mods, ctx.now),
            Key::LEFT => {
                let to = if mods.is_ctrl() { self.buffer.prior_item_pos(self.caret) } else { self.caret.saturating_sub(1) };
                self.move_caret(to, mods, ctx.now);
            }
            Key::RIGHT => {
                let to = if mods.is_ctrl() { self.buffer.next_item_pos(self.caret) } else { (self.caret + 1).min(self.buffer.len()) };
                self.move_caret(to, mods, ctx.now);
            }
            Key::INSERT => {
                if mods.is_ctrl() {
                    self.copy_to_clipboard(ctx.clipboard);
                } else if mods.is_shift() {
                    self.paste_from_clipboard(ctx.clipboard);
                    base.emit(ControlEvent::EditBoxChange, true);
                } else {
                    self.insert_mode = !self.insert_mode;
                }
            }
            Key::DELETE => {
                if self.caret != self.sel_start {
                    self.delete_selection();
                    base.emit(ControlEvent::EditBoxChange, true);
                } else if self.buffer.remove_char(self.caret) {
                    base.emit(ControlEvent::EditBoxChange, true);
                }
                self.reset_blink(ctx.now);
            }
            Key::BACKSPACE => {
                self.backspace(base);
                self.reset_blink(ctx.now);
            }
            Key::ENTER => base.emit(ControlEvent::EditBoxString, true),
            k if mods.is_ctrl() && k == Key::from_char('a') => self.select_all(),
            k if mods.is_ctrl() && k == Key::from_char('c') => self.copy_to_clipboard(ctx.clipboard),
            k if mods.is_ctrl() && k == Key::from_char('x') => {
                self.copy_to_clipboard(ctx.clipboard);
                self.delete_selection();
                base.emit(ControlEvent::EditBoxChange, true);
            }
            k if mods.is_ctrl() && k == Key::from_char('v') => {
                self.paste_from_clipboard(ctx.clipboard);
                base.emit(ControlEvent::EditBoxChange, true);
            }
            // up, down and every other key stay inside the field
            _ => (),
        }
        true
    }

    pub(crate) fn handle(&mut self, base: &mut ControlBase, ctx: &mut ControlCtx<'_>, msg: ControlMsg) -> bool {
        let pt = ctx.mouse;
        match msg {
            ControlMsg::Char(ch) => {
                self.handle_char(base, ctx, ch);
                true
            }
            ControlMsg::Key { key, action, mods } if action.is_down() => self.handle_key(base, ctx, key, mods),
            ControlMsg::Key { key, .. } => !matches!(key, Key::TAB | Key::ESCAPE),
            ControlMsg::Press { button: MouseButton::Left, .. } => {
                if !base.rect.contains(pt) {
                    return false;
                }
                if !base.has_focus {
                    base.request_focus();
                }
                self.drag = true;
                if let Some(cp) = self.cp_at(pt.x) {
                    self.place_caret(cp);
                    self.sel_start = self.caret;
                    self.reset_blink(ctx.now);
                }
                true
            }
            ControlMsg::Release { button: MouseButton::Left, .. } => {
                self.drag = false;
                false
            }
            ControlMsg::Move if self.drag => {
                if let Some(cp) = self.cp_at(pt.x) {
                    self.place_caret(cp);
                }
                true
            }
            _ => false,
        }
    }

    pub(crate) fn render(&mut self, base: &mut ControlBase, draw: &mut DrawCtx<'_>, dt: f32) {
        if let Some(font) = base.elements.first().and_then(|e| draw.font(e.font_index)) {
            if self.buffer.font().is_none() {
                self.buffer.set_font(Some(font.clone()));
            }
        }
        self.place_caret(self.caret);

        for (e, rect) in base.elements.iter_mut().zip(self.render_rects.iter()) {
            e.texture_color.blend(ControlState::Normal, dt, DEFAULT_BLEND_RATE);
            draw.draw_sprite(e, *rect, FAR_BUTTON_DEPTH);
        }

        self.update_blink(draw.now(), draw.blink_period());
        let Some(element) = base.elements.first().copied() else { return };
        let (Ok(x_first), Ok(caret_x)) = (self.buffer.cp_to_x(self.first_visible, false), self.buffer.cp_to_x(self.caret, false)) else { return };
        let text = self.text_rect;
        let origin = text.left - x_first;

        let mut selection = None;
        if self.caret != self.sel_start {
            let sel_x = self.buffer.cp_to_x(self.sel_start, false).unwrap_or(caret_x);
            let band = Rect::new(caret_x.min(sel_x) + origin, text.top, caret_x.max(sel_x) + origin, text.bottom);
            selection = band.intersect(&text);
            if let Some(band) = selection {
                draw.draw_rect(band, self.sel_bk_color, NEAR_BUTTON_DEPTH);
            }
        }

        draw.draw_text_clipped(&self.buffer.text_from(self.first_visible), &element, text, false, Some(text.right), self.text_color);

        if let Some(band) = selection {
            let (first, last) = self.selection();
            let shown = self.buffer.text_range(first.max(self.first_visible), last);
            draw.draw_text_clipped(&shown, &element, band, false, Some(band.right), self.sel_text_color);
        }

        if base.has_focus && self.caret_on && !self.hide_caret {
            let px = draw.pixel();
            let mut caret = Rect::new(origin + caret_x - px, text.top, origin + caret_x + px, text.bottom);
            if !self.insert_mode {
                if let Ok(right) = self.buffer.cp_to_x(self.caret, true) {
                    caret.right = origin + right;
                }
            }
            draw.draw_rect(caret, self.caret_color, NEAR_BUTTON_DEPTH);
        }
    }
}

impl WidgetMut<'_, EditBox> {
    /// Replaces the content and moves the caret to the end. With `selected` the whole text is selected.
    pub fn set_text(&mut self, text: &str, selected: bool) -> Result<()> {
        let eb = &mut *self.widget;
        eb.buffer.set_text(text)?;
        eb.first_visible = 0;
        eb.place_caret(eb.buffer.len());
        eb.sel_start = if selected { 0 } else { eb.caret };
        Ok(())
    }

    /// Empties the field.
    pub fn clear_text(&mut self) {
        let eb = &mut *self.widget;
        eb.buffer.clear();
        eb.first_visible = 0;
        eb.place_caret(0);
        eb.sel_start = 0;
    }

    /// Writes `values` with four decimals, separated by single spaces.
    pub fn set_text_float_array(&mut self, values: &[f32]) -> Result<()> {
        let text = values.iter().map(|v| format!("{:.4}", v)).collect::<Vec<_>>().join(" ");
        self.set_text(&text, false)
    }

    /// Colour of unselected text.
    pub fn set_text_color(&mut self, color: Color) { self.widget.text_color = color }

    /// Colour of selected text.
    pub fn set_selected_text_color(&mut self, color: Color) { self.widget.sel_text_color = color }

    /// Fill behind selected text.
    pub fn set_selected_back_color(&mut self, color: Color) { self.widget.sel_bk_color = color }

    /// Caret colour.
    pub fn set_caret_color(&mut self, color: Color) { self.widget.caret_color = color }

    /// Frame thickness in pixels.
    pub fn set_border(&mut self, px: f32) {
        self.widget.border_px = px;
        self.base.stale = true;
    }

    /// Gap between the frame and the text in pixels.
    pub fn set_spacing(&mut self, px: f32) {
        self.widget.spacing_px = px;
        self.base.stale = true;
    }

    /// Suppresses drawing of the caret.
    pub fn set_hide_caret(&mut self, hide: bool) { self.widget.hide_caret = hide }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::tests::*;

    const ADV: f32 = 8.0 * 0.0625 / 16.0;

    fn edit_box() -> (ControlBase, EditBox) {
        let h = Harness::new();
        let rect = Rect::from_origin(0.1, 0.1, 0.3, 0.06);
        let mut base = ControlBase::new(11, rect);
        base.has_focus = true;
        let mut eb = EditBox::new();
        eb.update_rects(rect, h.fonts[0].as_ref(), 1.0 / 600.0);
        (base, eb)
    }

    fn type_str(eb: &mut EditBox, base: &mut ControlBase, h: &mut Harness, s: &str) {
        for ch in s.chars() {
            assert!(eb.handle(base, &mut h.ctx(0.0, 0.0), ControlMsg::Char(ch)));
        }
    }

    fn ctrl(letter: char) -> ControlMsg { ControlMsg::Key { key: Key::from_char(letter), action: Action::Press, mods: KeyMods::CTRL } }

    #[test]
    fn select_all_copy_then_paste_at_end() {
        let mut h = Harness::new();
        let (mut base, mut eb) = edit_box();
        type_str(&mut eb, &mut base, &mut h, "abc");
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), ctrl('a'));
        assert_eq!((eb.selection_start(), eb.caret()), (0, 3));
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), ctrl('c'));
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::END, Action::Press));
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), ctrl('v'));
        assert_eq!(eb.text(), "abcabc");
        assert_eq!(eb.caret(), 6);
        assert_eq!(eb.selection_start(), 6);
    }

    #[test]
    fn typing_replaces_the_selection() {
        let mut h = Harness::new();
        let (mut base, mut eb) = edit_box();
        type_str(&mut eb, &mut base, &mut h, "hello");
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), ControlMsg::Key { key: Key::LEFT, action: Action::Press, mods: KeyMods::SHIFT });
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), ControlMsg::Key { key: Key::LEFT, action: Action::Press, mods: KeyMods::SHIFT });
        assert_eq!(eb.selected_text(), "lo");
        type_str(&mut eb, &mut base, &mut h, "p");
        assert_eq!(eb.text(), "help");
        assert_eq!(events(&mut base).iter().filter(|e| **e == ControlEvent::EditBoxChange).count(), 6);
    }

    #[test]
    fn overwrite_mode_replaces_in_place() {
        let mut h = Harness::new();
        let (mut base, mut eb) = edit_box();
        type_str(&mut eb, &mut base, &mut h, "abcd");
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::HOME, Action::Press));
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::INSERT, Action::Press));
        assert!(!eb.is_insert_mode());
        type_str(&mut eb, &mut base, &mut h, "XY");
        assert_eq!(eb.text(), "XYcd");
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::END, Action::Press));
        type_str(&mut eb, &mut base, &mut h, "e");
        assert_eq!(eb.text(), "XYcde");
    }

    #[test]
    fn backspace_and_delete() {
        let mut h = Harness::new();
        let (mut base, mut eb) = edit_box();
        type_str(&mut eb, &mut base, &mut h, "abcd");
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::BACKSPACE, Action::Press));
        assert_eq!(eb.text(), "abc");
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::HOME, Action::Press));
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::DELETE, Action::Press));
        assert_eq!(eb.text(), "bc");
        assert_eq!(eb.caret(), 0);
        events(&mut base);
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::BACKSPACE, Action::Press));
        assert!(events(&mut base).is_empty());
    }

    #[test]
    fn cut_empties_selection_into_clipboard() {
        let mut h = Harness::new();
        let (mut base, mut eb) = edit_box();
        type_str(&mut eb, &mut base, &mut h, "cut me");
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), ControlMsg::Char('\u{1}'));
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), ControlMsg::Char('\u{18}'));
        assert!(eb.is_empty());
        assert_eq!(h.clipboard.get_text().as_deref(), Some("cut me"));
    }

    #[test]
    fn enter_reports_without_changing_text() {
        let mut h = Harness::new();
        let (mut base, mut eb) = edit_box();
        type_str(&mut eb, &mut base, &mut h, "go");
        events(&mut base);
        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::ENTER, Action::Press));
        assert_eq!(events(&mut base), vec![ControlEvent::EditBoxString]);
        assert_eq!(eb.text(), "go");
    }

    #[test]
    fn tab_and_escape_pass_through() {
        let mut h = Harness::new();
        let (mut base, mut eb) = edit_box();
        assert!(!eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::TAB, Action::Press)));
        assert!(!eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::ESCAPE, Action::Press)));
        assert!(eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::UP, Action::Press)));
        assert!(eb.handle(&mut base, &mut h.ctx(0.0, 0.0), ControlMsg::Char('\u{1a}')));
        assert!(eb.is_empty());
    }

    #[test]
    fn caret_stays_inside_the_text_area() {
        let mut h = Harness::new();
        let (mut base, mut eb) = edit_box();
        type_str(&mut eb, &mut base, &mut h, "abcdefghijkl");
        assert_eq!(eb.first_visible(), 4);
        let visible = (eb.caret() - eb.first_visible()) as f32 * ADV;
        assert!(visible <= eb.text_rect().width() + 1e-6);
        assert!(eb.first_visible() <= eb.caret());

        eb.handle(&mut base, &mut h.ctx(0.0, 0.0), key(Key::HOME, Action::Press));
        assert_eq!(eb.first_visible(), 0);
    }

    #[test]
    fn press_rounds_to_nearest_edge_and_drag_extends() {
        let mut h = Harness::new();
        let (mut base, mut eb) = edit_box();
        type_str(&mut eb, &mut base, &mut h, "abc");
        let left = eb.text_rect().left;
        assert!(eb.handle(&mut base, &mut h.ctx(left + 1.8 * ADV, 0.12), press()));
        assert_eq!((eb.caret(), eb.selection_start()), (2, 2));
        eb.handle(&mut base, &mut h.ctx(left + 0.1 * ADV, 0.12), ControlMsg::Move);
        assert_eq!((eb.caret(), eb.selection_start()), (0, 2));
        eb.handle(&mut base, &mut h.ctx(left, 0.12), release());
        eb.handle(&mut base, &mut h.ctx(left + 3.0 * ADV, 0.12), ControlMsg::Move);
        assert_eq!(eb.caret(), 0);
    }

    #[test]
    fn only_a_press_inside_asks_for_focus() {
        let mut h = Harness::new();
        let (mut base, mut eb) = edit_box();
        base.has_focus = false;
        assert!(!eb.handle(&mut base, &mut h.ctx(0.6, 0.5), press()));
        assert!(base.outbox.is_empty());
        assert!(!eb.drag);

        assert!(eb.handle(&mut base, &mut h.ctx(0.2, 0.12), press()));
        assert_eq!(base.outbox, vec![Effect::RequestFocus]);
    }

    #[test]
    fn float_arrays() {
        let (mut base, mut eb) = edit_box();
        let mut view = WidgetMut { base: &mut base, widget: &mut eb };
        view.set_text_float_array(&[1.0, -2.5, 0.125]).unwrap();
        assert_eq!(view.text(), "1.0000 -2.5000 0.1250");
        assert_eq!(view.parse_float_array(2), vec![1.0, -2.5]);
        view.set_text("  3 x 4.5", true).unwrap();
        assert_eq!(view.selection_start(), 0);
        assert_eq!(view.parse_float_array(8), vec![3.0, 4.5]);
    }

    #[test]
    fn caret_blinks_with_the_period() {
        let (_, mut eb) = edit_box();
        eb.reset_blink(1.0);
        eb.update_blink(1.5, 1.0);
        assert!(eb.is_caret_on());
        eb.update_blink(2.0, 1.0);
        assert!(!eb.is_caret_on());
        eb.reset_blink(2.2);
        assert!(eb.is_caret_on());
    }
}
