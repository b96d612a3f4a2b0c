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

/// Delay before a held arrow starts repeating, in seconds.
pub const ARROW_CLICK_DELAY: f64 = 0.33;
/// Interval between repeats of a held arrow, in seconds.
pub const ARROW_CLICK_REPEAT: f64 = 0.05;
/// Smallest thumb height in window pixels.
pub const MIN_THUMB_PX: f32 = 8.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Auto-repeat state of the arrow buttons.
pub enum ArrowState {
    /// No arrow held.
    Clear,
    /// Up arrow clicked, waiting for the repeat delay.
    ClickedUp,
    /// Up arrow held and repeating.
    HeldUp,
    /// Down arrow clicked, waiting for the repeat delay.
    ClickedDown,
    /// Down arrow held and repeating.
    HeldDown,
}

#[derive(Clone, Debug)]
/// Vertical scroll bar over an integer range of rows.
///
/// `position` is the first visible row. Growing positions scroll down.
pub struct ScrollBar {
    bounds: Rect,
    up: Rect,
    down: Rect,
    track: Rect,
    thumb: Rect,
    show_thumb: bool,
    drag: bool,
    drag_offset: f32,
    start: i32,
    end: i32,
    page: i32,
    position: i32,
    arrow: ArrowState,
    arrow_ts: f64,
    last_mouse: Point,
    pixel: f32,
}

impl Default for ScrollBar {
    fn default() -> Self { Self::new() }
}

impl ScrollBar {
    /// Creates a bar over `0..1` with a page of one row.
    pub fn new() -> Self {
        Self {
            bounds: Rect::default(),
            up: Rect::default(),
            down: Rect::default(),
            track: Rect::default(),
            thumb: Rect::default(),
            show_thumb: true,
            drag: false,
            drag_offset: 0.0,
            start: 0,
            end: 1,
            page: 1,
            position: 0,
            arrow: ArrowState::Clear,
            arrow_ts: 0.0,
            last_mouse: Vec2f::new(-1.0, -1.0),
            pixel: 0.0,
        }
    }

    /// First row of the range.
    pub fn track_start(&self) -> i32 { self.start }

    /// One past the last row of the range.
    pub fn track_end(&self) -> i32 { self.end }

    /// First visible row.
    pub fn track_pos(&self) -> i32 { self.position }

    /// Number of rows visible at once.
    pub fn page_size(&self) -> i32 { self.page }

    /// `false` when the whole range fits in one page.
    pub fn is_thumb_visible(&self) -> bool { self.show_thumb }

    /// `true` while the thumb is being dragged.
    pub fn is_dragging(&self) -> bool { self.drag }

    /// Arrow auto-repeat state.
    pub fn arrow_state(&self) -> ArrowState { self.arrow }

    /// Bounding rectangle.
    pub fn bounds(&self) -> Rect { self.bounds }

    /// Thumb rectangle; empty when hidden.
    pub fn thumb_rect(&self) -> Rect { self.thumb }

    /// Track rectangle between the arrows.
    pub fn track_rect(&self) -> Rect { self.track }

    /// Up arrow rectangle.
    pub fn up_rect(&self) -> Rect { self.up }

    /// Down arrow rectangle.
    pub fn down_rect(&self) -> Rect { self.down }

    pub(crate) fn update_rects(&mut self, bounds: Rect, pixel: f32) {
        let w = bounds.width();
        self.bounds = bounds;
        self.pixel = pixel;
        self.up = Rect::new(bounds.left, bounds.top, bounds.right, bounds.top - w);
        self.down = Rect::new(bounds.left, bounds.bottom + w, bounds.right, bounds.bottom);
        self.track = Rect::new(bounds.left, self.up.bottom, bounds.right, self.down.top);
        self.thumb.left = bounds.left;
        self.thumb.right = bounds.right;
        self.update_thumb();
    }

    fn update_thumb(&mut self) {
        let range = self.end - self.start;
        if range > self.page {
            let track_h = self.track.height();
            let thumb_h = (track_h * self.page as f32 / range as f32).max(MIN_THUMB_PX * self.pixel).min(track_h.max(0.0));
            let max_pos = (range - self.page) as f32;
            let offset = ((self.position - self.start) as f32 * (track_h - thumb_h) / max_pos).min(track_h - thumb_h).max(0.0);
            self.thumb.top = self.track.top - offset;
            self.thumb.bottom = self.thumb.top - thumb_h;
            self.show_thumb = true;
        } else {
            self.thumb.bottom = self.thumb.top;
            self.show_thumb = false;
        }
    }

    /// Clamps the position into `[start, max(start, end - page + 1)]`.
    fn cap(&mut self) {
        if self.position < self.start || self.end - self.start <= self.page {
            self.position = self.start;
        } else if self.position + self.page > self.end {
            self.position = self.end - self.page + 1;
        }
    }

    /// Scrolls by `delta` rows; positive scrolls down.
    pub fn scroll(&mut self, delta: i32) {
        self.position += delta;
        self.cap();
        self.update_thumb();
    }

    /// Scrolls the minimum amount that brings row `index` into the page.
    pub fn show_item(&mut self, index: i32) {
        let index = index.min(self.end - 1).max(0);
        if self.position > index {
            self.position = index;
        } else if self.position + self.page <= index {
            self.position = index - self.page + 1;
        }
        self.cap();
        self.update_thumb();
    }

    /// Replaces the row range.
    pub fn set_track_range(&mut self, start: i32, end: i32) {
        self.start = start;
        self.end = end;
        self.cap();
        self.update_thumb();
    }

    /// Moves to row `position`, capped to the range.
    pub fn set_track_pos(&mut self, position: i32) {
        self.position = position;
        self.cap();
        self.update_thumb();
    }

    /// Sets how many rows fit in one page.
    pub fn set_page_size(&mut self, page: i32) {
        self.page = page;
        self.cap();
        self.update_thumb();
    }

    pub(crate) fn cancel_drag(&mut self) {
        self.drag = false;
        self.arrow = ArrowState::Clear;
    }

    pub(crate) fn handle(&mut self, ctx: &mut ControlCtx<'_>, msg: ControlMsg) -> bool {
        let pt = ctx.mouse;
        self.last_mouse = pt;
        match msg {
            ControlMsg::Press { button: MouseButton::Left, .. } => {
                if self.up.contains(pt) {
                    if self.position > self.start {
                        self.position -= 1;
                    }
                    self.update_thumb();
                    self.arrow = ArrowState::ClickedUp;
                    self.arrow_ts = ctx.now;
                    return true;
                }
                if self.down.contains(pt) {
                    if self.position + self.page <= self.end {
                        self.position += 1;
                    }
                    self.update_thumb();
                    self.arrow = ArrowState::ClickedDown;
                    self.arrow_ts = ctx.now;
                    return true;
                }
                if self.show_thumb && self.thumb.contains(pt) {
                    self.drag = true;
                    self.drag_offset = pt.y - self.thumb.top;
                    return true;
                }
                if self.thumb.left <= pt.x && pt.x < self.thumb.right {
                    if pt.y >= self.thumb.top && pt.y < self.track.top {
                        self.scroll(-(self.page - 1));
                        return true;
                    }
                    if pt.y < self.thumb.bottom && pt.y >= self.track.bottom {
                        self.scroll(self.page - 1);
                        return true;
                    }
                }
                false
            }
            ControlMsg::Release { button: MouseButton::Left, .. } => {
                self.drag = false;
                self.update_thumb();
                self.arrow = ArrowState::Clear;
                false
            }
            ControlMsg::Move if self.drag => {
                self.drag_thumb(pt.y);
                true
            }
            ControlMsg::Move => {
                let over = match self.arrow {
                    ArrowState::ClickedUp | ArrowState::HeldUp => self.up.contains(pt),
                    ArrowState::ClickedDown | ArrowState::HeldDown => self.down.contains(pt),
                    ArrowState::Clear => true,
                };
                if !over {
                    self.arrow = ArrowState::Clear;
                }
                false
            }
            ControlMsg::Scroll(lines) if self.bounds.contains(pt) => {
                self.scroll(-(lines * ctx.config.wheel_scroll_lines as f32).round() as i32);
                true
            }
            _ => false,
        }
    }

    fn drag_thumb(&mut self, y: f32) {
        let thumb_h = self.thumb.height();
        let top = (y - self.drag_offset).min(self.track.top).max(self.track.bottom + thumb_h);
        self.thumb.top = top;
        self.thumb.bottom = top - thumb_h;

        let max_first = self.end - self.start - self.page + 1;
        let max_thumb = self.track.height() - thumb_h;
        if max_first > 0 && max_thumb > 0.0 {
            // half a row of bias keeps the last row reachable
            let travel = self.track.top - self.thumb.top + max_thumb / (max_first * 2) as f32;
            self.position = self.start + (travel * max_first as f32 / max_thumb) as i32;
            self.cap();
        }
    }

    /// Advances arrow auto-repeat while the pointer stays on the held arrow.
    pub(crate) fn tick(&mut self, now: f64) {
        let elapsed = now - self.arrow_ts;
        let (delta, next) = match self.arrow {
            ArrowState::ClickedUp if self.up.contains(self.last_mouse) && elapsed > ARROW_CLICK_DELAY => (-1, ArrowState::HeldUp),
            ArrowState::HeldUp if self.up.contains(self.last_mouse) && elapsed > ARROW_CLICK_REPEAT => (-1, ArrowState::HeldUp),
            ArrowState::ClickedDown if self.down.contains(self.last_mouse) && elapsed > ARROW_CLICK_DELAY => (1, ArrowState::HeldDown),
            ArrowState::HeldDown if self.down.contains(self.last_mouse) && elapsed > ARROW_CLICK_REPEAT => (1, ArrowState::HeldDown),
            _ => return,
        };
        self.scroll(delta);
        self.arrow = next;
        self.arrow_ts = now;
    }

    pub(crate) fn render(&mut self, enabled: bool, mouse_over: bool, focused: bool, elements: &mut [Element], draw: &mut DrawCtx<'_>, dt: f32) {
        self.tick(draw.now());
        let state = if !enabled || !self.show_thumb {
            ControlState::Disabled
        } else if mouse_over {
            ControlState::MouseOver
        } else if focused {
            ControlState::Focus
        } else {
            ControlState::Normal
        };
        let rate = state.blend_rate();
        let parts = [(self.track, FAR_BUTTON_DEPTH), (self.up, NEAR_BUTTON_DEPTH), (self.down, NEAR_BUTTON_DEPTH), (self.thumb, NEAR_BUTTON_DEPTH)];
        for (i, (rect, depth)) in parts.into_iter().enumerate() {
            if let Some(e) = elements.get_mut(i) {
                e.texture_color.blend(state, dt, rate);
                if i < 3 || self.show_thumb {
                    draw.draw_sprite(e, rect, depth);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::tests::*;

    fn bar() -> ScrollBar {
        let mut s = ScrollBar::new();
        s.update_rects(Rect::from_origin(0.5, 0.1, 0.05, 0.6), 1.0 / 600.0);
        s.set_track_range(0, 100);
        s.set_page_size(10);
        s.set_track_pos(50);
        s
    }

    #[test]
    fn held_up_arrow_repeats_after_delay() {
        let mut h = Harness::new();
        let mut s = bar();
        let up = s.up_rect();
        let (x, y) = ((up.left + up.right) * 0.5, (up.top + up.bottom) * 0.5);
        assert!(s.handle(&mut h.ctx(x, y), press()));
        assert_eq!(s.track_pos(), 49);
        assert_eq!(s.arrow_state(), ArrowState::ClickedUp);
        s.tick(0.2);
        assert_eq!(s.track_pos(), 49);
        s.tick(0.34);
        assert_eq!(s.track_pos(), 48);
        assert_eq!(s.arrow_state(), ArrowState::HeldUp);
        s.handle(&mut h.ctx(x, y), release());
        s.tick(1.0);
        assert_eq!(s.track_pos(), 48);
        assert_eq!(s.arrow_state(), ArrowState::Clear);
    }

    #[test]
    fn leaving_the_arrow_stops_repeat() {
        let mut h = Harness::new();
        let mut s = bar();
        let down = s.down_rect();
        let (x, y) = ((down.left + down.right) * 0.5, (down.top + down.bottom) * 0.5);
        s.handle(&mut h.ctx(x, y), press());
        assert_eq!(s.track_pos(), 51);
        s.handle(&mut h.ctx(0.0, 0.0), ControlMsg::Move);
        assert_eq!(s.arrow_state(), ArrowState::Clear);
        s.tick(2.0);
        assert_eq!(s.track_pos(), 51);
    }

    #[test]
    fn position_stays_capped() {
        let mut s = bar();
        for delta in [-1000, 3, 1000, -7, 250, -250, 95, 4] {
            s.scroll(delta);
            let hi = s.track_start().max(s.track_end() - s.page_size() + 1);
            assert!(s.track_pos() >= s.track_start() && s.track_pos() <= hi);
        }
        s.set_track_range(0, 5);
        assert_eq!(s.track_pos(), 0);
    }

    #[test]
    fn thumb_hidden_iff_range_fits_page() {
        let mut s = bar();
        assert!(s.is_thumb_visible());
        assert!(s.thumb_rect().height() >= MIN_THUMB_PX / 600.0 - 1e-6);
        s.set_track_range(0, 10);
        assert!(!s.is_thumb_visible());
        s.set_track_range(0, 11);
        assert!(s.is_thumb_visible());
        s.set_page_size(11);
        assert!(!s.is_thumb_visible());
    }

    #[test]
    fn track_click_pages_toward_pointer() {
        let mut h = Harness::new();
        let mut s = bar();
        let track = s.track_rect();
        let x = (track.left + track.right) * 0.5;
        assert!(s.handle(&mut h.ctx(x, track.bottom + 1e-4), press()));
        assert_eq!(s.track_pos(), 59);
        s.handle(&mut h.ctx(x, track.bottom), release());
        assert!(s.handle(&mut h.ctx(x, track.top - 1e-4), press()));
        assert_eq!(s.track_pos(), 50);
    }

    #[test]
    fn dragging_the_thumb_to_the_bottom_reaches_the_last_page() {
        let mut h = Harness::new();
        let mut s = bar();
        let thumb = s.thumb_rect();
        let x = (thumb.left + thumb.right) * 0.5;
        let y = thumb.top - thumb.height() * 0.5;
        assert!(s.handle(&mut h.ctx(x, y), press()));
        assert!(s.is_dragging());
        assert!(s.handle(&mut h.ctx(x, -10.0), ControlMsg::Move));
        assert_eq!(s.track_pos(), 91);
        assert!(s.handle(&mut h.ctx(x, 10.0), ControlMsg::Move));
        assert_eq!(s.track_pos(), 0);
        s.cancel_drag();
        assert!(!s.is_dragging());
    }

    #[test]
    fn show_item_scrolls_minimally() {
        let mut s = bar();
        s.show_item(55);
        assert_eq!(s.track_pos(), 50);
        s.show_item(70);
        assert_eq!(s.track_pos(), 61);
        s.show_item(3);
        assert_eq!(s.track_pos(), 3);
    }
}
