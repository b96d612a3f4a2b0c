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
//! Event entry points of the resource manager: raw tuple normalisation, routing through the
//! dialog chain and focus cycling across dialogs.

use tracing::warn;

use crate::dialog::Routed;
use crate::*;

/// Upper bound on focus cycling steps.
const MAX_CYCLE_STEPS: usize = 0xFFFF;

impl<R: Renderer> ResourceManager<R> {
    /// Normalises a raw host tuple and dispatches it. Malformed tuples are not handled.
    pub fn dispatch_raw(&mut self, kind: MessageKind, p1: i32, p2: i32, p3: i32, p4: i32) -> bool {
        match Event::from_raw(kind, p1, p2, p3, p4) {
            Some(event) => self.dispatch(&event),
            None => false,
        }
    }

    /// Routes `event` through every dialog, topmost first, until one handles it.
    /// Returns `false` when the host should process the event itself.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        self.observe(event);
        let ids: Vec<DialogId> = self.ring.ids().collect();
        let mut handled = false;
        for id in ids.into_iter().rev() {
            if self.route(id, event) {
                handled = true;
                break;
            }
        }
        self.settle(event);
        handled
    }

    /// Routes `event` to one dialog only.
    pub fn msg_proc(&mut self, dialog: DialogId, event: &Event) -> bool {
        self.observe(event);
        let handled = self.route(dialog, event);
        self.settle(event);
        handled
    }

    /// Updates window and pointer state before any dialog sees the event.
    fn observe(&mut self, event: &Event) {
        match *event {
            Event::Resize { width, height } => self.set_window_size(width, height),
            Event::CursorPos { x, y } => self.shared.cursor.set(Some((x as f32, y as f32))),
            _ => (),
        }
    }

    fn settle(&mut self, event: &Event) {
        if let Event::MouseButton { button: MouseButton::Left, action: Action::Release, .. } = event {
            self.shared.input.borrow_mut().pressed = None;
        }
        self.drain_blurred();
    }

    fn route(&mut self, id: DialogId, event: &Event) -> bool {
        let Some(dialog) = self.ring.get_mut(id) else { return false };
        match dialog.msg_proc(event) {
            Routed::Handled => true,
            Routed::Ignored => false,
            Routed::CycleFocus(forward) => self.cycle_focus(forward),
        }
    }

    fn control_count(&self, id: DialogId) -> usize { self.ring.get(id).map_or(0, |d| d.control_count()) }

    /// Control after (or before) `key` in ring order, crossing into neighbouring dialogs.
    fn neighbour(&self, key: ControlKey, forward: bool) -> Option<ControlKey> {
        let mut dialog = key.dialog;
        let mut index = if forward { key.index as isize + 1 } else { key.index as isize - 1 };
        for _ in 0..=self.ring.len() {
            let len = self.control_count(dialog) as isize;
            if index >= 0 && index < len {
                return Some(ControlKey { dialog, index: index as usize });
            }
            if forward {
                dialog = self.ring.next(dialog)?;
                index = 0;
            } else {
                dialog = self.ring.prev(dialog)?;
                index = self.control_count(dialog) as isize - 1;
            }
        }
        None
    }

    /// First control of the first dialog that has one, or last of the last.
    fn edge_control(&self, forward: bool) -> Option<ControlKey> {
        let ids: Vec<DialogId> = self.ring.ids().collect();
        let pick = |id: &DialogId| {
            let len = self.control_count(*id);
            (len > 0).then(|| ControlKey { dialog: *id, index: if forward { 0 } else { len - 1 } })
        };
        if forward { ids.iter().find_map(pick) } else { ids.iter().rev().find_map(pick) }
    }

    /// Moves focus to the next control able to take it. Wrapping past the first or last
    /// dialog leaves nothing focused so the host gets the keyboard back.
    pub(crate) fn cycle_focus(&mut self, forward: bool) -> bool {
        let focus = self.shared.input.borrow().focus;
        let (mut last, mut candidate) = match focus {
            None => match self.edge_control(forward) {
                Some(k) => (k.dialog, k),
                None => return true,
            },
            Some(f) => match self.neighbour(f, forward) {
                Some(k) => (f.dialog, k),
                None => return true,
            },
        };

        let position = |ring: &DialogRing, id: DialogId| ring.position(id).map_or(-1, |p| p as isize);
        for _ in 0..MAX_CYCLE_STEPS {
            let last_pos = position(&self.ring, last);
            let pos = position(&self.ring, candidate.dialog);
            if (!forward && last_pos < pos) || (forward && pos < last_pos) {
                self.shared.input.borrow_mut().set_focus(None, false);
                return true;
            }
            if Some(candidate) == focus {
                return true;
            }
            if let Some(dialog) = self.ring.get_mut(candidate.dialog) {
                if dialog.is_keyboard_input_enabled() && dialog.focus_index(candidate.index) {
                    return true;
                }
            }
            last = candidate.dialog;
            candidate = match self.neighbour(candidate, forward) {
                Some(k) => k,
                None => return true,
            };
        }
        warn!("focus cycling did not close the dialog ring");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::tests::RecordingRenderer;
    use crate::resource::tests::manager;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(ControlEvent, i32)>>>;

    fn listen(rm: &mut ResourceManager<RecordingRenderer>, id: DialogId) -> Log {
        let log: Log = Rc::default();
        let sink = log.clone();
        if let Some(d) = rm.dialog_mut(id) {
            d.set_callback(Box::new(move |ev: ControlEvent, cid: i32, _: &Control| sink.borrow_mut().push((ev, cid))));
        }
        log
    }

    fn move_to(rm: &mut ResourceManager<RecordingRenderer>, x: f32, y: f32) {
        let (w, h) = rm.window_size();
        let (px, py) = normalized_to_screen(Vec2f::new(x, y), w, h);
        rm.dispatch(&Event::CursorPos { x: px.round() as i32, y: py.round() as i32 });
    }

    fn button(rm: &mut ResourceManager<RecordingRenderer>, action: Action) -> bool { rm.dispatch(&Event::MouseButton { button: MouseButton::Left, action, mods: KeyMods::NONE }) }

    fn key(rm: &mut ResourceManager<RecordingRenderer>, key: Key, mods: KeyMods) -> bool {
        let handled = rm.dispatch(&Event::Key { key, scancode: 0, action: Action::Press, mods });
        rm.dispatch(&Event::Key { key, scancode: 0, action: Action::Release, mods });
        handled
    }

    fn tab(rm: &mut ResourceManager<RecordingRenderer>) { key(rm, Key::TAB, KeyMods::NONE); }

    fn focused_id(rm: &ResourceManager<RecordingRenderer>) -> Option<i32> {
        let k = rm.focused_control()?;
        rm.dialog(k.dialog).and_then(|d| d.controls().get(k.index)).map(|c| c.id())
    }

    fn add(rm: &mut ResourceManager<RecordingRenderer>, d: DialogId, f: impl FnOnce(&mut Dialog) -> Result<()>) {
        match rm.dialog_mut(d) {
            Some(dialog) => {
                if let Err(e) = f(dialog) {
                    panic!("adding control failed: {}", e)
                }
            }
            None => panic!("no dialog"),
        }
    }

    #[test]
    fn button_click_by_pointer() {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| dl.add_button(42, "ok", 0.1, 0.1, 0.2, 0.05, None, false));
        let log = listen(&mut rm, d);

        move_to(&mut rm, 0.15, 0.12);
        assert!(button(&mut rm, Action::Press));
        assert!(rm.pressed_control().is_some());
        assert!(button(&mut rm, Action::Release));
        assert_eq!(*log.borrow(), vec![(ControlEvent::ButtonClicked, 42)]);
        assert!(rm.pressed_control().is_none());
        // without keyboard input the click does not leave focus behind
        assert!(rm.focused_control().is_none());
    }

    #[test]
    fn press_and_drag_off_cancels() {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| dl.add_button(42, "ok", 0.1, 0.1, 0.2, 0.05, None, false));
        let log = listen(&mut rm, d);

        move_to(&mut rm, 0.15, 0.12);
        button(&mut rm, Action::Press);
        move_to(&mut rm, 0.5, 0.5);
        button(&mut rm, Action::Release);
        assert!(log.borrow().is_empty());
        assert_eq!(rm.dialog(d).and_then(|dl| dl.button(42)).map(|b| b.is_pressed()), Some(false));
    }

    #[test]
    fn radio_group_stays_exclusive() {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| dl.add_radio_button(1, 7, "a", 0.1, 0.1, 0.2, 0.05, false, Some(Key::from_char('a')), false));
        add(&mut rm, d, |dl| dl.add_radio_button(2, 7, "b", 0.1, 0.2, 0.2, 0.05, false, None, false));
        add(&mut rm, d, |dl| dl.add_radio_button(3, 7, "c", 0.1, 0.3, 0.2, 0.05, false, None, false));
        let log = listen(&mut rm, d);

        assert!(key(&mut rm, Key::from_char('a'), KeyMods::NONE));
        move_to(&mut rm, 0.15, 0.22);
        button(&mut rm, Action::Press);
        button(&mut rm, Action::Release);

        let dl = rm.dialog(d).expect("dialog");
        let checked: Vec<bool> = [1, 2, 3].iter().map(|id| dl.radio_button(*id).is_some_and(|r| r.is_checked())).collect();
        assert_eq!(checked, vec![false, true, false]);
        assert_eq!(*log.borrow(), vec![(ControlEvent::RadioButtonChanged, 1), (ControlEvent::RadioButtonChanged, 2)]);
    }

    #[test]
    fn non_user_events_are_opt_in() {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| dl.add_check_box(5, "c", 0.1, 0.1, 0.2, 0.05, false, None, false));
        let log = listen(&mut rm, d);
        let dl = rm.dialog_mut(d).expect("dialog");
        if let Some(mut cb) = dl.check_box_mut(5) {
            cb.set_checked(true);
        }
        dl.flush_events();
        assert!(log.borrow().is_empty());

        dl.enable_non_user_events(true);
        if let Some(mut cb) = dl.check_box_mut(5) {
            cb.set_checked(false);
        }
        rm.flush_events();
        assert_eq!(*log.borrow(), vec![(ControlEvent::CheckBoxChanged, 5)]);
    }

    fn two_dialogs() -> (ResourceManager<RecordingRenderer>, DialogId, DialogId) {
        let (mut rm, _) = manager();
        let d1 = rm.add_dialog();
        let d2 = rm.add_dialog();
        add(&mut rm, d1, |dl| dl.add_button(1, "c1", 0.1, 0.1, 0.1, 0.05, None, false));
        add(&mut rm, d1, |dl| dl.add_button(2, "c2", 0.1, 0.2, 0.1, 0.05, None, false));
        add(&mut rm, d2, |dl| dl.add_button(3, "c3", 0.6, 0.1, 0.1, 0.05, None, false));
        rm.enable_keyboard_input_for_all_dialogs(true);
        (rm, d1, d2)
    }

    #[test]
    fn tab_cycles_across_dialogs_and_wraps_to_nothing() {
        let (mut rm, d1, _) = two_dialogs();
        assert!(rm.dialog_mut(d1).is_some_and(|d| d.request_focus(2)));
        assert_eq!(focused_id(&rm), Some(2));

        tab(&mut rm);
        assert_eq!(focused_id(&rm), Some(3));
        assert!(rm.dialog(d1).and_then(|d| d.get_control(2)).is_some_and(|c| !c.base().has_focus()));
        tab(&mut rm);
        assert_eq!(focused_id(&rm), None);
        tab(&mut rm);
        assert_eq!(focused_id(&rm), Some(1));
    }

    #[test]
    fn shift_tab_walks_backward() {
        let (mut rm, _, d2) = two_dialogs();
        assert!(rm.dialog_mut(d2).is_some_and(|d| d.request_focus(3)));
        key(&mut rm, Key::TAB, KeyMods::SHIFT);
        assert_eq!(focused_id(&rm), Some(2));
        key(&mut rm, Key::UP, KeyMods::NONE);
        assert_eq!(focused_id(&rm), Some(1));
        key(&mut rm, Key::LEFT, KeyMods::NONE);
        assert_eq!(focused_id(&rm), None);
        // arrows need an existing focus, tab does not
        key(&mut rm, Key::DOWN, KeyMods::NONE);
        assert_eq!(focused_id(&rm), None);
        key(&mut rm, Key::TAB, KeyMods::SHIFT);
        assert_eq!(focused_id(&rm), Some(3));
    }

    #[test]
    fn single_dialog_never_drops_focus() {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| dl.add_button(1, "a", 0.1, 0.1, 0.1, 0.05, None, false));
        add(&mut rm, d, |dl| dl.add_button(2, "b", 0.1, 0.2, 0.1, 0.05, None, false));
        add(&mut rm, d, |dl| dl.add_static(9, "label", 0.1, 0.3, 0.1, 0.05, false));
        rm.enable_keyboard_input_for_all_dialogs(true);
        assert!(rm.dialog_mut(d).is_some_and(|dl| dl.request_focus(1)));
        for expected in [2, 1, 2, 1] {
            tab(&mut rm);
            assert_eq!(focused_id(&rm), Some(expected));
        }
    }

    #[test]
    fn keyboard_navigation_needs_keyboard_input() {
        let (mut rm, d1, _) = two_dialogs();
        rm.enable_keyboard_input_for_all_dialogs(false);
        assert!(rm.dialog_mut(d1).is_some_and(|d| d.request_focus(1)));
        tab(&mut rm);
        assert_eq!(focused_id(&rm), Some(1));
    }

    #[test]
    fn removing_the_focused_control_clears_focus() {
        let (mut rm, d1, _) = two_dialogs();
        assert!(rm.dialog_mut(d1).is_some_and(|d| d.request_focus(2)));
        rm.dialog_mut(d1).and_then(|d| d.remove_control(1));
        // indices shift down with the removal
        assert_eq!(rm.focused_control(), Some(ControlKey { dialog: d1, index: 0 }));
        rm.dialog_mut(d1).and_then(|d| d.remove_control(2));
        assert_eq!(rm.focused_control(), None);
    }

    #[test]
    fn click_outside_controls_blurs() {
        let (mut rm, d1, _) = two_dialogs();
        assert!(rm.dialog_mut(d1).is_some_and(|d| d.request_focus(1)));
        move_to(&mut rm, 0.4, 0.8);
        assert!(!button(&mut rm, Action::Press));
        assert_eq!(rm.focused_control(), None);
    }

    #[test]
    fn hotkeys_are_suspended_while_typing() {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| dl.add_edit_box(1, "", 0.1, 0.1, 0.3, 0.06, false));
        add(&mut rm, d, |dl| dl.add_button(2, "b", 0.1, 0.3, 0.1, 0.05, Some(Key::from_char('b')), false));
        let log = listen(&mut rm, d);

        key(&mut rm, Key::from_char('b'), KeyMods::NONE);
        assert_eq!(*log.borrow(), vec![(ControlEvent::ButtonClicked, 2)]);

        assert!(rm.dialog_mut(d).is_some_and(|dl| dl.request_focus(1)));
        key(&mut rm, Key::from_char('b'), KeyMods::NONE);
        rm.dispatch(&Event::Char('b'));
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(log.borrow()[1], (ControlEvent::EditBoxChange, 1));
        assert_eq!(rm.dialog(d).and_then(|dl| dl.edit_box(1)).map(|e| e.text()), Some("b".to_string()));
    }

    #[test]
    fn hover_tracks_enter_and_leave() {
        let (mut rm, d1, _) = two_dialogs();
        move_to(&mut rm, 0.15, 0.12);
        assert!(rm.dialog(d1).and_then(|d| d.get_control(1)).is_some_and(|c| c.base().is_mouse_over()));
        move_to(&mut rm, 0.15, 0.22);
        let d = rm.dialog(d1).expect("dialog");
        assert!(!d.get_control(1).is_some_and(|c| c.base().is_mouse_over()));
        assert!(d.get_control(2).is_some_and(|c| c.base().is_mouse_over()));
        rm.dispatch(&Event::Resize { width: 1024, height: 768 });
        assert_eq!(rm.dialog(d1).and_then(|d| d.mouse_over_index()), None);
        assert_eq!(rm.window_size(), (1024, 768));
    }

    #[test]
    fn caption_click_toggles_minimise_and_drag_moves() {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| {
            dl.set_location(0.0, 0.0);
            dl.set_size(0.5, 0.5);
            dl.enable_caption(true);
            dl.set_caption_text("tools");
            dl.add_button(1, "a", 0.1, 0.1, 0.1, 0.05, None, false)
        });
        let cap_y = 0.5 - 9.0 / 600.0;
        move_to(&mut rm, 0.2, cap_y);
        assert!(button(&mut rm, Action::Press));
        assert!(button(&mut rm, Action::Release));
        assert!(rm.dialog(d).is_some_and(|dl| dl.is_minimized()));

        // minimised dialogs ignore their controls
        move_to(&mut rm, 0.15, 0.12);
        assert!(!button(&mut rm, Action::Press));
        button(&mut rm, Action::Release);

        move_to(&mut rm, 0.2, cap_y);
        button(&mut rm, Action::Press);
        move_to(&mut rm, 0.3, cap_y);
        button(&mut rm, Action::Release);
        let dl = rm.dialog(d).expect("dialog");
        assert!(dl.is_minimized());
        assert!((dl.location().x - 0.1).abs() < 0.01);
    }

    #[test]
    fn raw_tuples_route_like_events() {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| dl.add_button(42, "ok", 0.1, 0.1, 0.2, 0.05, None, false));
        let log = listen(&mut rm, d);
        rm.dispatch_raw(MessageKind::CursorPos, 190, 528, 0, 0);
        assert!(rm.dispatch_raw(MessageKind::MouseButton, 0, 1, 0, 0));
        assert!(rm.dispatch_raw(MessageKind::MouseButton, 0, 0, 0, 0));
        assert!(!rm.dispatch_raw(MessageKind::MouseButton, 0, 9, 0, 0));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn hidden_dialogs_ignore_everything() {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| dl.add_button(42, "ok", 0.1, 0.1, 0.2, 0.05, Some(Key::F1), false));
        if let Some(dl) = rm.dialog_mut(d) {
            dl.set_visible(false);
        }
        assert!(!key(&mut rm, Key::F1, KeyMods::NONE));
    }

    fn combo_and_button(keyboard: bool) -> (ResourceManager<RecordingRenderer>, DialogId) {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| {
            dl.enable_keyboard_input(keyboard);
            dl.add_combo_box(1, 0.1, 0.6, 0.3, 0.05, None, false)?;
            dl.add_button(2, "ok", 0.5, 0.1, 0.2, 0.05, None, false)?;
            let mut cb = dl.combo_box_mut(1).ok_or_else(|| Error::invalid("combo"))?;
            cb.add_item("one", 10)?;
            cb.add_item("two", 20)
        });
        (rm, d)
    }

    fn combo_opened(rm: &ResourceManager<RecordingRenderer>, d: DialogId) -> Option<bool> { rm.dialog(d).and_then(|dl| dl.combo_box(1)).map(|c| c.is_opened()) }

    #[test]
    fn tab_away_from_open_combo_closes_it() {
        let (mut rm, d) = combo_and_button(true);
        let log = listen(&mut rm, d);

        move_to(&mut rm, 0.15, 0.62);
        assert!(button(&mut rm, Action::Press));
        button(&mut rm, Action::Release);
        assert_eq!(combo_opened(&rm, d), Some(true));
        assert_eq!(focused_id(&rm), Some(1));

        tab(&mut rm);
        assert_eq!(focused_id(&rm), Some(2));
        assert_eq!(combo_opened(&rm, d), Some(false));
        assert_eq!(rm.dialog(d).and_then(|dl| dl.combo_box(1)).and_then(|c| c.selected_data()), Some(10));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn click_elsewhere_closes_combo_and_drops_its_focus() {
        let (mut rm, d) = combo_and_button(false);
        let log = listen(&mut rm, d);

        move_to(&mut rm, 0.15, 0.62);
        button(&mut rm, Action::Press);
        button(&mut rm, Action::Release);
        assert_eq!(combo_opened(&rm, d), Some(true));
        assert_eq!(focused_id(&rm), Some(1));

        move_to(&mut rm, 0.55, 0.12);
        assert!(button(&mut rm, Action::Press));
        assert!(button(&mut rm, Action::Release));
        assert_eq!(combo_opened(&rm, d), Some(false));
        assert_ne!(focused_id(&rm), Some(1));
        assert_eq!(rm.dialog(d).and_then(|dl| dl.combo_box(1)).and_then(|c| c.selected_data()), Some(10));
        assert_eq!(*log.borrow(), vec![(ControlEvent::ComboBoxSelectionChanged, 1), (ControlEvent::ButtonClicked, 2)]);
    }

    #[test]
    fn focus_loss_ends_scroll_bar_drag() {
        let (mut rm, _) = manager();
        let d = rm.add_dialog();
        add(&mut rm, d, |dl| {
            dl.enable_keyboard_input(true);
            dl.add_scroll_bar(1, 0.1, 0.1, 0.05, 0.4)?;
            dl.add_button(2, "ok", 0.5, 0.1, 0.2, 0.05, None, false)?;
            let bar = dl.scroll_bar_mut(1).ok_or_else(|| Error::invalid("bar"))?;
            bar.set_track_range(0, 20);
            bar.set_page_size(5);
            Ok(())
        });
        let dragging = |rm: &ResourceManager<RecordingRenderer>| rm.dialog(d).and_then(|dl| dl.scroll_bar(1)).map(|s| s.is_dragging());

        tab(&mut rm);
        assert_eq!(focused_id(&rm), Some(1));
        let thumb = rm.dialog(d).and_then(|dl| dl.scroll_bar(1)).map(|s| s.thumb_rect()).expect("scroll bar");
        assert!(thumb.height() > 0.0);
        move_to(&mut rm, (thumb.left + thumb.right) * 0.5, (thumb.top + thumb.bottom) * 0.5);
        assert!(button(&mut rm, Action::Press));
        assert_eq!(dragging(&rm), Some(true));

        tab(&mut rm);
        assert_eq!(focused_id(&rm), Some(2));
        assert_eq!(dragging(&rm), Some(false));
    }
}
