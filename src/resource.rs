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
//! The resource manager: fonts, textures, draw batches, the dialog ring and the
//! input state shared by every dialog it owns.

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::*;

/// Source of the wall-clock time used by caret blinking, arrow auto-repeat and double clicks.
pub trait Clock {
    /// Seconds since an arbitrary fixed origin.
    fn now(&self) -> f64;
}

/// [`Clock`] backed by [`Instant`], counting from its creation.
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self { Self { origin: Instant::now() } }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 { self.origin.elapsed().as_secs_f64() }
}

#[derive(Clone, Default)]
/// Clock that only moves when told to. Clones share the same time.
pub struct ManualClock {
    time: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Creates a clock reading `time`.
    pub fn new(time: f64) -> Self { Self { time: Rc::new(Cell::new(time)) } }

    /// Jumps to `time`.
    pub fn set(&self, time: f64) { self.time.set(time) }

    /// Moves forward by `dt` seconds.
    pub fn advance(&self, dt: f64) { self.time.set(self.time.get() + dt) }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 { self.time.get() }
}

/// Host clipboard hook. Text is UTF-8.
pub trait Clipboard {
    /// Current clipboard contents, if any.
    fn get_text(&self) -> Option<String>;
    /// Replaces the clipboard contents.
    fn set_text(&mut self, text: &str);
}

#[derive(Clone, Debug, Default)]
/// Process local clipboard.
pub struct MemoryClipboard {
    text: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn get_text(&self) -> Option<String> { self.text.clone() }
    fn set_text(&mut self, text: &str) { self.text = Some(text.to_string()) }
}

#[derive(Clone, Debug)]
/// Tunables of a [`ResourceManager`].
pub struct ResourceConfig {
    /// Window size in pixels until the first resize event.
    pub window_size: (i32, i32),
    /// Seconds between caret visibility flips.
    pub caret_blink_period: f64,
    /// Longest gap between two presses that still counts as a double click.
    pub double_click_interval: f64,
    /// Rows moved per wheel notch.
    pub wheel_scroll_lines: u32,
    /// When set, dialogs refresh their controls after this many seconds without one.
    pub refresh_time: Option<f64>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            window_size: (800, 600),
            caret_blink_period: 1.0,
            double_click_interval: 0.5,
            wheel_scroll_lines: 3,
            refresh_time: None,
        }
    }
}

impl ResourceConfig {
    /// Sets the initial window size.
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Sets the caret blink period.
    pub fn with_caret_blink_period(mut self, period: f64) -> Self {
        self.caret_blink_period = period;
        self
    }

    /// Sets the double-click interval.
    pub fn with_double_click_interval(mut self, interval: f64) -> Self {
        self.double_click_interval = interval;
        self
    }

    /// Sets the rows scrolled per wheel notch.
    pub fn with_wheel_scroll_lines(mut self, lines: u32) -> Self {
        self.wheel_scroll_lines = lines;
        self
    }

    /// Enables periodic dialog refresh.
    pub fn with_refresh_time(mut self, seconds: f64) -> Self {
        self.refresh_time = Some(seconds);
        self
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identifier of a dialog registered with a [`ResourceManager`].
pub struct DialogId(u32);

impl DialogId {
    /// Raw numeric value.
    pub fn raw(self) -> u32 { self.0 }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Addresses one control: its dialog and its position inside it.
pub struct ControlKey {
    /// Owning dialog.
    pub dialog: DialogId,
    /// Index in the dialog's control list.
    pub index: usize,
}

#[derive(Clone, Debug, Default)]
/// The process wide pointers: which control has focus and which one is held by the pointer.
pub struct InputContext {
    pub(crate) focus: Option<ControlKey>,
    pub(crate) pressed: Option<ControlKey>,
    /// The focused control is an edit box; hot-keys are suspended while it types.
    pub(crate) focus_edit: bool,
    /// Controls that lost focus and still need their focus-out handler run by their dialog.
    pub(crate) blurred: Vec<ControlKey>,
}

impl InputContext {
    /// Control owning keyboard focus.
    pub fn focus(&self) -> Option<ControlKey> { self.focus }

    /// Control under a held pointer button.
    pub fn pressed(&self) -> Option<ControlKey> { self.pressed }

    /// Moves focus to `key`, queueing the old owner for its focus-out handler.
    pub(crate) fn set_focus(&mut self, key: Option<ControlKey>, is_edit: bool) {
        if self.focus == key {
            return;
        }
        if let Some(old) = self.focus.take() {
            self.blurred.push(old);
        }
        trace!(?key, "focus moved");
        self.focus = key;
        self.focus_edit = key.is_some() && is_edit;
    }

    /// Drops every reference to the control at `index` of `dialog` and shifts later indices down.
    pub(crate) fn forget_control(&mut self, dialog: DialogId, index: usize) {
        let fix = |k: Option<ControlKey>| match k {
            Some(k) if k.dialog == dialog && k.index == index => None,
            Some(k) if k.dialog == dialog && k.index > index => Some(ControlKey { dialog, index: k.index - 1 }),
            k => k,
        };
        self.focus = fix(self.focus);
        self.focus_edit &= self.focus.is_some();
        self.pressed = fix(self.pressed);
        self.blurred = self.blurred.iter().filter_map(|k| fix(Some(*k))).collect();
    }

    /// Drops every reference into `dialog`.
    pub(crate) fn forget_dialog(&mut self, dialog: DialogId) {
        if self.focus.is_some_and(|k| k.dialog == dialog) {
            self.focus = None;
            self.focus_edit = false;
        }
        if self.pressed.is_some_and(|k| k.dialog == dialog) {
            self.pressed = None;
        }
        self.blurred.retain(|k| k.dialog != dialog);
    }

    pub(crate) fn focus_in(&self, dialog: DialogId) -> Option<usize> { self.focus.filter(|k| k.dialog == dialog).map(|k| k.index) }
}

/// State every dialog of one manager reads and writes.
pub(crate) struct Shared {
    pub(crate) input: RefCell<InputContext>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) clipboard: RefCell<Box<dyn Clipboard>>,
    pub(crate) config: ResourceConfig,
    pub(crate) window: Cell<(i32, i32)>,
    /// Last pointer position in window pixels.
    pub(crate) cursor: Cell<Option<(f32, f32)>>,
}

impl Shared {
    pub(crate) fn now(&self) -> f64 { self.clock.now() }

    /// One window pixel in dialog units.
    pub(crate) fn pixel(&self) -> f32 {
        let (w, h) = self.window.get();
        1.0 / pixel_unit(w, h)
    }

    /// Pointer position in normalised screen space, off screen until the first move.
    pub(crate) fn cursor(&self) -> Point {
        let (w, h) = self.window.get();
        match self.cursor.get() {
            Some((x, y)) => screen_to_normalized(x, y, w, h),
            None => Vec2f::new(-1.0, -1.0),
        }
    }
}

/// Registered dialogs in registration order. Neighbours wrap around, so following
/// [`DialogRing::next`] `len()` times returns to the start.
#[derive(Default)]
pub struct DialogRing {
    dialogs: Vec<(DialogId, Dialog)>,
}

impl DialogRing {
    /// Number of dialogs.
    pub fn len(&self) -> usize { self.dialogs.len() }

    /// Returns `true` if no dialog is registered.
    pub fn is_empty(&self) -> bool { self.dialogs.is_empty() }

    /// Position of `id` in registration order.
    pub fn position(&self, id: DialogId) -> Option<usize> { self.dialogs.iter().position(|(d, _)| *d == id) }

    /// Dialog registered after `id`, wrapping to the first.
    pub fn next(&self, id: DialogId) -> Option<DialogId> {
        let i = self.position(id)?;
        Some(self.dialogs[(i + 1) % self.dialogs.len()].0)
    }

    /// Dialog registered before `id`, wrapping to the last.
    pub fn prev(&self, id: DialogId) -> Option<DialogId> {
        let i = self.position(id)?;
        Some(self.dialogs[(i + self.dialogs.len() - 1) % self.dialogs.len()].0)
    }

    /// First registered dialog.
    pub fn first(&self) -> Option<DialogId> { self.dialogs.first().map(|(d, _)| *d) }

    /// Last registered dialog.
    pub fn last(&self) -> Option<DialogId> { self.dialogs.last().map(|(d, _)| *d) }

    /// Ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = DialogId> + '_ { self.dialogs.iter().map(|(d, _)| *d) }

    /// Borrows the dialog `id`.
    pub fn get(&self, id: DialogId) -> Option<&Dialog> { self.dialogs.iter().find(|(d, _)| *d == id).map(|(_, d)| d) }

    /// Mutably borrows the dialog `id`.
    pub fn get_mut(&mut self, id: DialogId) -> Option<&mut Dialog> { self.dialogs.iter_mut().find(|(d, _)| *d == id).map(|(_, d)| d) }

    pub(crate) fn push(&mut self, id: DialogId, dialog: Dialog) { self.dialogs.push((id, dialog)) }

    pub(crate) fn remove(&mut self, id: DialogId) -> Option<Dialog> {
        let i = self.position(id)?;
        Some(self.dialogs.remove(i).1)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Dialog> { self.dialogs.iter().map(|(_, d)| d) }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Dialog> { self.dialogs.iter_mut().map(|(_, d)| d) }
}

/// Owns the dialogs, the registered fonts and textures, and the per-frame batches.
pub struct ResourceManager<R: Renderer> {
    renderer: RendererHandle<R>,
    pub(crate) shared: Rc<Shared>,
    pub(crate) ring: DialogRing,
    fonts: Vec<FontNode>,
    textures: Vec<TextureHandle>,
    next_dialog: u32,
    next_texture: u32,
    sprites: SpriteBatch,
    text: TextBatch,
}

impl<R: Renderer> ResourceManager<R> {
    /// Creates a manager with the default configuration, a [`SystemClock`] and a [`MemoryClipboard`].
    pub fn new(renderer: RendererHandle<R>) -> Self { Self::with_config(renderer, ResourceConfig::default()) }

    /// Creates a manager with `config`, a [`SystemClock`] and a [`MemoryClipboard`].
    pub fn with_config(renderer: RendererHandle<R>, config: ResourceConfig) -> Self {
        Self::with_services(renderer, config, Box::new(SystemClock::default()), Box::new(MemoryClipboard::default()))
    }

    /// Creates a manager with host supplied time and clipboard.
    pub fn with_services(renderer: RendererHandle<R>, config: ResourceConfig, clock: Box<dyn Clock>, clipboard: Box<dyn Clipboard>) -> Self {
        let window = config.window_size;
        Self {
            renderer,
            shared: Rc::new(Shared {
                input: RefCell::new(InputContext::default()),
                clock,
                clipboard: RefCell::new(clipboard),
                config,
                window: Cell::new(window),
                cursor: Cell::new(None),
            }),
            ring: DialogRing::default(),
            fonts: Vec::new(),
            textures: Vec::new(),
            next_dialog: 1,
            next_texture: 1,
            sprites: SpriteBatch::default(),
            text: TextBatch::default(),
        }
    }

    /// Returns a handle to the underlying renderer.
    pub fn renderer_handle(&self) -> RendererHandle<R> { self.renderer.clone() }

    /// Active configuration.
    pub fn config(&self) -> &ResourceConfig { &self.shared.config }

    /// Current time of the manager's clock.
    pub fn now(&self) -> f64 { self.shared.now() }

    /// Snapshot of the focus and pressed pointers.
    pub fn input(&self) -> InputContext { self.shared.input.borrow().clone() }

    /// Control owning keyboard focus.
    pub fn focused_control(&self) -> Option<ControlKey> { self.shared.input.borrow().focus }

    /// Control under a held pointer button.
    pub fn pressed_control(&self) -> Option<ControlKey> { self.shared.input.borrow().pressed }

    /// The registered dialogs.
    pub fn dialogs(&self) -> &DialogRing { &self.ring }

    /// Borrows the dialog `id`.
    pub fn dialog(&self, id: DialogId) -> Option<&Dialog> { self.ring.get(id) }

    /// Mutably borrows the dialog `id`.
    pub fn dialog_mut(&mut self, id: DialogId) -> Option<&mut Dialog> { self.ring.get_mut(id) }

    /// Creates an empty dialog at the end of the ring. Font slot 0 and texture slot 0 map to
    /// the manager's first font and texture when they exist.
    pub fn add_dialog(&mut self) -> DialogId {
        let id = DialogId(self.next_dialog);
        self.next_dialog += 1;
        let mut dialog = Dialog::new(id, self.shared.clone());
        if let Some(font) = self.fonts.first() {
            dialog.set_font(0, Some(font.clone()));
        }
        if let Some(tex) = self.textures.first() {
            dialog.set_texture(0, Some(tex.id()));
        }
        self.ring.push(id, dialog);
        debug!(dialog = id.raw(), count = self.ring.len(), "dialog registered");
        id
    }

    /// Unregisters and returns the dialog `id`. Focus and pressed pointers into it are cleared.
    pub fn remove_dialog(&mut self, id: DialogId) -> Option<Dialog> {
        let dialog = self.ring.remove(id)?;
        self.shared.input.borrow_mut().forget_dialog(id);
        debug!(dialog = id.raw(), count = self.ring.len(), "dialog unregistered");
        Some(dialog)
    }

    /// Turns keyboard navigation on or off for every registered dialog.
    pub fn enable_keyboard_input_for_all_dialogs(&mut self, enable: bool) {
        for d in self.ring.iter_mut() {
            d.enable_keyboard_input(enable);
        }
    }

    /// Window size in pixels.
    pub fn window_size(&self) -> (i32, i32) { self.shared.window.get() }

    /// Records a new window size; controls recompute their layout before next use.
    pub fn set_window_size(&mut self, width: i32, height: i32) {
        if self.shared.window.get() == (width, height) {
            return;
        }
        self.shared.window.set((width, height));
        for d in self.ring.iter_mut() {
            d.invalidate_layout();
        }
    }

    /// One window pixel in dialog units.
    pub fn pixel(&self) -> f32 { self.shared.pixel() }

    /// Half extents of the visible area in clip space: the shorter axis is 1, the longer the aspect ratio.
    pub fn ortho_point(&self) -> Point {
        let (w, h) = self.window_size();
        let (w, h) = (w.max(1) as f32, h.max(1) as f32);
        if w >= h { Vec2f::new(w / h, 1.0) } else { Vec2f::new(1.0, h / w) }
    }

    /// Aspect preserving orthographic projection handed to the renderer.
    pub fn ortho_matrix(&self) -> Mat4f {
        let p = self.ortho_point();
        rs_math3d::transforms::ortho4(-p.x, p.x, -p.y, p.y, -1.0, 1.0)
    }

    /// Maps a window pixel into normalised screen space.
    pub fn screen_to_normalized(&self, x: f32, y: f32) -> Point {
        let (w, h) = self.window_size();
        screen_to_normalized(x, y, w, h)
    }

    /// Parses a BFF2 blob, uploads its sheet and registers it at `size` dialog units.
    pub fn load_font_bff(&mut self, data: &[u8], size: f32, weight: FontWeight) -> Result<usize> {
        let font = Rc::new(Font::from_bff(data)?);
        Ok(self.add_font(&font, size, weight))
    }

    /// Reads and registers a BFF2 file.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>, size: f32, weight: FontWeight) -> Result<usize> {
        let data = std::fs::read(path)?;
        self.load_font_bff(&data, size, weight)
    }

    /// Registers `font` at `size`. Returns the existing slot when the same handle is already
    /// registered at that size; a handle seen for the first time has its sheet uploaded.
    pub fn add_font(&mut self, font: &FontHandle, size: f32, weight: FontWeight) -> usize {
        if let Some(i) = self.fonts.iter().position(|n| Rc::ptr_eq(&n.font, font) && n.size == size) {
            return i;
        }
        if !self.fonts.iter().any(|n| Rc::ptr_eq(&n.font, font)) {
            let id = self.alloc_texture_id();
            font.set_texture(id);
            self.renderer.scope_mut(|r| r.create_texture(id, font.format(), font.image_width(), font.image_height(), font.pixels()));
            debug!(texture = id.raw(), width = font.image_width(), height = font.image_height(), "font sheet uploaded");
        }
        self.fonts.push(FontNode { font: font.clone(), size, weight });
        debug!(index = self.fonts.len() - 1, "font registered");
        self.fonts.len() - 1
    }

    /// Uploads raw RGBA pixels as a new texture.
    pub fn load_texture_rgba(&mut self, width: i32, height: i32, pixels: Vec<u8>) -> Result<usize> {
        let texture = Texture::from_pixels(width, height, PixelFormat::Rgba, pixels)?;
        Ok(self.add_texture(texture))
    }

    /// Decodes and uploads a PNG.
    #[cfg(feature = "png_source")]
    pub fn load_texture_png(&mut self, bytes: &[u8]) -> Result<usize> {
        let texture = Texture::from_png(bytes)?;
        Ok(self.add_texture(texture))
    }

    /// Uploads `texture` and registers it.
    pub fn add_texture(&mut self, texture: Texture) -> usize { self.add_texture_handle(&Rc::new(texture)) }

    /// Registers a shared texture. Returns the existing slot when the same handle is already
    /// registered; otherwise the pixels are uploaded under a fresh id.
    pub fn add_texture_handle(&mut self, texture: &TextureHandle) -> usize {
        if let Some(i) = self.texture_index(texture) {
            return i;
        }
        let id = self.alloc_texture_id();
        texture.set_id(id);
        self.renderer.scope_mut(|r| r.create_texture(id, texture.format(), texture.width(), texture.height(), texture.pixels()));
        self.textures.push(texture.clone());
        debug!(index = self.textures.len() - 1, "texture registered");
        self.textures.len() - 1
    }

    /// Slot of a registered texture handle.
    pub fn texture_index(&self, texture: &TextureHandle) -> Option<usize> { self.textures.iter().position(|t| Rc::ptr_eq(t, texture)) }

    fn alloc_texture_id(&mut self) -> TextureId {
        let id = TextureId::new(self.next_texture);
        self.next_texture += 1;
        id
    }

    /// Registered font `index`.
    pub fn font_node(&self, index: usize) -> Option<&FontNode> { self.fonts.get(index) }

    /// Registered texture `index`.
    pub fn texture_node(&self, index: usize) -> Option<&TextureHandle> { self.textures.get(index) }

    /// Number of registered fonts.
    pub fn font_count(&self) -> usize { self.fonts.len() }

    /// Number of registered textures.
    pub fn texture_count(&self) -> usize { self.textures.len() }

    /// Maps dialog font slot `slot` to manager font `index`.
    pub fn set_dialog_font(&mut self, dialog: DialogId, slot: usize, index: usize) -> Result<()> {
        let node = self.fonts.get(index).cloned().ok_or_else(|| Error::invalid(format!("no font {}", index)))?;
        let d = self.ring.get_mut(dialog).ok_or_else(|| Error::invalid("unknown dialog"))?;
        d.set_font(slot, Some(node));
        Ok(())
    }

    /// Maps dialog texture slot `slot` to manager texture `index`.
    pub fn set_dialog_texture(&mut self, dialog: DialogId, slot: usize, index: usize) -> Result<()> {
        let id = self.textures.get(index).map(|t| t.id()).ok_or_else(|| Error::invalid(format!("no texture {}", index)))?;
        let d = self.ring.get_mut(dialog).ok_or_else(|| Error::invalid("unknown dialog"))?;
        d.set_texture(slot, Some(id));
        Ok(())
    }

    /// Draws one dialog in its own frame. `dt` is the time since the previous frame.
    pub fn render_dialog(&mut self, id: DialogId, dt: f32) -> Result<()> {
        let (w, h) = self.window_size();
        let projection = self.ortho_matrix();
        let dialog = self.ring.get_mut(id).ok_or_else(|| Error::invalid("unknown dialog"))?;
        dialog.render_into(&mut self.sprites, &mut self.text, 0, dt);
        self.drain_blurred();
        let (sprites, text) = (&mut self.sprites, &mut self.text);
        self.renderer.scope_mut(|r| {
            r.begin(w, h, &projection);
            flush_batches(sprites, text, r);
            r.end();
        });
        Ok(())
    }

    /// Draws every dialog in registration order as one frame.
    pub fn render_all(&mut self, dt: f32) {
        let (w, h) = self.window_size();
        let projection = self.ortho_matrix();
        for (order, dialog) in self.ring.iter_mut().enumerate() {
            dialog.render_into(&mut self.sprites, &mut self.text, (order as u32) << 16, dt);
        }
        self.drain_blurred();
        let (sprites, text) = (&mut self.sprites, &mut self.text);
        self.renderer.scope_mut(|r| {
            r.begin(w, h, &projection);
            flush_batches(sprites, text, r);
            r.end();
        });
    }

    /// Delivers the events queued by programmatic widget changes to the dialog callbacks.
    pub fn flush_events(&mut self) {
        for d in self.ring.iter_mut() {
            d.flush_events();
        }
        self.drain_blurred();
    }

    /// Runs focus-out handlers of controls that lost focus to a control in another dialog.
    pub(crate) fn drain_blurred(&mut self) {
        loop {
            let blurred = std::mem::take(&mut self.shared.input.borrow_mut().blurred);
            if blurred.is_empty() {
                break;
            }
            for key in blurred {
                if let Some(d) = self.ring.get_mut(key.dialog) {
                    d.blur_control(key.index);
                }
            }
        }
    }
}

impl<R: Renderer> Drop for ResourceManager<R> {
    fn drop(&mut self) {
        let ids: Vec<TextureId> = self.fonts.iter().map(|f| f.font.texture()).chain(self.textures.iter().map(|t| t.id())).collect();
        let mut released = Vec::new();
        for id in ids {
            if !released.contains(&id) {
                released.push(id);
            }
        }
        self.renderer.scope_mut(|r| {
            for id in &released {
                r.destroy_texture(*id);
            }
        });
    }
}
