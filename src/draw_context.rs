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
use tracing::warn;

use crate::*;

/// Pixel constants are expressed against this many dialog units per pixel when no window is known.
const FALLBACK_PIXEL: f32 = 1.0 / 600.0;

/// Everything a control needs to emit geometry for one frame.
pub(crate) struct DrawCtx<'a> {
    sprites: &'a mut SpriteBatch,
    text: &'a mut TextBatch,
    textures: &'a [Option<TextureId>],
    fonts: &'a [Option<FontNode>],
    origin: Point,
    layer: u32,
    pixel: f32,
    now: f64,
    blink_period: f64,
}

impl<'a> DrawCtx<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        sprites: &'a mut SpriteBatch,
        text: &'a mut TextBatch,
        textures: &'a [Option<TextureId>],
        fonts: &'a [Option<FontNode>],
        origin: Point,
        pixel: f32,
        now: f64,
        blink_period: f64,
    ) -> Self {
        let pixel = if pixel > 0.0 { pixel } else { FALLBACK_PIXEL };
        Self { sprites, text, textures, fonts, origin, layer: 0, pixel, now, blink_period }
    }

    /// Size of one window pixel in dialog units.
    pub(crate) fn pixel(&self) -> f32 { self.pixel }

    pub(crate) fn now(&self) -> f64 { self.now }

    pub(crate) fn blink_period(&self) -> f64 { self.blink_period }

    pub(crate) fn set_layer(&mut self, layer: u32) { self.layer = layer }

    pub(crate) fn layer(&self) -> u32 { self.layer }

    pub(crate) fn font(&self, slot: usize) -> Option<&FontNode> { self.fonts.get(slot).and_then(|f| f.as_ref()) }

    fn to_clip(&self, x: f32, y: f32) -> (f32, f32) { (2.0 * (x + self.origin.x) - 1.0, 2.0 * (y + self.origin.y) - 1.0) }

    fn quad(&mut self, texture: Option<TextureId>, rect: Rect, uv: Rect, colors: [Color; 4], depth: f32) {
        let (l, t) = self.to_clip(rect.left, rect.top);
        let (r, b) = self.to_clip(rect.right, rect.bottom);
        self.sprites.push_quad(
            self.layer,
            texture,
            [
                SpriteVertex::new([l, t, depth], colors[0], [uv.left, uv.top]),
                SpriteVertex::new([r, t, depth], colors[1], [uv.right, uv.top]),
                SpriteVertex::new([r, b, depth], colors[2], [uv.right, uv.bottom]),
                SpriteVertex::new([l, b, depth], colors[3], [uv.left, uv.bottom]),
            ],
        );
    }

    /// Queues `element`'s texture sub-rect stretched over `rect` (dialog local).
    pub(crate) fn draw_sprite(&mut self, element: &Element, rect: Rect, depth: f32) {
        match self.textures.get(element.texture_index).copied().flatten() {
            Some(id) => {
                let c = element.texture_color.current();
                self.quad(Some(id), rect, element.texture_rect, [c; 4], depth)
            }
            None => warn!(slot = element.texture_index, "dropping sprite: no texture in slot"),
        }
    }

    /// Queues an untextured rectangle.
    pub(crate) fn draw_rect(&mut self, rect: Rect, color: Color, depth: f32) {
        if color.a == 0 || rect.is_empty() {
            return;
        }
        self.quad(None, rect, Rect::default(), [color; 4], depth)
    }

    /// Queues an untextured rectangle with a colour per corner: top-left, top-right, bottom-right, bottom-left.
    pub(crate) fn draw_gradient(&mut self, rect: Rect, colors: [Color; 4], depth: f32) { self.quad(None, rect, Rect::default(), colors, depth) }

    /// Bounding box `text` occupies inside `dest` with `element`'s font and format.
    pub(crate) fn calc_text_rect(&self, text: &str, element: &Element, dest: Rect) -> Option<Rect> {
        let font = self.font(element.font_index)?;
        Some(layout_block(font, text, element.text_format, dest))
    }

    /// Queues `text` inside `dest` using `element`'s font, format and current font colour.
    pub(crate) fn draw_text(&mut self, text: &str, element: &Element, dest: Rect, shadow: bool) {
        self.draw_text_clipped(text, element, dest, shadow, None, element.font_color.current())
    }

    /// Like [`DrawCtx::draw_text`] with an explicit colour, dropping glyphs that end past `clip_right`.
    pub(crate) fn draw_text_clipped(&mut self, text: &str, element: &Element, dest: Rect, shadow: bool, clip_right: Option<f32>, color: Color) {
        if color.a == 0 || text.is_empty() {
            return;
        }
        let Some(font) = self.font(element.font_index).cloned() else {
            warn!(slot = element.font_index, "skipping text: no font in slot");
            return;
        };
        if shadow {
            let px = self.pixel;
            self.emit_glyphs(&font, text, element.text_format, dest.offset(px, -px), clip_right.map(|c| c + px), Color::BLACK);
        }
        self.emit_glyphs(&font, text, element.text_format, dest, clip_right, color);
    }

    fn emit_glyphs(&mut self, font: &FontNode, text: &str, format: TextFormat, dest: Rect, clip_right: Option<f32>, color: Color) {
        let size = font.size;
        let cell = font.font.cell_advance(size);
        let block = layout_block(font, text, format, dest);
        let mut vertices = Vec::with_capacity(text.len() * 6);
        let mut y = block.top;
        let mut z = NEAR_BUTTON_DEPTH;
        for (n, line) in text.split('\n').enumerate() {
            if n > 0 {
                y -= size * 1.1;
                if y - size < dest.bottom {
                    break;
                }
            }
            let width = font.measure(line);
            let mut x = match format.horizontal() {
                Align::Start => dest.left,
                Align::Center => dest.left + (dest.width() - width) * 0.5,
                Align::End => dest.right - width,
            };
            for ch in line.chars() {
                if let Some(clip) = clip_right {
                    if x + font.advance(ch) > clip + 1e-6 {
                        break;
                    }
                }
                if let Some(uv) = font.font.glyph_uv(ch) {
                    let (l, t) = self.to_clip(x, y);
                    let (r, b) = self.to_clip(x + cell, y - size);
                    vertices.extend_from_slice(&[
                        TextVertex { pos: [l, t, z], uv: [uv.u0, uv.v0] },
                        TextVertex { pos: [r, b, z], uv: [uv.u1, uv.v1] },
                        TextVertex { pos: [r, t, z], uv: [uv.u1, uv.v0] },
                        TextVertex { pos: [l, t, z], uv: [uv.u0, uv.v0] },
                        TextVertex { pos: [l, b, z], uv: [uv.u0, uv.v1] },
                        TextVertex { pos: [r, b, z], uv: [uv.u1, uv.v1] },
                    ]);
                }
                x += font.advance(ch);
                z += 0.000001;
            }
        }
        self.text.push(self.layer, font.font.texture(), color, &vertices);
    }
}

/// Places a block of lines inside `dest` according to `format`.
pub(crate) fn layout_block(font: &FontNode, text: &str, format: TextFormat, dest: Rect) -> Rect {
    let size = font.size;
    let lines = text.split('\n').count().max(1);
    let height = size + (lines - 1) as f32 * size * 1.1;
    let width = text.split('\n').map(|l| font.measure(l)).fold(0.0f32, f32::max);
    let top = match format.vertical() {
        Align::Start => dest.top,
        Align::Center => dest.top - (dest.height() - height) * 0.5,
        Align::End => dest.bottom + height,
    };
    let left = match format.horizontal() {
        Align::Start => dest.left,
        Align::Center => dest.left + (dest.width() - width) * 0.5,
        Align::End => dest.right - width,
    };
    Rect::new(left, top, left + width, top - height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::test_font;

    fn fonts() -> Vec<Option<FontNode>> { vec![Some(FontNode { font: test_font(), size: 0.0625, weight: FontWeight::Normal })] }

    #[test]
    fn sprite_maps_dialog_space_to_clip_space() {
        let mut sprites = SpriteBatch::default();
        let mut text = TextBatch::default();
        let textures = [Some(TextureId::new(3))];
        let fonts = fonts();
        let mut ctx = DrawCtx::new(&mut sprites, &mut text, &textures, &fonts, Vec2f::new(0.25, 0.25), 1.0 / 600.0, 0.0, 1.0);
        let mut e = Element::default().with_texture(0, Rect::new(0.0, 1.0, 0.5, 0.5));
        e.texture_color.set_current(Color::WHITE);
        ctx.draw_sprite(&e, Rect::new(0.0, 0.5, 0.5, 0.0), FAR_BUTTON_DEPTH);
        let mut r = crate::batch::tests::RecordingRenderer::default();
        flush_batches(&mut sprites, &mut text, &mut r);
        let v = &r.quads;
        assert_eq!(v.len(), 4);
        // top-left of the rect sits at global (0.25, 0.75)
        assert!((v[0].pos[0] + 0.5).abs() < 1e-6 && (v[0].pos[1] - 0.5).abs() < 1e-6);
        assert_eq!(v[0].uv, [0.0, 1.0]);
        assert_eq!(v[2].uv, [0.5, 0.5]);
    }

    #[test]
    fn missing_texture_drops_sprite() {
        let mut sprites = SpriteBatch::default();
        let mut text = TextBatch::default();
        let fonts = fonts();
        let mut ctx = DrawCtx::new(&mut sprites, &mut text, &[], &fonts, Vec2f::new(0.0, 0.0), 1.0 / 600.0, 0.0, 1.0);
        ctx.draw_sprite(&Element::default(), Rect::new(0.0, 0.1, 0.1, 0.0), 0.0);
        assert!(sprites.is_empty());
    }

    #[test]
    fn text_emits_six_vertices_per_glyph_and_honours_newlines() {
        let mut sprites = SpriteBatch::default();
        let mut text = TextBatch::default();
        let fonts = fonts();
        let mut ctx = DrawCtx::new(&mut sprites, &mut text, &[], &fonts, Vec2f::new(0.0, 0.0), 1.0 / 600.0, 0.0, 1.0);
        let mut e = Element::default().with_font(0, TextFormat::LEFT | TextFormat::TOP);
        e.font_color.set_current(Color::BLACK);
        ctx.draw_text("ab\ncd", &e, Rect::new(0.0, 1.0, 1.0, 0.0), false);
        assert_eq!(text.vertex_count(), 24);
    }

    #[test]
    fn transparent_text_is_skipped() {
        let mut sprites = SpriteBatch::default();
        let mut text = TextBatch::default();
        let fonts = fonts();
        let mut ctx = DrawCtx::new(&mut sprites, &mut text, &[], &fonts, Vec2f::new(0.0, 0.0), 1.0 / 600.0, 0.0, 1.0);
        ctx.draw_text("ab", &Element::default(), Rect::new(0.0, 1.0, 1.0, 0.0), false);
        assert!(text.is_empty());
    }

    #[test]
    fn centred_block_layout() {
        let font = FontNode { font: test_font(), size: 0.1, weight: FontWeight::Normal };
        let r = layout_block(&font, "ab", TextFormat::CENTER | TextFormat::VCENTER, Rect::new(0.0, 1.0, 1.0, 0.0));
        let w = font.measure("ab");
        assert!((r.left - (1.0 - w) * 0.5).abs() < 1e-6);
        assert!((r.top - 0.55).abs() < 1e-6);
    }
}
