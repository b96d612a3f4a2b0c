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
//! Fixed-cell bitmap fonts in the BFF2 layout.
//!
//! A BFF2 blob is a 276 byte header followed by a row-major glyph sheet:
//!
//! | Offset | Size | Meaning |
//! |---|---|---|
//! | 0 | 2 | magic `0xBF 0xF2` |
//! | 2 | 4 | image width (little endian) |
//! | 6 | 4 | image height |
//! | 10 | 4 | cell width |
//! | 14 | 4 | cell height |
//! | 18 | 1 | bits per pixel (8, 24 or 32) |
//! | 19 | 1 | first character in the sheet |
//! | 20 | 256 | advance width of every character code, in pixels |
//! | 276 | w·h·bpp/8 | pixels |

use std::cell::Cell;
use std::rc::Rc;

use crate::*;

const MAGIC: [u8; 2] = [0xBF, 0xF2];
const WIDTHS_OFFSET: usize = 20;
/// Offset of the pixel data inside a BFF2 blob.
pub const MAP_DATA_OFFSET: usize = 276;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Layout of texture pixels handed to the renderer.
pub enum PixelFormat {
    /// One byte per pixel, sampled as coverage.
    Alpha,
    /// Three bytes per pixel.
    Rgb,
    /// Four bytes per pixel.
    Rgba,
}

impl PixelFormat {
    /// Bytes used by one pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Alpha => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Nominal weight recorded with a font registration.
pub enum FontWeight {
    /// Hairline.
    Hairline,
    /// Thin.
    Thin,
    /// Ultra light.
    UltraLight,
    /// Extra light.
    ExtraLight,
    /// Light.
    Light,
    /// Book.
    Book,
    #[default]
    /// Normal.
    Normal,
    /// Medium.
    Medium,
    /// Semi bold.
    SemiBold,
    /// Bold.
    Bold,
    /// Extra bold.
    ExtraBold,
    /// Heavy.
    Heavy,
    /// Black.
    Black,
    /// Extra black.
    ExtraBlack,
    /// Ultra black.
    UltraBlack,
}

/// Texture-space rectangle of one glyph cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphUv {
    /// Left texture coordinate.
    pub u0: f32,
    /// Top texture coordinate.
    pub v0: f32,
    /// Right texture coordinate.
    pub u1: f32,
    /// Bottom texture coordinate.
    pub v1: f32,
}

/// Parsed bitmap font. Glyph metrics are in pixels of the source sheet.
pub struct Font {
    image_width: i32,
    image_height: i32,
    cell_width: i32,
    cell_height: i32,
    base: u8,
    widths: [u8; 256],
    row_pitch: i32,
    col_factor: f32,
    row_factor: f32,
    format: PixelFormat,
    pixels: Vec<u8>,
    texture: Cell<TextureId>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("image", &(self.image_width, self.image_height))
            .field("cell", &(self.cell_width, self.cell_height))
            .field("base", &self.base)
            .field("format", &self.format)
            .field("texture", &self.texture.get())
            .finish()
    }
}

fn read_i32(data: &[u8], offset: usize) -> i32 { i32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]) }

impl Font {
    /// Parses a BFF2 blob.
    pub fn from_bff(data: &[u8]) -> Result<Self> {
        if data.len() < MAP_DATA_OFFSET {
            return Err(Error::creation(format!("font blob too short: {} bytes", data.len())));
        }
        if data[0..2] != MAGIC {
            return Err(Error::creation("font blob does not start with the BFF2 magic"));
        }

        let image_width = read_i32(data, 2);
        let image_height = read_i32(data, 6);
        let cell_width = read_i32(data, 10);
        let cell_height = read_i32(data, 14);
        let bpp = data[18];
        let base = data[19];

        let format = match bpp {
            8 => PixelFormat::Alpha,
            24 => PixelFormat::Rgb,
            32 => PixelFormat::Rgba,
            _ => return Err(Error::creation(format!("unsupported font depth: {} bits per pixel", bpp))),
        };
        if image_width <= 0 || image_height <= 0 || cell_width <= 0 || cell_height <= 0 || cell_width > image_width || cell_height > image_height {
            return Err(Error::creation(format!(
                "invalid font geometry: image {}x{}, cell {}x{}",
                image_width, image_height, cell_width, cell_height
            )));
        }

        let expected = MAP_DATA_OFFSET + image_width as usize * image_height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(Error::creation(format!("font blob is {} bytes, header describes {}", data.len(), expected)));
        }

        let mut widths = [0u8; 256];
        widths.copy_from_slice(&data[WIDTHS_OFFSET..MAP_DATA_OFFSET]);

        Ok(Self {
            image_width,
            image_height,
            cell_width,
            cell_height,
            base,
            widths,
            row_pitch: image_width / cell_width,
            col_factor: cell_width as f32 / image_width as f32,
            row_factor: cell_height as f32 / image_height as f32,
            format,
            pixels: data[MAP_DATA_OFFSET..].to_vec(),
            texture: Cell::new(TextureId::default()),
        })
    }

    /// Sheet width in pixels.
    pub fn image_width(&self) -> i32 { self.image_width }
    /// Sheet height in pixels.
    pub fn image_height(&self) -> i32 { self.image_height }
    /// Cell width in pixels.
    pub fn cell_width(&self) -> i32 { self.cell_width }
    /// Cell height in pixels.
    pub fn cell_height(&self) -> i32 { self.cell_height }
    /// First character code stored in the sheet.
    pub fn base(&self) -> u8 { self.base }
    /// Cells per sheet row.
    pub fn row_pitch(&self) -> i32 { self.row_pitch }
    /// Horizontal size of a cell in texture coordinates.
    pub fn col_factor(&self) -> f32 { self.col_factor }
    /// Vertical size of a cell in texture coordinates.
    pub fn row_factor(&self) -> f32 { self.row_factor }
    /// Pixel layout of the sheet.
    pub fn format(&self) -> PixelFormat { self.format }
    /// Raw sheet pixels.
    pub fn pixels(&self) -> &[u8] { &self.pixels }
    /// Renderer texture holding the sheet.
    pub fn texture(&self) -> TextureId { self.texture.get() }

    pub(crate) fn set_texture(&self, id: TextureId) { self.texture.set(id) }

    /// Advance width of `ch` in pixels. Codes outside the table advance by zero.
    pub fn char_width(&self, ch: char) -> u8 {
        let code = ch as u32;
        if code < 256 { self.widths[code as usize] } else { 0 }
    }

    /// Advance of `ch` for text rendered `size` units tall.
    pub fn advance(&self, ch: char, size: f32) -> f32 { self.char_width(ch) as f32 * size / self.cell_height as f32 }

    /// Width of a whole cell for text rendered `size` units tall.
    pub fn cell_advance(&self, size: f32) -> f32 { self.cell_width as f32 * size / self.cell_height as f32 }

    /// Texture rectangle of the cell holding `ch`, or `None` when the sheet does not contain it.
    pub fn glyph_uv(&self, ch: char) -> Option<GlyphUv> {
        let code = ch as u32;
        if code < self.base as u32 || code > 255 {
            return None;
        }
        let index = (code - self.base as u32) as i32;
        let row = index / self.row_pitch;
        let col = index - row * self.row_pitch;
        let u0 = col as f32 * self.col_factor;
        let v0 = row as f32 * self.row_factor;
        if v0 >= 1.0 {
            return None;
        }
        Some(GlyphUv { u0, v0, u1: u0 + self.col_factor, v1: v0 + self.row_factor })
    }

    /// Width of `text` on a single line.
    pub fn measure(&self, text: &str, size: f32) -> f32 { text.chars().map(|c| self.advance(c, size)).sum() }
}

/// Shared font handle; identity is pointer identity.
pub type FontHandle = Rc<Font>;

#[derive(Clone, Debug)]
/// A font registered with the resource manager at a specific size.
pub struct FontNode {
    /// The parsed font.
    pub font: FontHandle,
    /// Line height in dialog units.
    pub size: f32,
    /// Nominal weight.
    pub weight: FontWeight,
}

impl FontNode {
    /// Advance of `ch` at this node's size.
    pub fn advance(&self, ch: char) -> f32 { self.font.advance(ch, self.size) }

    /// Single line width of `text` at this node's size.
    pub fn measure(&self, text: &str) -> f32 { self.font.measure(text, self.size) }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a valid 8 bpp blob whose every character is `advance` pixels wide.
    pub(crate) fn bff_blob(width: i32, height: i32, cell_w: i32, cell_h: i32, bpp: u8, advance: u8) -> Vec<u8> {
        let mut data = vec![0u8; MAP_DATA_OFFSET];
        data[0] = 0xBF;
        data[1] = 0xF2;
        data[2..6].copy_from_slice(&width.to_le_bytes());
        data[6..10].copy_from_slice(&height.to_le_bytes());
        data[10..14].copy_from_slice(&cell_w.to_le_bytes());
        data[14..18].copy_from_slice(&cell_h.to_le_bytes());
        data[18] = bpp;
        data[19] = 32;
        for w in data[WIDTHS_OFFSET..MAP_DATA_OFFSET].iter_mut() {
            *w = advance;
        }
        data.resize(MAP_DATA_OFFSET + (width * height) as usize * (bpp as usize / 8), 0x7f);
        data
    }

    pub(crate) fn test_font() -> FontHandle {
        match Font::from_bff(&bff_blob(256, 256, 16, 16, 8, 8)) {
            Ok(f) => Rc::new(f),
            Err(e) => panic!("test font failed to parse: {}", e),
        }
    }

    #[test]
    fn parses_header_and_derives_factors() {
        let font = Font::from_bff(&bff_blob(256, 128, 16, 32, 8, 10)).expect("valid blob");
        assert_eq!(font.row_pitch(), 16);
        assert!((font.col_factor() - 16.0 / 256.0).abs() < 1e-6);
        assert!((font.row_factor() - 32.0 / 128.0).abs() < 1e-6);
        assert_eq!(font.format(), PixelFormat::Alpha);
        assert_eq!(font.base(), 32);
        assert_eq!(font.pixels().len(), 256 * 128);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut blob = bff_blob(64, 64, 16, 16, 8, 8);
        blob[1] = 0xF1;
        assert!(matches!(Font::from_bff(&blob), Err(Error::ResourceCreationFailed(_))));
    }

    #[test]
    fn rejects_size_mismatch() {
        let mut blob = bff_blob(64, 64, 16, 16, 8, 8);
        blob.push(0);
        assert!(Font::from_bff(&blob).is_err());
        blob.truncate(100);
        assert!(Font::from_bff(&blob).is_err());
    }

    #[test]
    fn rejects_unsupported_depth() {
        let mut blob = bff_blob(64, 64, 16, 16, 8, 8);
        blob[18] = 16;
        assert!(Font::from_bff(&blob).is_err());
    }

    #[test]
    fn accepts_rgb_and_rgba() {
        assert_eq!(Font::from_bff(&bff_blob(32, 32, 16, 16, 24, 8)).expect("rgb").format(), PixelFormat::Rgb);
        assert_eq!(Font::from_bff(&bff_blob(32, 32, 16, 16, 32, 8)).expect("rgba").format(), PixelFormat::Rgba);
    }

    #[test]
    fn glyph_lookup_uses_base() {
        let font = test_font();
        // 'A' is 65, base 32 => index 33 => row 2, col 1 with 16 cells per row
        let uv = font.glyph_uv('A').expect("glyph");
        assert!((uv.u0 - 1.0 / 16.0).abs() < 1e-6);
        assert!((uv.v0 - 2.0 / 16.0).abs() < 1e-6);
        assert!(font.glyph_uv('\u{1}').is_none());
        assert!(font.glyph_uv('\u{3a9}').is_none());
        assert!((font.advance('A', 0.0625) - 8.0 * 0.0625 / 16.0).abs() < 1e-7);
    }
}
