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
//! Textures registered with the resource manager.

#[cfg(feature = "png_source")]
use png::{BitDepth, ColorType, Decoder, Transformations};
#[cfg(feature = "png_source")]
use std::io::Cursor;
use std::cell::Cell;
use std::rc::Rc;

use crate::*;

/// CPU side copy of a texture and the renderer id it was uploaded to.
#[derive(Debug)]
pub struct Texture {
    width: i32,
    height: i32,
    format: PixelFormat,
    pixels: Vec<u8>,
    id: Cell<TextureId>,
}

/// Shared texture handle; identity is pointer identity.
pub type TextureHandle = Rc<Texture>;

impl Texture {
    /// Wraps raw pixels, checking that the buffer matches the dimensions.
    pub fn from_pixels(width: i32, height: i32, format: PixelFormat, pixels: Vec<u8>) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::invalid(format!("texture dimensions {}x{}", width, height)));
        }
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(Error::invalid(format!("texture data is {} bytes, expected {}", pixels.len(), expected)));
        }
        Ok(Self { width, height, format, pixels, id: Cell::new(TextureId::default()) })
    }

    /// Decodes a PNG into an RGBA texture.
    #[cfg(feature = "png_source")]
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(Transformations::normalize_to_color8());
        let mut reader = decoder.read_info().map_err(|e| Error::creation(format!("PNG decode error: {}", e)))?;
        let buf_size = reader
            .output_buffer_size()
            .ok_or_else(|| Error::creation("PNG decoder did not report output size"))?;
        let mut img_data = vec![0; buf_size];
        let info = reader.next_frame(&mut img_data).map_err(|e| Error::creation(format!("PNG decode error: {}", e)))?;

        if info.bit_depth != BitDepth::Eight {
            return Err(Error::creation(format!("unsupported PNG bit depth: {:?}", info.bit_depth)));
        }

        let pixel_size = match info.color_type {
            ColorType::Grayscale => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
            ColorType::Indexed => return Err(Error::creation("indexed PNGs are not supported")),
        };

        let mut pixels = Vec::with_capacity((info.width * info.height * 4) as usize);
        for y in 0..info.height as usize {
            let line = &img_data[y * info.line_size..(y + 1) * info.line_size];
            for x in 0..info.width as usize {
                let p = &line[x * pixel_size..(x + 1) * pixel_size];
                let rgba = match info.color_type {
                    ColorType::Grayscale => [p[0], p[0], p[0], 0xFF],
                    ColorType::GrayscaleAlpha => [p[0], p[0], p[0], p[1]],
                    ColorType::Rgb => [p[0], p[1], p[2], 0xFF],
                    _ => [p[0], p[1], p[2], p[3]],
                };
                pixels.extend_from_slice(&rgba);
            }
        }

        Self::from_pixels(info.width as i32, info.height as i32, PixelFormat::Rgba, pixels)
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 { self.width }
    /// Height in pixels.
    pub fn height(&self) -> i32 { self.height }
    /// Pixel layout.
    pub fn format(&self) -> PixelFormat { self.format }
    /// Raw pixels, row-major, top row first.
    pub fn pixels(&self) -> &[u8] { &self.pixels }
    /// Renderer texture id.
    pub fn id(&self) -> TextureId { self.id.get() }

    pub(crate) fn set_id(&self, id: TextureId) { self.id.set(id) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(Texture::from_pixels(2, 2, PixelFormat::Rgba, vec![0; 15]).is_err());
        assert!(Texture::from_pixels(0, 2, PixelFormat::Alpha, vec![]).is_err());
        let t = Texture::from_pixels(2, 2, PixelFormat::Rgb, vec![0; 12]).expect("valid");
        assert_eq!((t.width(), t.height()), (2, 2));
    }
}
