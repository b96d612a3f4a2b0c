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
//! Per-frame geometry accumulators.
//!
//! Quads and glyph runs are tagged with a layer as they are issued. Flushing sorts
//! by layer and, inside a layer, draws all sprites grouped by texture followed by
//! that layer's text, so later controls cover earlier ones without flushing per sprite.

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C)]
/// Vertex of a UI quad: clip space position, tint and texture coordinate.
pub struct SpriteVertex {
    /// Position in clip space before projection.
    pub pos: [f32; 3],
    /// Tint; for textured quads alpha is the tint strength.
    pub color: Color,
    /// Texture coordinate.
    pub uv: [f32; 2],
}

impl SpriteVertex {
    /// Creates a vertex.
    pub fn new(pos: [f32; 3], color: Color, uv: [f32; 2]) -> Self { Self { pos, color, uv } }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C)]
/// Vertex of a glyph triangle.
pub struct TextVertex {
    /// Position in clip space before projection.
    pub pos: [f32; 3],
    /// Glyph sheet coordinate.
    pub uv: [f32; 2],
}

/// Index pattern of one quad.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

#[derive(Clone, Debug)]
struct Quad {
    layer: u32,
    texture: Option<TextureId>,
    vertices: [SpriteVertex; 4],
}

/// Accumulates textured and untextured quads.
#[derive(Default)]
pub struct SpriteBatch {
    quads: Vec<Quad>,
}

impl SpriteBatch {
    /// Queues a quad. Vertices go counter-clockwise starting at the top-left corner.
    pub fn push_quad(&mut self, layer: u32, texture: Option<TextureId>, vertices: [SpriteVertex; 4]) { self.quads.push(Quad { layer, texture, vertices }) }

    /// Number of queued quads.
    pub fn len(&self) -> usize { self.quads.len() }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool { self.quads.is_empty() }

    /// Drops all queued quads.
    pub fn clear(&mut self) { self.quads.clear() }
}

#[derive(Clone, Debug)]
struct TextRun {
    layer: u32,
    texture: TextureId,
    color: Color,
    vertices: Vec<TextVertex>,
}

/// Accumulates glyph triangles in runs sharing a sheet and a colour.
#[derive(Default)]
pub struct TextBatch {
    runs: Vec<TextRun>,
}

impl TextBatch {
    /// Queues glyph triangles. Consecutive calls with the same layer, sheet and colour share a run.
    pub fn push(&mut self, layer: u32, texture: TextureId, color: Color, vertices: &[TextVertex]) {
        if vertices.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(run) if run.layer == layer && run.texture == texture && run.color == color => run.vertices.extend_from_slice(vertices),
            _ => self.runs.push(TextRun { layer, texture, color, vertices: vertices.to_vec() }),
        }
    }

    /// Number of queued vertices.
    pub fn vertex_count(&self) -> usize { self.runs.iter().map(|r| r.vertices.len()).sum() }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool { self.runs.is_empty() }

    /// Drops all queued runs.
    pub fn clear(&mut self) { self.runs.clear() }
}

/// Submits both batches to `renderer` in layer order and clears them.
pub fn flush_batches<R: Renderer>(sprites: &mut SpriteBatch, text: &mut TextBatch, renderer: &mut R) {
    let mut layers: Vec<u32> = sprites.quads.iter().map(|q| q.layer).chain(text.runs.iter().map(|r| r.layer)).collect();
    layers.sort_unstable();
    layers.dedup();

    let mut vertices = Vec::new();
    for layer in layers {
        let mut textures: Vec<Option<TextureId>> = Vec::new();
        for q in sprites.quads.iter().filter(|q| q.layer == layer) {
            if !textures.contains(&q.texture) {
                textures.push(q.texture);
            }
        }
        for tex in textures {
            vertices.clear();
            for q in sprites.quads.iter().filter(|q| q.layer == layer && q.texture == tex) {
                vertices.extend_from_slice(&q.vertices);
            }
            renderer.draw_quads(tex, &vertices);
        }
        for run in text.runs.iter().filter(|r| r.layer == layer) {
            renderer.draw_text(run.texture, run.color, &run.vertices);
        }
    }

    sprites.clear();
    text.clear();
}
