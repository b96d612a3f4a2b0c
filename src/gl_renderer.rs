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
//! OpenGL backend built on `glow`.
//!
//! Three programs share attribute locations 0/1/2 (position, colour, uv) and the
//! `uTransform` projection uniform: untextured quads, textured quads and glyph runs.

use std::collections::HashMap;
use std::sync::Arc;

use glow::HasContext;
use tracing::{debug, error};

use crate::*;

const SPRITE_VERTEX_SHADER: &str = "#version 100
uniform highp mat4 uTransform;
attribute highp vec3 aPosition;
attribute lowp vec4 aColor;
attribute highp vec2 aUv;
varying lowp vec4 vColor;
varying highp vec2 vUv;
void main()
{
    vColor = aColor;
    vUv = aUv;
    gl_Position = uTransform * vec4(aPosition, 1.0);
}";

const UNTEXTURED_FRAGMENT_SHADER: &str = "#version 100
varying lowp vec4 vColor;
varying highp vec2 vUv;
void main()
{
    gl_FragColor = vColor;
}";

const TEXTURED_FRAGMENT_SHADER: &str = "#version 100
varying lowp vec4 vColor;
varying highp vec2 vUv;
uniform sampler2D uTexture;
void main()
{
    lowp vec4 col = texture2D(uTexture, vUv);
    gl_FragColor = vec4(mix(col.rgb, vColor.rgb, vColor.a), col.a);
}";

const TEXT_VERTEX_SHADER: &str = "#version 100
uniform highp mat4 uTransform;
attribute highp vec3 aPosition;
attribute highp vec2 aUv;
varying highp vec2 vUv;
void main()
{
    vUv = aUv;
    gl_Position = uTransform * vec4(aPosition, 1.0);
}";

const TEXT_FRAGMENT_SHADER: &str = "#version 100
varying highp vec2 vUv;
uniform sampler2D uTexture;
uniform lowp vec4 uColor;
void main()
{
    gl_FragColor = vec4(uColor.rgb, uColor.a * texture2D(uTexture, vUv).a);
}";

const POSITION_LOCATION: u32 = 0;
const COLOR_LOCATION: u32 = 1;
const UV_LOCATION: u32 = 2;

/// Quads that fit one u16 index range.
const MAX_QUADS_PER_DRAW: usize = 65536 / 4;

fn create_program(gl: &glow::Context, vertex_source: &str, fragment_source: &str) -> Result<glow::Program> {
    unsafe {
        let program = gl.create_program().map_err(Error::creation)?;
        let mut shaders = Vec::with_capacity(2);
        for (ty, source) in [(glow::VERTEX_SHADER, vertex_source), (glow::FRAGMENT_SHADER, fragment_source)] {
            let shader = match gl.create_shader(ty) {
                Ok(s) => s,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(Error::creation(e));
                }
            };
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                error!(%log, "shader compilation failed");
                gl.delete_shader(shader);
                for s in shaders {
                    gl.delete_shader(s);
                }
                gl.delete_program(program);
                return Err(Error::creation(log));
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.bind_attrib_location(program, POSITION_LOCATION, "aPosition");
        gl.bind_attrib_location(program, COLOR_LOCATION, "aColor");
        gl.bind_attrib_location(program, UV_LOCATION, "aUv");
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        let log = if linked { String::new() } else { gl.get_program_info_log(program) };
        for s in shaders {
            gl.detach_shader(program, s);
            gl.delete_shader(s);
        }
        if !linked {
            error!(%log, "program link failed");
            gl.delete_program(program);
            return Err(Error::creation(log));
        }
        Ok(program)
    }
}

struct Program {
    program: glow::Program,
    transform: Option<glow::UniformLocation>,
    texture: Option<glow::UniformLocation>,
    color: Option<glow::UniformLocation>,
}

impl Program {
    fn new(gl: &glow::Context, vertex_source: &str, fragment_source: &str) -> Result<Self> {
        let program = create_program(gl, vertex_source, fragment_source)?;
        unsafe {
            Ok(Self {
                program,
                transform: gl.get_uniform_location(program, "uTransform"),
                texture: gl.get_uniform_location(program, "uTexture"),
                color: gl.get_uniform_location(program, "uColor"),
            })
        }
    }
}

/// [`Renderer`] drawing through an OpenGL (ES 2 compatible) context.
pub struct GlRenderer {
    gl: Arc<glow::Context>,
    untextured: Program,
    textured: Program,
    text: Program,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    indices: Vec<u16>,
    textures: HashMap<TextureId, glow::Texture>,
    projection: [f32; 16],
    width: i32,
    height: i32,
}

impl GlRenderer {
    /// Compiles the UI programs and allocates the streaming buffers.
    pub fn new(gl: Arc<glow::Context>) -> Result<Self> {
        let untextured = Program::new(&gl, SPRITE_VERTEX_SHADER, UNTEXTURED_FRAGMENT_SHADER)?;
        let textured = Program::new(&gl, SPRITE_VERTEX_SHADER, TEXTURED_FRAGMENT_SHADER)?;
        let text = Program::new(&gl, TEXT_VERTEX_SHADER, TEXT_FRAGMENT_SHADER)?;
        let (vbo, ibo) = unsafe {
            let vbo = gl.create_buffer().map_err(Error::creation)?;
            let ibo = gl.create_buffer().map_err(Error::creation)?;
            (vbo, ibo)
        };

        let mut indices = Vec::with_capacity(MAX_QUADS_PER_DRAW * 6);
        for q in 0..MAX_QUADS_PER_DRAW {
            let base = (q * 4) as u16;
            indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        }
        debug!("glow renderer ready");

        Ok(Self {
            gl,
            untextured,
            textured,
            text,
            vbo,
            ibo,
            indices,
            textures: HashMap::new(),
            projection: [0.0; 16],
            width: 0,
            height: 0,
        })
    }

    /// Size of the last frame in pixels.
    pub fn size(&self) -> (i32, i32) { (self.width, self.height) }

    fn use_program(&self, program: &Program, texture: Option<glow::Texture>) {
        let gl = &self.gl;
        unsafe {
            gl.use_program(Some(program.program));
            gl.uniform_matrix_4_f32_slice(program.transform.as_ref(), false, &self.projection);
            if let Some(tex) = texture {
                gl.active_texture(glow::TEXTURE0);
                gl.bind_texture(glow::TEXTURE_2D, Some(tex));
                gl.uniform_1_i32(program.texture.as_ref(), 0);
            }
            debug_assert_eq!(gl.get_error(), 0);
        }
    }

    fn upload<V>(&self, vertices: &[V]) {
        let gl = &self.gl;
        unsafe {
            let bytes: &[u8] = std::slice::from_raw_parts(vertices.as_ptr() as *const u8, std::mem::size_of_val(vertices));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            // orphan the previous storage before refilling
            gl.buffer_data_size(glow::ARRAY_BUFFER, bytes.len() as i32, glow::STREAM_DRAW);
            gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, bytes);
            debug_assert_eq!(gl.get_error(), 0);
        }
    }
}

impl Renderer for GlRenderer {
    fn begin(&mut self, width: i32, height: i32, projection: &Mat4f) {
        self.width = width;
        self.height = height;
        let ptr = projection.col.as_ptr() as *const f32;
        self.projection.copy_from_slice(unsafe { std::slice::from_raw_parts(ptr, 16) });

        let gl = &self.gl;
        unsafe {
            gl.viewport(0, 0, width, height);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.disable(glow::CULL_FACE);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            debug_assert_eq!(gl.get_error(), 0);
        }
    }

    fn draw_quads(&mut self, texture: Option<TextureId>, vertices: &[SpriteVertex]) {
        let tex = match texture {
            Some(id) => match self.textures.get(&id) {
                Some(t) => Some(*t),
                None => {
                    error!(texture = id.raw(), "drawing with an unknown texture");
                    return;
                }
            },
            None => None,
        };
        let program = if tex.is_some() { &self.textured } else { &self.untextured };
        self.use_program(program, tex);

        let stride = std::mem::size_of::<SpriteVertex>() as i32;
        for chunk in vertices.chunks(MAX_QUADS_PER_DRAW * 4) {
            self.upload(chunk);
            let gl = &self.gl;
            unsafe {
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ibo));
                let count = chunk.len() / 4 * 6;
                let bytes: &[u8] = std::slice::from_raw_parts(self.indices.as_ptr() as *const u8, count * std::mem::size_of::<u16>());
                gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, bytes, glow::STREAM_DRAW);

                gl.enable_vertex_attrib_array(POSITION_LOCATION);
                gl.enable_vertex_attrib_array(COLOR_LOCATION);
                gl.enable_vertex_attrib_array(UV_LOCATION);
                gl.vertex_attrib_pointer_f32(POSITION_LOCATION, 3, glow::FLOAT, false, stride, 0);
                gl.vertex_attrib_pointer_f32(COLOR_LOCATION, 4, glow::UNSIGNED_BYTE, true, stride, 12);
                gl.vertex_attrib_pointer_f32(UV_LOCATION, 2, glow::FLOAT, false, stride, 16);
                debug_assert_eq!(gl.get_error(), 0);

                gl.draw_elements(glow::TRIANGLES, count as i32, glow::UNSIGNED_SHORT, 0);
                debug_assert_eq!(gl.get_error(), 0);

                gl.disable_vertex_attrib_array(POSITION_LOCATION);
                gl.disable_vertex_attrib_array(COLOR_LOCATION);
                gl.disable_vertex_attrib_array(UV_LOCATION);
            }
        }
    }

    fn draw_text(&mut self, texture: TextureId, color: Color, vertices: &[TextVertex]) {
        let Some(tex) = self.textures.get(&texture).copied() else {
            error!(texture = texture.raw(), "drawing text with an unknown texture");
            return;
        };
        self.use_program(&self.text, Some(tex));
        let gl = &self.gl;
        unsafe {
            let c = color.to_f32();
            gl.uniform_4_f32(self.text.color.as_ref(), c[0], c[1], c[2], c[3]);
        }

        let stride = std::mem::size_of::<TextVertex>() as i32;
        // multiple of three so triangles never straddle a draw
        for chunk in vertices.chunks(65535 / 3 * 3) {
            self.upload(chunk);
            let gl = &self.gl;
            unsafe {
                gl.enable_vertex_attrib_array(POSITION_LOCATION);
                gl.enable_vertex_attrib_array(UV_LOCATION);
                gl.vertex_attrib_pointer_f32(POSITION_LOCATION, 3, glow::FLOAT, false, stride, 0);
                gl.vertex_attrib_pointer_f32(UV_LOCATION, 2, glow::FLOAT, false, stride, 12);
                gl.draw_arrays(glow::TRIANGLES, 0, chunk.len() as i32);
                debug_assert_eq!(gl.get_error(), 0);
                gl.disable_vertex_attrib_array(POSITION_LOCATION);
                gl.disable_vertex_attrib_array(UV_LOCATION);
            }
        }
    }

    fn create_texture(&mut self, id: TextureId, format: PixelFormat, width: i32, height: i32, pixels: &[u8]) {
        // single channel data is widened so every format samples alike
        let expanded;
        let (gl_format, data) = match format {
            PixelFormat::Alpha => {
                expanded = pixels.iter().flat_map(|a| [255, 255, 255, *a]).collect::<Vec<u8>>();
                (glow::RGBA, expanded.as_slice())
            }
            PixelFormat::Rgb => (glow::RGB, pixels),
            PixelFormat::Rgba => (glow::RGBA, pixels),
        };

        let gl = &self.gl;
        unsafe {
            let tex = match gl.create_texture() {
                Ok(t) => t,
                Err(e) => {
                    error!(texture = id.raw(), error = %e, "texture creation failed");
                    return;
                }
            };
            gl.bind_texture(glow::TEXTURE_2D, Some(tex));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                gl_format as i32,
                width,
                height,
                0,
                gl_format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data)),
            );
            debug_assert_eq!(gl.get_error(), 0);
            gl.bind_texture(glow::TEXTURE_2D, None);
            if let Some(old) = self.textures.insert(id, tex) {
                gl.delete_texture(old);
            }
        }
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if let Some(tex) = self.textures.remove(&id) {
            unsafe { self.gl.delete_texture(tex) }
        }
    }

    fn end(&mut self) {
        unsafe {
            self.gl.use_program(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        }
    }
}

impl Drop for GlRenderer {
    fn drop(&mut self) {
        let gl = &self.gl;
        unsafe {
            for (_, tex) in self.textures.drain() {
                gl.delete_texture(tex);
            }
            gl.delete_buffer(self.vbo);
            gl.delete_buffer(self.ibo);
            gl.delete_program(self.untextured.program);
            gl.delete_program(self.textured.program);
            gl.delete_program(self.text.program);
        }
    }
}
