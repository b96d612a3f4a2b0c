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
//! Default elements for the stock atlas shipped with the toolkit.
//!
//! Texture rectangles are expressed in normalised texture coordinates with `top > bottom`.

use crate::*;

fn tex(left: f32, top: f32, right: f32, bottom: f32) -> Element { Element::default().with_texture(0, Rect::new(left, top, right, bottom)) }

fn with_texture_states(mut e: Element, states: &[(ControlState, Color)]) -> Element {
    for &(s, c) in states {
        e.texture_color.set_state(s, c);
    }
    e
}

fn with_font_states(mut e: Element, states: &[(ControlState, Color)]) -> Element {
    for &(s, c) in states {
        e.font_color.set_state(s, c);
    }
    e
}

fn with_font(mut e: Element, default: Color, format: TextFormat) -> Element {
    e.set_font(0, default, format);
    e
}

/// Element used for the dialog caption strip. Pre-blended since it never changes state.
pub(crate) fn caption_element() -> Element {
    let white = color(255, 255, 255, 255);
    let mut e = with_font(tex(0.0, 0.078125, 0.4296875, 0.0), white, TextFormat::LEFT | TextFormat::VCENTER);
    e.texture_color.set_state(ControlState::Normal, white);
    e.blend(ControlState::Normal, 10.0, DEFAULT_BLEND_RATE);
    e
}

fn check_elements(box_rect: Rect, check_rect: Rect) -> [Element; 2] {
    let white = color(255, 255, 255, 255);
    let states = [
        (ControlState::Normal, color(255, 255, 255, 75)),
        (ControlState::Focus, color(255, 255, 255, 100)),
        (ControlState::Pressed, color(255, 255, 255, 127)),
    ];
    let text = |e: Element| with_font_states(with_font(e, white, TextFormat::LEFT | TextFormat::VCENTER), &[(ControlState::Disabled, color(200, 200, 200, 100))]);
    let boxed = with_texture_states(text(tex(box_rect.left, box_rect.top, box_rect.right, box_rect.bottom)), &states);
    let check = text(tex(check_rect.left, check_rect.top, check_rect.right, check_rect.bottom));
    [boxed, check]
}

fn edit_box_elements() -> Vec<Element> {
    const COLS: [f32; 4] = [0.03125, 0.0546875, 0.94140625, 0.9609375];
    const ROWS: [f32; 4] = [0.6796875, 0.6484375, 0.55859375, 0.52734375];
    let frame = |c: usize, r: usize| with_font(tex(COLS[c], ROWS[r], COLS[c + 1], ROWS[r + 1]), Color::BLACK, TextFormat::LEFT | TextFormat::VCENTER);
    // text area first, then the border clockwise from the top-left corner row by row
    vec![frame(1, 1), frame(0, 0), frame(1, 0), frame(2, 0), frame(0, 1), frame(2, 1), frame(0, 2), frame(1, 2), frame(2, 2)]
}

/// `(control type, element index, element)` triples a fresh dialog starts with.
pub(crate) fn default_elements() -> Vec<(ControlType, usize, Element)> {
    let mut out = Vec::new();

    let label = with_font_states(Element::default(), &[(ControlState::Disabled, color(200, 200, 200, 200))]);
    out.push((ControlType::Static, 0, label));

    let button = with_texture_states(
        with_font_states(tex(0.0, 1.0, 0.53125, 0.7890625), &[(ControlState::MouseOver, color(0, 0, 0, 50))]),
        &[(ControlState::Normal, color(255, 255, 255, 75)), (ControlState::Pressed, color(255, 255, 255, 100))],
    );
    let fill = with_texture_states(
        with_font_states(tex(0.53125, 1.0, 0.984375, 0.7890625), &[(ControlState::MouseOver, color(0, 0, 0, 50))]),
        &[
            (ControlState::MouseOver, color(200, 200, 200, 40)),
            (ControlState::Pressed, color(0, 0, 0, 30)),
            (ControlState::Focus, color(255, 255, 255, 15)),
        ],
    );
    out.push((ControlType::Button, 0, button));
    out.push((ControlType::Button, 1, fill));

    let [b, c] = check_elements(Rect::new(0.0, 0.7890625, 0.10546875, 0.68359375), Rect::new(0.10546875, 0.7890625, 0.2109375, 0.68359375));
    out.push((ControlType::CheckBox, 0, b));
    out.push((ControlType::CheckBox, 1, c));
    let [b, c] = check_elements(Rect::new(0.2109375, 0.7890625, 0.31640625, 0.68359375), Rect::new(0.31640625, 0.7890625, 0.421875, 0.68359375));
    out.push((ControlType::RadioButton, 0, b));
    out.push((ControlType::RadioButton, 1, c));

    let combo_main = with_font_states(
        with_texture_states(
            tex(0.02734375, 0.5234375, 0.96484375, 0.3671875),
            &[
                (ControlState::Normal, color(200, 200, 200, 150)),
                (ControlState::Focus, color(230, 230, 230, 170)),
                (ControlState::Disabled, color(200, 200, 200, 70)),
            ],
        ),
        &[
            (ControlState::MouseOver, Color::BLACK),
            (ControlState::Pressed, Color::BLACK),
            (ControlState::Disabled, color(200, 200, 200, 200)),
        ],
    );
    let combo_button = with_texture_states(
        tex(0.3828125, 0.26171875, 0.58984375, 0.0703125),
        &[
            (ControlState::Normal, color(255, 255, 255, 75)),
            (ControlState::MouseOver, color(255, 255, 255, 100)),
            (ControlState::Pressed, color(150, 150, 150, 127)),
            (ControlState::Focus, color(255, 255, 255, 100)),
            (ControlState::Disabled, color(255, 255, 255, 35)),
        ],
    );
    let combo_drop = with_font(tex(0.05078125, 0.51953125, 0.94140625, 0.37109375), Color::BLACK, TextFormat::LEFT | TextFormat::TOP);
    let combo_sel = with_font(tex(0.046875, 0.36328125, 0.93359375, 0.28515625), color(255, 255, 255, 255), TextFormat::LEFT | TextFormat::TOP);
    out.push((ControlType::ComboBox, 0, combo_main));
    out.push((ControlType::ComboBox, 1, combo_button));
    out.push((ControlType::ComboBox, 2, combo_drop));
    out.push((ControlType::ComboBox, 3, combo_sel));

    let slider_states = [
        (ControlState::Normal, color(255, 255, 255, 75)),
        (ControlState::Focus, color(255, 255, 255, 100)),
        (ControlState::Disabled, color(255, 255, 255, 35)),
    ];
    out.push((ControlType::Slider, 0, with_texture_states(tex(0.00390625, 0.26953125, 0.36328125, 0.109375), &slider_states)));
    out.push((ControlType::Slider, 1, with_texture_states(tex(0.58984375, 0.24609375, 0.75, 0.0859375), &slider_states)));

    let (sx, sy) = (0.765625, 0.234375);
    let disabled = [(ControlState::Disabled, color(200, 200, 200, 255))];
    out.push((ControlType::ScrollBar, 0, with_texture_states(tex(sx, sy - 0.08203125, sx + 0.0859375, sy - 0.125), &disabled)));
    out.push((ControlType::ScrollBar, 1, with_texture_states(tex(sx, sy - 0.00390625, sx + 0.0859375, sy - 0.08203125), &disabled)));
    out.push((ControlType::ScrollBar, 2, with_texture_states(tex(sx, sy - 0.125, sx + 0.0859375, sy - 0.20703125), &disabled)));
    out.push((ControlType::ScrollBar, 3, tex(0.859375, 0.75, 0.9296875, 0.9140625)));

    for (i, e) in edit_box_elements().into_iter().enumerate() {
        out.push((ControlType::EditBox, i, e));
    }

    out.push((ControlType::ListBox, 0, with_font(tex(0.05078125, 0.51953125, 0.94140625, 0.375), Color::BLACK, TextFormat::LEFT | TextFormat::TOP)));
    out.push((ControlType::ListBox, 1, with_font(tex(0.0625, 0.3515625, 0.9375, 0.28515625), color(255, 255, 255, 255), TextFormat::LEFT | TextFormat::TOP)));
    out
}
