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
//! Editable character storage with a lazily rebuilt caret position table.

use crate::*;

/// Longest text a [`TextBuffer`] accepts.
pub const MAX_TEXT_LEN: usize = 0xFFFF;

/// Character sequence plus the leading-edge x offset of every character.
///
/// The offset table holds `len() + 1` entries so the trailing edge of the last
/// character can be queried. Mutations only mark the table stale from the first
/// touched index; the next query rebuilds the tail from there.
/// Shaping and kerning are not modelled: every glyph advances by its cell width entry.
#[derive(Clone, Debug)]
pub struct TextBuffer {
    chars: Vec<char>,
    x_values: Vec<f32>,
    stale_from: Option<usize>,
    font: Option<FontNode>,
}

impl Default for TextBuffer {
    fn default() -> Self { Self::new() }
}

impl TextBuffer {
    /// Creates an empty buffer without a font.
    pub fn new() -> Self { Self { chars: Vec::new(), x_values: vec![0.0], stale_from: None, font: None } }

    /// Creates an empty buffer that measures with `font`.
    pub fn with_font(font: FontNode) -> Self {
        let mut buffer = Self::new();
        buffer.font = Some(font);
        buffer
    }

    /// Number of characters.
    pub fn len(&self) -> usize { self.chars.len() }

    /// Returns `true` when the buffer holds no characters.
    pub fn is_empty(&self) -> bool { self.chars.is_empty() }

    /// Font used for measuring.
    pub fn font(&self) -> Option<&FontNode> { self.font.as_ref() }

    /// Replaces the measuring font; the whole table becomes stale.
    pub fn set_font(&mut self, font: Option<FontNode>) {
        self.font = font;
        self.mark_stale(0);
    }

    /// Contents as a `String`.
    pub fn text(&self) -> String { self.chars.iter().collect() }

    /// Contents starting at `cp`, empty if `cp` is past the end.
    pub fn text_from(&self, cp: usize) -> String { self.chars.iter().skip(cp).collect() }

    /// Contents of `start..end`, clamped to the buffer.
    pub fn text_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Character at `index`.
    pub fn char_at(&self, index: usize) -> Option<char> { self.chars.get(index).copied() }

    /// Removes every character.
    pub fn clear(&mut self) {
        self.chars.clear();
        self.mark_stale(0);
    }

    fn mark_stale(&mut self, index: usize) {
        self.stale_from = Some(match self.stale_from {
            Some(prev) => prev.min(index),
            None => index,
        });
    }

    /// Inserts `ch` at `index`, or appends when `index` is `None`.
    pub fn insert_char(&mut self, index: Option<usize>, ch: char) -> Result<()> {
        let index = index.unwrap_or(self.chars.len());
        if index > self.chars.len() {
            return Err(Error::invalid(format!("insert position {} past end {}", index, self.chars.len())));
        }
        if self.chars.len() + 1 > MAX_TEXT_LEN {
            return Err(Error::invalid("text buffer is full"));
        }
        self.chars.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        self.chars.insert(index, ch);
        self.mark_stale(index);
        Ok(())
    }

    /// Inserts `s` at `index`, or appends when `index` is `None`. Nothing is inserted on failure.
    pub fn insert_str(&mut self, index: Option<usize>, s: &str) -> Result<()> {
        let index = index.unwrap_or(self.chars.len());
        if index > self.chars.len() {
            return Err(Error::invalid(format!("insert position {} past end {}", index, self.chars.len())));
        }
        let count = s.chars().count();
        if self.chars.len() + count > MAX_TEXT_LEN {
            return Err(Error::invalid("text would exceed the buffer limit"));
        }
        self.chars.try_reserve(count).map_err(|_| Error::OutOfMemory)?;
        self.chars.splice(index..index, s.chars());
        self.mark_stale(index);
        Ok(())
    }

    /// Removes the character at `index`. Returns `false` when out of range.
    pub fn remove_char(&mut self, index: usize) -> bool {
        if index >= self.chars.len() {
            return false;
        }
        self.chars.remove(index);
        self.mark_stale(index);
        true
    }

    /// Removes `start..end`, clamped to the buffer.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.chars.len());
        if start >= end {
            return;
        }
        self.chars.drain(start..end);
        self.mark_stale(start);
    }

    /// Replaces the character at `index`, appending when `index == len()`.
    pub fn overwrite_char(&mut self, index: usize, ch: char) -> Result<()> {
        match self.chars.get_mut(index) {
            Some(c) => {
                *c = ch;
                self.mark_stale(index);
                Ok(())
            }
            None => self.insert_char(Some(index), ch),
        }
    }

    /// Replaces the whole content.
    pub fn set_text(&mut self, s: &str) -> Result<()> {
        if s.chars().count() > MAX_TEXT_LEN {
            return Err(Error::invalid("text exceeds the buffer limit"));
        }
        self.chars.clear();
        self.chars.extend(s.chars());
        self.mark_stale(0);
        Ok(())
    }

    /// Rebuilds the stale tail of the offset table.
    pub fn analyse(&mut self) -> Result<()> {
        let Some(stale) = self.stale_from else { return Ok(()) };
        let font = self.font.as_ref().ok_or_else(|| Error::invalid("text buffer has no font"))?;

        let keep = stale.min(self.x_values.len().saturating_sub(1)).min(self.chars.len());
        self.x_values.truncate(keep + 1);
        if self.x_values.is_empty() {
            self.x_values.push(0.0);
        }
        let mut x = self.x_values[keep];
        for &ch in &self.chars[keep..] {
            x += font.advance(ch);
            self.x_values.push(x);
        }
        self.stale_from = None;
        Ok(())
    }

    /// Leading edge of `cp`, or its trailing edge when `trailing` is set.
    pub fn cp_to_x(&mut self, cp: usize, trailing: bool) -> Result<f32> {
        if cp > self.chars.len() {
            return Err(Error::invalid(format!("caret position {} past end {}", cp, self.chars.len())));
        }
        self.analyse()?;
        let index = if trailing { (cp + 1).min(self.chars.len()) } else { cp };
        Ok(self.x_values[index])
    }

    /// Finds the character under `x`; `trailing` is set when `x` lies past its midpoint.
    /// Positions before the text map to `(0, false)`, positions after it to `(len(), false)`.
    pub fn x_to_cp(&mut self, x: f32) -> Result<(usize, bool)> {
        self.analyse()?;
        if x < 0.0 {
            return Ok((0, false));
        }
        for i in 0..self.chars.len() {
            let lead = self.x_values[i];
            let trail = self.x_values[i + 1];
            if x < trail {
                return Ok((i, x >= (lead + trail) * 0.5));
            }
        }
        Ok((self.chars.len(), false))
    }

    /// Caret stop before `cp`. Steps one character at a time.
    pub fn prior_item_pos(&self, cp: usize) -> usize { cp.min(self.chars.len()).saturating_sub(1) }

    /// Caret stop after `cp`. Steps one character at a time.
    pub fn next_item_pos(&self, cp: usize) -> usize { (cp + 1).min(self.chars.len()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::test_font;
    use rand::Rng;

    fn buffer() -> TextBuffer { TextBuffer::with_font(FontNode { font: test_font(), size: 0.0625, weight: FontWeight::Normal }) }

    #[test]
    fn insert_and_remove() {
        let mut b = buffer();
        b.insert_str(None, "hello").unwrap();
        b.insert_char(Some(0), '>').unwrap();
        assert_eq!(b.text(), ">hello");
        assert!(b.remove_char(0));
        assert!(!b.remove_char(10));
        assert_eq!(b.text(), "hello");
        assert!(matches!(b.insert_char(Some(9), 'x'), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn rejects_growth_past_limit() {
        let mut b = buffer();
        b.set_text(&"a".repeat(MAX_TEXT_LEN)).unwrap();
        assert!(b.insert_char(None, 'b').is_err());
        assert!(b.insert_str(Some(0), "b").is_err());
        assert_eq!(b.len(), MAX_TEXT_LEN);
    }

    #[test]
    fn caret_offsets_accumulate_advances() {
        let mut b = buffer();
        b.set_text("abc").unwrap();
        let adv = 8.0 * 0.0625 / 16.0;
        assert!((b.cp_to_x(0, false).unwrap()).abs() < 1e-7);
        assert!((b.cp_to_x(1, false).unwrap() - adv).abs() < 1e-7);
        assert!((b.cp_to_x(1, true).unwrap() - 2.0 * adv).abs() < 1e-7);
        assert!((b.cp_to_x(3, true).unwrap() - 3.0 * adv).abs() < 1e-7);
        assert!(b.cp_to_x(4, false).is_err());
    }

    #[test]
    fn x_to_cp_reports_trailing_half() {
        let mut b = buffer();
        b.set_text("abc").unwrap();
        let adv = 8.0 * 0.0625 / 16.0;
        assert_eq!(b.x_to_cp(adv * 1.2).unwrap(), (1, false));
        assert_eq!(b.x_to_cp(adv * 1.8).unwrap(), (1, true));
        assert_eq!(b.x_to_cp(-1.0).unwrap(), (0, false));
        assert_eq!(b.x_to_cp(10.0).unwrap(), (3, false));
    }

    #[test]
    fn x_cp_round_trip() {
        let mut b = buffer();
        b.set_text("round trip").unwrap();
        for cp in 0..=b.len() {
            let x = b.cp_to_x(cp, false).unwrap();
            assert_eq!(b.x_to_cp(x).unwrap().0, cp);
        }
    }

    #[test]
    fn partial_rebuild_matches_full_rebuild() {
        let mut b = buffer();
        b.set_text("abcdef").unwrap();
        b.analyse().unwrap();
        b.insert_str(Some(3), "XYZ").unwrap();
        b.remove_char(1);
        let partial: Vec<f32> = (0..=b.len()).map(|cp| b.cp_to_x(cp, false).unwrap()).collect();

        let mut fresh = buffer();
        fresh.set_text(&b.text()).unwrap();
        let full: Vec<f32> = (0..=fresh.len()).map(|cp| fresh.cp_to_x(cp, false).unwrap()).collect();
        assert_eq!(partial, full);
    }

    #[test]
    fn missing_font_fails_analysis() {
        let mut b = TextBuffer::new();
        b.set_text("x").unwrap();
        assert!(b.cp_to_x(0, false).is_err());
        assert!(b.x_to_cp(0.0).is_err());
    }

    #[test]
    fn item_positions_step_one_character() {
        let mut b = buffer();
        b.set_text("ab").unwrap();
        assert_eq!(b.prior_item_pos(0), 0);
        assert_eq!(b.prior_item_pos(2), 1);
        assert_eq!(b.next_item_pos(1), 2);
        assert_eq!(b.next_item_pos(2), 2);
    }

    #[test]
    fn random_insert_then_remove_restores() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let mut b = buffer();
            let base: String = (0..rng.random_range(0..20)).map(|_| rng.random_range('a'..='z')).collect();
            b.set_text(&base).unwrap();
            let insert: String = (0..rng.random_range(1..10)).map(|_| rng.random_range('A'..='Z')).collect();
            let at = rng.random_range(0..=b.len());
            b.insert_str(Some(at), &insert).unwrap();
            b.remove_range(at, at + insert.chars().count());
            assert_eq!(b.text(), base);
        }
    }
}
