//! Cursor over immutable source text.
//!
//! The stream works on bytes of a `&str` and reports UTF-8 byte offsets.
//! Every structural character the scanners test for is ASCII, and no byte of
//! a multi-byte sequence is below `0x80`, so byte comparisons never split a
//! code point. Operations that move by a count or by a predicate re-align
//! the cursor to the next `char` boundary, which keeps every token slice a
//! valid `&str`.
//!
//! # Bounded streams
//!
//! A stream may cover only `[start, end)` of its text. Offsets stay
//! absolute, and `eos()` becomes true at `end`. Host scanners use this to
//! hand an embedded region to another scanner without copying.

use crate::constants::{is_inline_whitespace, is_whitespace, CARRIAGE_RETURN, LINE_FEED};

/// Returns the earliest of two optional positions.
///
/// Combines separate memchr searches when more needles are needed than
/// `memchr3` supports.
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Clamps a `usize` length or offset into the `u32` offset space.
#[inline]
fn to_offset(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Cursor over a `&str` with peek, advance and backtracking primitives.
///
/// The stream is [`Copy`], so saving it is a cheap snapshot; the scanners
/// only save the offset and restore it with [`go_back_to`](Self::go_back_to).
#[derive(Clone, Copy, Debug)]
pub struct CharacterStream<'src> {
    text: &'src str,
    /// First offset of the scanned range.
    start: u32,
    /// Current read position.
    pos: u32,
    /// Exclusive end of the scanned range.
    end: u32,
}

impl<'src> CharacterStream<'src> {
    /// Stream over the whole text, positioned at offset 0.
    pub fn new(text: &'src str) -> Self {
        Self::with_range(text, 0, to_offset(text.len()))
    }

    /// Stream over the whole text, positioned at `offset`.
    ///
    /// The offset is clamped to the text and moved forward to the next
    /// `char` boundary.
    pub fn starting_at(text: &'src str, offset: u32) -> Self {
        let mut stream = Self::new(text);
        stream.pos = stream.ceil_char_boundary(offset.min(stream.end));
        stream
    }

    /// Stream over `[start, end)`, positioned at `start`.
    ///
    /// `end` is clamped to the text and moved back to a `char` boundary;
    /// `start` is clamped to `end` and moved forward to one.
    pub fn with_range(text: &'src str, start: u32, end: u32) -> Self {
        let mut stream = CharacterStream {
            text,
            start: 0,
            pos: 0,
            end: to_offset(text.len()),
        };
        stream.end = stream.floor_char_boundary(end.min(stream.end));
        stream.start = stream.ceil_char_boundary(start.min(stream.end)).min(stream.end);
        stream.pos = stream.start;
        stream
    }

    /// The complete source text, including parts outside the range.
    #[inline]
    pub fn text(&self) -> &'src str {
        self.text
    }

    /// Current offset.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// First offset of the scanned range.
    #[inline]
    pub fn range_start(&self) -> u32 {
        self.start
    }

    /// Exclusive end of the scanned range.
    #[inline]
    pub fn range_end(&self) -> u32 {
        self.end
    }

    /// Returns `true` once the cursor reached the end of the range.
    #[inline]
    pub fn eos(&self) -> bool {
        self.pos >= self.end
    }

    #[inline]
    fn bytes(&self) -> &'src [u8] {
        self.text.as_bytes()
    }

    /// Unread bytes of the range.
    #[inline]
    fn rest(&self) -> &'src [u8] {
        &self.bytes()[self.pos as usize..self.end as usize]
    }

    /// Byte `lookahead` positions after the cursor, or `0` past the range.
    ///
    /// `0` is also returned for an interior NUL; use [`eos`](Self::eos) to
    /// tell the two apart where it matters.
    #[inline]
    pub fn peek_char(&self, lookahead: u32) -> u8 {
        let at = self.pos.saturating_add(lookahead);
        if at < self.end {
            self.bytes()[at as usize]
        } else {
            0
        }
    }

    /// Byte immediately before the cursor, or `0` at the start of the text.
    ///
    /// Looks outside the range on purpose: an embedded region starting
    /// mid-line must still know it is not at a line start.
    #[inline]
    pub fn prev_char(&self) -> u8 {
        match self.pos.checked_sub(1) {
            Some(at) => self.bytes()[at as usize],
            None => 0,
        }
    }

    /// Returns `true` at offset 0 or right after a line break.
    pub fn at_line_start(&self) -> bool {
        self.pos == 0 || matches!(self.prev_char(), LINE_FEED | CARRIAGE_RETURN)
    }

    /// Advances `n` bytes, stopping at the end of the range and re-aligning
    /// to the next `char` boundary.
    pub fn advance(&mut self, n: u32) {
        let target = self.pos.saturating_add(n).min(self.end);
        self.pos = self.ceil_char_boundary(target);
    }

    /// Advances past one full code point. No-op at the end of the range.
    pub fn advance_char(&mut self) {
        if self.eos() {
            return;
        }
        let width = utf8_char_width(self.bytes()[self.pos as usize]);
        self.advance(width);
    }

    /// Consumes `ch` if it is the next byte.
    #[inline]
    pub fn advance_if_char(&mut self, ch: u8) -> bool {
        if !self.eos() && self.bytes()[self.pos as usize] == ch {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes `chars` if the unread input starts with it.
    pub fn advance_if_chars(&mut self, chars: &str) -> bool {
        if self.rest().starts_with(chars.as_bytes()) {
            self.pos += to_offset(chars.len());
            true
        } else {
            false
        }
    }

    /// Consumes `chars` if the unread input starts with it, ignoring ASCII
    /// case.
    pub fn advance_if_chars_ignore_case(&mut self, chars: &str) -> bool {
        let rest = self.rest();
        let needle = chars.as_bytes();
        if rest.len() >= needle.len() && rest[..needle.len()].eq_ignore_ascii_case(needle) {
            self.pos += to_offset(needle.len());
            true
        } else {
            false
        }
    }

    /// Returns `true` if the unread input starts with `chars`.
    pub fn starts_with(&self, chars: &str) -> bool {
        self.rest().starts_with(chars.as_bytes())
    }

    /// Advances to the first byte contained in `set`.
    ///
    /// Returns `true` with the cursor on the found byte, or `false` with the
    /// cursor at the end of the range. `set` must contain ASCII bytes only.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "rest().len() <= range length which fits in u32"
    )]
    pub fn advance_until_char(&mut self, set: &[u8]) -> bool {
        debug_assert!(set.iter().all(u8::is_ascii), "stop set must be ASCII");
        let rest = self.rest();
        let found = match set {
            [] => None,
            [a] => memchr::memchr(*a, rest),
            [a, b] => memchr::memchr2(*a, *b, rest),
            [a, b, c] => memchr::memchr3(*a, *b, *c, rest),
            [a, b, c, more @ ..] => earliest_of(
                memchr::memchr3(*a, *b, *c, rest),
                rest.iter().position(|byte| more.contains(byte)),
            ),
        };
        match found {
            Some(offset) => {
                self.pos += offset as u32;
                true
            }
            None => {
                self.pos = self.end;
                false
            }
        }
    }

    /// Advances to the start of the next occurrence of `chars`.
    ///
    /// Returns `true` with the cursor on the occurrence, or `false` with the
    /// cursor at the end of the range.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "rest().len() <= range length which fits in u32"
    )]
    pub fn advance_until_chars(&mut self, chars: &str) -> bool {
        match memchr::memmem::find(self.rest(), chars.as_bytes()) {
            Some(offset) => {
                self.pos += offset as u32;
                true
            }
            None => {
                self.pos = self.end;
                false
            }
        }
    }

    /// Advances to the next line break (`\n` or `\r`) or the end of the
    /// range. Returns `true` if a line break was found.
    pub fn advance_until_line_break(&mut self) -> bool {
        self.advance_until_char(&[LINE_FEED, CARRIAGE_RETURN])
    }

    /// Advances while `pred` holds for the next byte and returns the number
    /// of bytes consumed.
    ///
    /// # Contract
    ///
    /// `pred` should classify all non-ASCII bytes alike. If it does not, the
    /// cursor is re-aligned forward to a `char` boundary, so a code point is
    /// never split but may be consumed by a rejected trailing byte.
    pub fn advance_while_char(&mut self, pred: impl Fn(u8) -> bool) -> u32 {
        let start = self.pos;
        while !self.eos() && pred(self.bytes()[self.pos as usize]) {
            self.pos += 1;
        }
        self.pos = self.ceil_char_boundary(self.pos);
        self.pos - start
    }

    /// Skips spaces and tabs, never line breaks. Returns `true` if anything
    /// was skipped.
    pub fn skip_whitespace_only(&mut self) -> bool {
        self.advance_while_char(is_inline_whitespace) > 0
    }

    /// Skips ASCII whitespace including line breaks. Returns `true` if
    /// anything was skipped.
    pub fn skip_whitespace(&mut self) -> bool {
        self.advance_while_char(is_whitespace) > 0
    }

    /// Consumes one line break (`\r\n`, `\n` or a lone `\r`).
    pub fn advance_line_break(&mut self) -> bool {
        if self.advance_if_char(CARRIAGE_RETURN) {
            self.advance_if_char(LINE_FEED);
            true
        } else {
            self.advance_if_char(LINE_FEED)
        }
    }

    /// Moves the cursor back to a previously saved offset.
    ///
    /// Only backward moves inside the range are honored; a forward or
    /// out-of-range target leaves the cursor where it is.
    #[inline]
    pub fn go_back_to(&mut self, saved: u32) {
        if saved <= self.pos && saved >= self.start {
            self.pos = saved;
        }
    }

    /// Moves the cursor `n` bytes back, not past the start of the range.
    pub fn go_back(&mut self, n: u32) {
        let target = self.pos.saturating_sub(n).max(self.start);
        self.pos = self.floor_char_boundary(target);
    }

    /// Source text of `[start, end)`, or `""` for an invalid range.
    pub fn slice(&self, start: u32, end: u32) -> &'src str {
        self.text.get(start as usize..end as usize).unwrap_or("")
    }

    /// Source text from `start` to the cursor.
    pub fn slice_from(&self, start: u32) -> &'src str {
        self.slice(start, self.pos)
    }

    fn is_char_boundary(&self, offset: u32) -> bool {
        self.text.is_char_boundary(offset as usize)
    }

    fn ceil_char_boundary(&self, mut offset: u32) -> u32 {
        while offset < self.end && !self.is_char_boundary(offset) {
            offset += 1;
        }
        offset
    }

    fn floor_char_boundary(&self, mut offset: u32) -> u32 {
        while offset > 0 && !self.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

/// Number of bytes in the UTF-8 sequence introduced by `byte`.
///
/// Continuation and invalid lead bytes count as one; the caller re-aligns.
#[inline]
fn utf8_char_width(byte: u8) -> u32 {
    match byte {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}
