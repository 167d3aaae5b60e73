//! Byte offset to editor position conversion.
//!
//! Tokens carry UTF-8 byte offsets. Editors speak `(line, character)` with
//! the character counted in UTF-16 code units. [`LineIndex`] pre-computes
//! line starts once, so each lookup is a binary search plus a scan of one
//! line.

/// Zero-based `(line, character)` position; `character` counts UTF-16 code
/// units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// Pre-computed line start table for one text.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
///
/// ```
/// use inlay_core::{LineIndex, Position};
///
/// let source = "a: 1\r\nb: é\n";
/// let index = LineIndex::new(source);
///
/// assert_eq!(index.line_count(), 3);
/// assert_eq!(index.position_at(source, 9), Position::new(1, 3));
/// assert_eq!(index.offset_at(source, Position::new(1, 0)), 6);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    /// Byte offset of each line start; `starts[0] == 0`.
    starts: Vec<u32>,
}

impl LineIndex {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "token offsets are u32; texts beyond 4 GiB are not scanned"
    )]
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut starts = vec![0u32];
        let mut i = 0;
        while let Some(found) = memchr::memchr2(b'\n', b'\r', &bytes[i..]) {
            let at = i + found;
            i = if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
                at + 2
            } else {
                at + 1
            };
            starts.push(i as u32);
        }
        LineIndex { starts }
    }

    /// Number of lines. A trailing line break opens an empty last line.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Byte offset where `line` starts, or `None` past the last line.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.starts.get(line as usize).copied()
    }

    /// Zero-based line containing `offset`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "line count is bounded by the u32 text length"
    )]
    pub fn line_of(&self, offset: u32) -> u32 {
        let line = match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        line as u32
    }

    /// Position of `offset` in `text`, which must be the text the index was
    /// built from. Offsets past the end map to the end of the text.
    pub fn position_at(&self, text: &str, offset: u32) -> Position {
        let offset = clamp_to_boundary(text, offset);
        let line = self.line_of(offset);
        let start = self.line_start(line).unwrap_or(0);
        let prefix = text.get(start as usize..offset as usize).unwrap_or("");
        Position {
            line,
            character: utf16_len(prefix),
        }
    }

    /// Byte offset of `position` in `text`.
    ///
    /// A character past the end of its line clamps to the line end (before
    /// the line break); a line past the last clamps to the end of the text.
    pub fn offset_at(&self, text: &str, position: Position) -> u32 {
        let text_len = u32::try_from(text.len()).unwrap_or(u32::MAX);
        let Some(start) = self.line_start(position.line) else {
            return text_len;
        };
        let end = self.line_start(position.line + 1).unwrap_or(text_len);
        let line = text.get(start as usize..end as usize).unwrap_or("");
        let content = line.trim_end_matches(['\n', '\r']);

        let mut units = 0;
        let mut bytes = 0;
        for ch in content.chars() {
            if units >= position.character {
                break;
            }
            units += u32::try_from(ch.len_utf16()).unwrap_or(2);
            bytes += u32::try_from(ch.len_utf8()).unwrap_or(4);
        }
        start + bytes
    }
}

fn clamp_to_boundary(text: &str, offset: u32) -> u32 {
    let mut offset = (offset as usize).min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    u32::try_from(offset).unwrap_or(u32::MAX)
}

fn utf16_len(text: &str) -> u32 {
    text.chars()
        .map(|ch| u32::try_from(ch.len_utf16()).unwrap_or(2))
        .sum()
}
