//! Token model shared by every format.

use std::fmt;
use std::ops::Range;

/// Token-kind set of a format.
///
/// Implemented through [`token_set!`](crate::token_set). Every set carries an
/// end-of-stream kind and an unknown kind so the engine can finish scans and
/// enforce progress without knowing the format.
pub trait TokenKind: Copy + Eq + fmt::Debug + 'static {
    /// Zero-length kind returned once the stream is exhausted.
    const EOS: Self;
    /// Kind used for input that matches no rule.
    const UNKNOWN: Self;

    /// Stable name, used by tooling output and type-erased token streams.
    fn name(self) -> &'static str;
}

/// Lexical mode set of a format.
pub trait ScannerState: Copy + Eq + fmt::Debug + 'static {
    /// Stable name of the state.
    fn name(self) -> &'static str;

    /// Looks a state up by its stable name.
    fn from_name(name: &str) -> Option<Self>
    where
        Self: Sized;
}

/// A typed, offset-delimited slice of the source.
///
/// Offsets are byte offsets into the scanned `&str`, always on `char`
/// boundaries. The text itself is not stored; slice it on demand with
/// [`text`](Self::text).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Token<K> {
    pub kind: K,
    pub start: u32,
    /// Exclusive end offset.
    pub end: u32,
    /// Diagnostic attached by the scanner for malformed input.
    pub error: Option<&'static str>,
}

impl<K> Token<K> {
    #[inline]
    pub const fn new(kind: K, start: u32, end: u32) -> Self {
        Token {
            kind,
            start,
            end,
            error: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_error(self, message: &'static str) -> Self {
        Token {
            error: Some(message),
            ..self
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `offset` lies inside `[start, end)`.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    #[inline]
    pub const fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Slices the token text out of the source it was scanned from.
    ///
    /// Returns `""` if the token does not belong to `source`.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.range()).unwrap_or("")
    }

    /// Maps the kind, keeping offsets and error.
    pub fn map_kind<U>(self, f: impl FnOnce(K) -> U) -> Token<U> {
        Token {
            kind: f(self.kind),
            start: self.start,
            end: self.end,
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests;
