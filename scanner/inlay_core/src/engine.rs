//! Generic scanning engine.
//!
//! A [`Scanner`] owns the stream, the current [`ScannerState`] and the
//! format's auxiliary context, and yields one [`Token`] per call to
//! [`scan`](Scanner::scan). What a token *is* lives entirely in the
//! [`Format`] implementation; the engine only finalizes tokens and enforces
//! the invariants every format shares:
//!
//! - at the end of the range `scan()` returns `EOS` without consulting the
//!   format, however often it is called;
//! - a token that consumed nothing is replaced by a one-code-point `UNKNOWN`
//!   token, so scanning always terminates.
//!
//! Iteration goes through [`Scanner::tokens`], which borrows the scanner so
//! its position and state stay observable afterwards.

use std::iter::FusedIterator;
use std::ops::Range;

use tracing::{trace, warn};

use crate::stream::CharacterStream;
use crate::token::{ScannerState, Token, TokenKind};

/// Diagnostic attached when a format produced a token without consuming
/// input.
pub const NO_PROGRESS_MESSAGE: &str = "Unexpected character";

/// A lexical format: its token kinds, its states and its dispatch.
///
/// `Self` is the format's auxiliary lexical context (flow depths, string
/// return states and the like). It must be cheap to clone because every
/// [`Checkpoint`] carries a copy.
pub trait Format: Clone + Default + std::fmt::Debug {
    type Kind: TokenKind;
    type State: ScannerState;

    /// State of a scanner created without an explicit one.
    const INITIAL_STATE: Self::State;

    /// Scans exactly one token starting at `cx.token_start()`.
    ///
    /// Never called at the end of the stream. Returning without consuming
    /// input is tolerated but reported as an `UNKNOWN` token by the engine.
    fn scan(&mut self, cx: &mut ScanContext<'_, '_, Self::State>) -> Self::Kind;
}

/// What a [`Format`] sees while scanning one token.
pub struct ScanContext<'a, 'src, S> {
    pub stream: &'a mut CharacterStream<'src>,
    state: &'a mut S,
    token_start: u32,
    error: Option<&'static str>,
}

impl<'src, S: ScannerState> ScanContext<'_, 'src, S> {
    #[inline]
    pub fn state(&self) -> S {
        *self.state
    }

    #[inline]
    pub fn set_state(&mut self, state: S) {
        *self.state = state;
    }

    /// Offset at which the current token began.
    #[inline]
    pub fn token_start(&self) -> u32 {
        self.token_start
    }

    /// Text consumed so far for the current token.
    pub fn token_text(&self) -> &'src str {
        self.stream.slice_from(self.token_start)
    }

    /// Returns `true` if the current token has consumed input.
    #[inline]
    pub fn has_progress(&self) -> bool {
        self.stream.pos() > self.token_start
    }

    /// Finishes the token with `kind`.
    #[inline]
    pub fn finish<K>(&mut self, kind: K) -> K {
        kind
    }

    /// Finishes the token with `kind` and attaches a diagnostic.
    #[inline]
    pub fn finish_with_error<K>(&mut self, kind: K, message: &'static str) -> K {
        self.error = Some(message);
        kind
    }
}

/// Saved scanner position from which scanning can resume exactly.
#[derive(Clone, Debug)]
pub struct Checkpoint<F: Format> {
    pub offset: u32,
    /// Exclusive end of the range being scanned.
    pub end: u32,
    pub state: F::State,
    pub format: F,
}

/// Fault-tolerant scanner over one text, parameterized by its [`Format`].
#[derive(Clone, Debug)]
pub struct Scanner<'src, F: Format> {
    stream: CharacterStream<'src>,
    state: F::State,
    format: F,
    token: Token<F::Kind>,
}

impl<'src, F: Format> Scanner<'src, F> {
    /// Scanner over the whole text, in the format's initial state.
    pub fn new(text: &'src str) -> Self {
        Self::with_format(CharacterStream::new(text), F::INITIAL_STATE, F::default())
    }

    /// Scanner over the whole text, starting at `offset` in `state`.
    ///
    /// The auxiliary context starts at its default; formats re-derive what
    /// `state` implies on the first scan.
    pub fn at(text: &'src str, offset: u32, state: F::State) -> Self {
        Self::with_format(CharacterStream::starting_at(text, offset), state, F::default())
    }

    /// Scanner over `range` of the text. Offsets stay absolute.
    pub fn with_range(text: &'src str, range: Range<u32>, state: F::State) -> Self {
        Self::with_format(
            CharacterStream::with_range(text, range.start, range.end),
            state,
            F::default(),
        )
    }

    /// Scanner over an existing stream with an explicit auxiliary context.
    pub fn with_format(stream: CharacterStream<'src>, state: F::State, format: F) -> Self {
        let pos = stream.pos();
        Scanner {
            stream,
            state,
            format,
            token: Token::new(F::Kind::EOS, pos, pos),
        }
    }

    /// Resumes a scan saved with [`checkpoint`](Self::checkpoint).
    pub fn resume(text: &'src str, checkpoint: Checkpoint<F>) -> Self {
        Self::with_format(
            CharacterStream::with_range(text, checkpoint.offset, checkpoint.end),
            checkpoint.state,
            checkpoint.format,
        )
    }

    /// Saves the current position, state and auxiliary context.
    pub fn checkpoint(&self) -> Checkpoint<F> {
        Checkpoint {
            offset: self.stream.pos(),
            end: self.stream.range_end(),
            state: self.state,
            format: self.format.clone(),
        }
    }

    /// Scans the next token and returns its kind.
    pub fn scan(&mut self) -> F::Kind {
        let start = self.stream.pos();
        if self.stream.eos() {
            self.token = Token::new(F::Kind::EOS, start, start);
            return F::Kind::EOS;
        }

        let mut cx = ScanContext {
            stream: &mut self.stream,
            state: &mut self.state,
            token_start: start,
            error: None,
        };
        let mut kind = self.format.scan(&mut cx);
        let mut error = cx.error;

        if self.stream.pos() == start || kind == F::Kind::EOS {
            warn!(
                kind = kind.name(),
                state = self.state.name(),
                offset = start,
                "scanner made no progress"
            );
            if self.stream.pos() == start {
                self.stream.advance_char();
            }
            kind = F::Kind::UNKNOWN;
            error = Some(NO_PROGRESS_MESSAGE);
        }

        let end = self.stream.pos();
        self.token = Token {
            kind,
            start,
            end,
            error,
        };
        trace!(
            kind = kind.name(),
            start,
            end,
            state = self.state.name(),
            "token"
        );
        kind
    }

    /// Collects every remaining token, up to and including `EOS`.
    #[tracing::instrument(level = "debug", skip_all, fields(
        start = self.stream.pos(),
        end = self.stream.range_end(),
    ))]
    pub fn tokenize(&mut self) -> Vec<Token<F::Kind>> {
        self.tokens().collect()
    }

    /// Iterates the remaining tokens, up to and including `EOS`.
    pub fn tokens(&mut self) -> Tokens<'_, 'src, F> {
        Tokens {
            scanner: self,
            finished: false,
        }
    }

    /// Kind of the last scanned token.
    #[inline]
    pub fn token_kind(&self) -> F::Kind {
        self.token.kind
    }

    /// Start offset of the last scanned token.
    #[inline]
    pub fn token_offset(&self) -> u32 {
        self.token.start
    }

    /// Exclusive end offset of the last scanned token.
    #[inline]
    pub fn token_end(&self) -> u32 {
        self.token.end
    }

    #[inline]
    pub fn token_length(&self) -> u32 {
        self.token.len()
    }

    pub fn token_text(&self) -> &'src str {
        self.token.text(self.stream.text())
    }

    #[inline]
    pub fn token_error(&self) -> Option<&'static str> {
        self.token.error
    }

    #[inline]
    pub fn token(&self) -> Token<F::Kind> {
        self.token
    }

    #[inline]
    pub fn state(&self) -> F::State {
        self.state
    }

    /// Current stream offset: the end of the last token.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.stream.pos()
    }

    /// The auxiliary lexical context.
    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn text(&self) -> &'src str {
        self.stream.text()
    }
}

/// Iterator over the remaining tokens of a [`Scanner`].
///
/// Created by [`Scanner::tokens`]. Yields through the first `EOS`, then
/// `None`.
#[derive(Debug)]
pub struct Tokens<'a, 'src, F: Format> {
    scanner: &'a mut Scanner<'src, F>,
    finished: bool,
}

impl<F: Format> Iterator for Tokens<'_, '_, F> {
    type Item = Token<F::Kind>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.scanner.scan() == F::Kind::EOS {
            self.finished = true;
        }
        Some(self.scanner.token)
    }
}

impl<F: Format> FusedIterator for Tokens<'_, '_, F> {}

#[cfg(test)]
mod tests;
