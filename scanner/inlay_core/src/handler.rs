//! Boundary to external tree builders.
//!
//! Scanners do not build trees. A builder implements [`TokenSink`] and is
//! fed every token by [`drive`]; format-specific handlers with structural
//! events live next to their formats.

use crate::engine::{Format, Scanner};
use crate::token::{Token, TokenKind};

/// Receives the token stream of one scan.
pub trait TokenSink<K> {
    /// Called for every token before `EOS`. `text` is the token's source
    /// slice.
    fn token(&mut self, token: Token<K>, text: &str);

    /// Called once with the `EOS` token.
    fn finish(&mut self, eos: Token<K>) {
        let _ = eos;
    }
}

impl<K> TokenSink<K> for Vec<Token<K>> {
    fn token(&mut self, token: Token<K>, _text: &str) {
        self.push(token);
    }

    fn finish(&mut self, eos: Token<K>) {
        self.push(eos);
    }
}

/// Feeds every remaining token of `scanner` to `sink`.
pub fn drive<F, S>(scanner: &mut Scanner<'_, F>, sink: &mut S)
where
    F: Format,
    S: TokenSink<F::Kind> + ?Sized,
{
    let text = scanner.text();
    for token in scanner.tokens() {
        if token.kind == F::Kind::EOS {
            sink.finish(token);
        } else {
            sink.token(token, token.text(text));
        }
    }
}
