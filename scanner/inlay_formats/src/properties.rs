//! `.properties` scanner with `${...}` property expressions.
//!
//! Follows the Java properties rules: a key ends at unescaped whitespace,
//! `=`, `:` or a line break, and a value runs to the end of the line unless
//! the line ends in a backslash. Values may embed nested expressions of the
//! form `${name:default}`.

mod handler;

use inlay_core::constants::{
    is_inline_whitespace, is_line_break, BACKSLASH, BANG, COLON, DOLLAR, DOT, EQUALS, FORM_FEED,
    HASH, LEFT_BRACE, PERCENT, RIGHT_BRACE,
};
use inlay_core::{token_set, CharacterStream, Format, ScanContext, Scanner};

pub use handler::{parse_properties, PropertiesHandler};

pub const MISSING_EXPRESSION_CLOSE: &str = "Missing '}' to close property expression";

token_set! {
    /// Token kinds produced by [`Properties`].
    pub enum PropertiesKind: TokenKind(eos = Eos, unknown = Unknown) {
        Comment,
        Key,
        /// `=` or `:` between key and value.
        Delimiter,
        Value,
        /// Backslash followed by a line break inside a value.
        LineContinuation,
        ExpressionStart,
        ExpressionReference,
        ExpressionDefaultDelimiter,
        ExpressionEnd,
        Whitespace,
        Newline,
        Unknown,
        Eos,
    }
}

token_set! {
    /// Lexical states of [`Properties`].
    pub enum PropertiesState: ScannerState {
        WithinContent,
        AfterKey,
        AfterDelimiter,
        WithinValue,
        WithinExpression,
    }
}

/// Part of an open `${...}` expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExpressionPart {
    Reference,
    Default,
}

/// Auxiliary context: the stack of open expressions, innermost last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties {
    open_expressions: Vec<ExpressionPart>,
}

pub type PropertiesScanner<'src> = Scanner<'src, Properties>;

impl Properties {
    /// Number of `${` not yet closed.
    pub fn expression_depth(&self) -> usize {
        self.open_expressions.len()
    }
}

impl Format for Properties {
    type Kind = PropertiesKind;
    type State = PropertiesState;

    const INITIAL_STATE: PropertiesState = PropertiesState::WithinContent;

    fn scan(&mut self, cx: &mut ScanContext<'_, '_, PropertiesState>) -> PropertiesKind {
        loop {
            let b = cx.stream.peek_char(0);
            match cx.state() {
                PropertiesState::WithinContent => {
                    if is_line_break(b) {
                        cx.stream.advance_line_break();
                        return PropertiesKind::Newline;
                    }
                    if skip_blank(cx.stream) {
                        return PropertiesKind::Whitespace;
                    }
                    if b == HASH || b == BANG {
                        cx.stream.advance_until_line_break();
                        return PropertiesKind::Comment;
                    }
                    if b == EQUALS || b == COLON {
                        // Empty key.
                        cx.stream.advance(1);
                        cx.set_state(PropertiesState::AfterDelimiter);
                        return PropertiesKind::Delimiter;
                    }
                    if at_continuation(cx.stream) {
                        cx.stream.advance(1);
                        cx.stream.advance_line_break();
                        return PropertiesKind::LineContinuation;
                    }
                    eat_key(cx.stream);
                    cx.set_state(PropertiesState::AfterKey);
                    return PropertiesKind::Key;
                }
                PropertiesState::AfterKey => {
                    if is_line_break(b) {
                        return newline(cx);
                    }
                    if skip_blank(cx.stream) {
                        return PropertiesKind::Whitespace;
                    }
                    if b == EQUALS || b == COLON {
                        cx.stream.advance(1);
                        cx.set_state(PropertiesState::AfterDelimiter);
                        return PropertiesKind::Delimiter;
                    }
                    // Whitespace alone separates key and value.
                    cx.set_state(PropertiesState::WithinValue);
                }
                PropertiesState::AfterDelimiter => {
                    if is_line_break(b) {
                        return newline(cx);
                    }
                    if skip_blank(cx.stream) {
                        return PropertiesKind::Whitespace;
                    }
                    cx.set_state(PropertiesState::WithinValue);
                }
                PropertiesState::WithinValue => return self.value(cx),
                PropertiesState::WithinExpression => return self.expression(cx),
            }
        }
    }
}

impl Properties {
    fn value(&mut self, cx: &mut ScanContext<'_, '_, PropertiesState>) -> PropertiesKind {
        let b = cx.stream.peek_char(0);
        if is_line_break(b) {
            return newline(cx);
        }
        if at_continuation(cx.stream) {
            cx.stream.advance(1);
            cx.stream.advance_line_break();
            return PropertiesKind::LineContinuation;
        }
        // Leading blanks of a continued line are not part of the value.
        if cx.stream.at_line_start() && skip_blank(cx.stream) {
            return PropertiesKind::Whitespace;
        }
        if self.start_expression(cx.stream) {
            cx.set_state(PropertiesState::WithinExpression);
            return PropertiesKind::ExpressionStart;
        }
        eat_value(cx.stream, false);
        PropertiesKind::Value
    }

    fn expression(&mut self, cx: &mut ScanContext<'_, '_, PropertiesState>) -> PropertiesKind {
        let b = cx.stream.peek_char(0);
        if is_line_break(b) {
            self.open_expressions.clear();
            cx.stream.advance_line_break();
            cx.set_state(PropertiesState::WithinContent);
            return cx.finish_with_error(PropertiesKind::Newline, MISSING_EXPRESSION_CLOSE);
        }
        if at_continuation(cx.stream) {
            cx.stream.advance(1);
            cx.stream.advance_line_break();
            return PropertiesKind::LineContinuation;
        }
        if b == RIGHT_BRACE {
            cx.stream.advance(1);
            self.open_expressions.pop();
            if self.open_expressions.is_empty() {
                cx.set_state(PropertiesState::WithinValue);
            }
            return PropertiesKind::ExpressionEnd;
        }
        if self.start_expression(cx.stream) {
            return PropertiesKind::ExpressionStart;
        }

        match self.open_expressions.last_mut() {
            Some(part @ ExpressionPart::Reference) => {
                if b == COLON {
                    cx.stream.advance(1);
                    *part = ExpressionPart::Default;
                    return PropertiesKind::ExpressionDefaultDelimiter;
                }
                eat_reference(cx.stream);
                PropertiesKind::ExpressionReference
            }
            Some(ExpressionPart::Default) => {
                eat_value(cx.stream, true);
                PropertiesKind::Value
            }
            // Restarted in this state without context.
            None => {
                self.open_expressions.push(ExpressionPart::Reference);
                self.expression(cx)
            }
        }
    }

    fn start_expression(&mut self, stream: &mut CharacterStream<'_>) -> bool {
        if stream.peek_char(0) == DOLLAR && stream.peek_char(1) == LEFT_BRACE {
            stream.advance(2);
            self.open_expressions.push(ExpressionPart::Reference);
            true
        } else {
            false
        }
    }
}

fn newline(cx: &mut ScanContext<'_, '_, PropertiesState>) -> PropertiesKind {
    cx.stream.advance_line_break();
    cx.set_state(PropertiesState::WithinContent);
    PropertiesKind::Newline
}

fn is_blank(b: u8) -> bool {
    is_inline_whitespace(b) || b == FORM_FEED
}

fn skip_blank(stream: &mut CharacterStream<'_>) -> bool {
    stream.advance_while_char(is_blank) > 0
}

fn at_continuation(stream: &CharacterStream<'_>) -> bool {
    stream.peek_char(0) == BACKSLASH && is_line_break(stream.peek_char(1))
}

/// Consumes a key up to unescaped whitespace, `=`, `:` or a line break.
fn eat_key(stream: &mut CharacterStream<'_>) {
    while !stream.eos() {
        let b = stream.peek_char(0);
        if is_blank(b) || is_line_break(b) || b == EQUALS || b == COLON {
            break;
        }
        if b == BACKSLASH {
            if at_continuation(stream) {
                break;
            }
            stream.advance(1);
        }
        stream.advance_char();
    }
}

/// Consumes value text up to a line break, a continuation or `${`; inside
/// an expression default also up to `}`.
fn eat_value(stream: &mut CharacterStream<'_>, in_expression: bool) {
    while !stream.eos() {
        let b = stream.peek_char(0);
        if is_line_break(b)
            || at_continuation(stream)
            || (b == DOLLAR && stream.peek_char(1) == LEFT_BRACE)
            || (in_expression && b == RIGHT_BRACE)
        {
            break;
        }
        if b == BACKSLASH {
            stream.advance(1);
        }
        stream.advance_char();
    }
}

fn eat_reference(stream: &mut CharacterStream<'_>) {
    while !stream.eos() {
        let b = stream.peek_char(0);
        if is_line_break(b)
            || at_continuation(stream)
            || b == RIGHT_BRACE
            || b == COLON
            || (b == DOLLAR && stream.peek_char(1) == LEFT_BRACE)
        {
            break;
        }
        stream.advance_char();
    }
}

/// Splits a `%profile.name` key into its profile and property name.
///
/// ```
/// use inlay_formats::properties::split_profile;
///
/// assert_eq!(split_profile("%dev.quarkus.http.port"), (Some("dev"), "quarkus.http.port"));
/// assert_eq!(split_profile("quarkus.http.port"), (None, "quarkus.http.port"));
/// assert_eq!(split_profile("%test"), (Some("test"), ""));
/// ```
pub fn split_profile(key: &str) -> (Option<&str>, &str) {
    let Some(rest) = key.strip_prefix(PERCENT as char) else {
        return (None, key);
    };
    match rest.split_once(DOT as char) {
        Some((profile, name)) => (Some(profile), name),
        None => (Some(rest), ""),
    }
}
