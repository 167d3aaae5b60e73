//! Scanner for the inside of a template expression.
//!
//! Runs over the range of an `ExpressionContent` token, e.g. the
//! `inject:bean.find(id, 'x') or default` of `{inject:bean.find(id, 'x') or default}`:
//!
//! - `inject` is a namespace part, followed by a colon;
//! - `bean` is the object part, `find` a method part with bracketed
//!   parameters;
//! - `or` is an infix method and `default` its parameter.

use inlay_core::constants::{
    is_whitespace, BACKSLASH, COLON, COMMA, DOT, DOUBLE_QUOTE, LEFT_PAREN, RIGHT_PAREN,
    SINGLE_QUOTE,
};
use inlay_core::{token_set, CharacterStream, Format, ScanContext, Scanner};

token_set! {
    /// Token kinds produced by [`Expression`].
    pub enum ExpressionKind: TokenKind(eos = Eos, unknown = Unknown) {
        NamespacePart,
        Colon,
        ObjectPart,
        Dot,
        PropertyPart,
        MethodPart,
        OpenBracket,
        CloseBracket,
        Comma,
        Parameter,
        InfixMethodPart,
        InfixParameter,
        StartString,
        String,
        EndString,
        Whitespace,
        Unknown,
        Eos,
    }
}

token_set! {
    /// Lexical states of [`Expression`].
    pub enum ExpressionState: ScannerState {
        WithinExpression,
        WithinParts,
        AfterDot,
        WithinMethodParameters,
        AfterInfixMethod,
        WithinString,
    }
}

/// Auxiliary context of the expression scanner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expression {
    paren_depth: u32,
    string_quote: u8,
    return_state_after_string: Option<ExpressionState>,
}

pub type ExpressionScanner<'src> = Scanner<'src, Expression>;

impl Format for Expression {
    type Kind = ExpressionKind;
    type State = ExpressionState;

    const INITIAL_STATE: ExpressionState = ExpressionState::WithinExpression;

    fn scan(&mut self, cx: &mut ScanContext<'_, '_, ExpressionState>) -> ExpressionKind {
        let state = cx.state();
        if state == ExpressionState::WithinString {
            return self.string_content(cx);
        }

        let b = cx.stream.peek_char(0);
        let after_blank = is_whitespace(cx.stream.prev_char());
        if cx.stream.skip_whitespace() {
            return ExpressionKind::Whitespace;
        }
        if b == DOUBLE_QUOTE || b == SINGLE_QUOTE {
            return self.start_string(cx);
        }

        match state {
            ExpressionState::WithinExpression => {
                if eat_part(cx.stream) {
                    if cx.stream.peek_char(0) == COLON {
                        return ExpressionKind::NamespacePart;
                    }
                    cx.set_state(ExpressionState::WithinParts);
                    return part_or_method(cx.stream, ExpressionKind::ObjectPart);
                }
                if b == COLON {
                    cx.stream.advance(1);
                    return ExpressionKind::Colon;
                }
            }
            ExpressionState::WithinParts => match b {
                DOT => {
                    cx.stream.advance(1);
                    cx.set_state(ExpressionState::AfterDot);
                    return ExpressionKind::Dot;
                }
                COLON => {
                    cx.stream.advance(1);
                    cx.set_state(ExpressionState::WithinExpression);
                    return ExpressionKind::Colon;
                }
                LEFT_PAREN => return self.open_bracket(cx),
                _ if after_blank => {
                    cx.stream.advance_while_char(|b| !is_whitespace(b));
                    cx.set_state(ExpressionState::AfterInfixMethod);
                    return ExpressionKind::InfixMethodPart;
                }
                _ => {}
            },
            ExpressionState::AfterDot => {
                cx.set_state(ExpressionState::WithinParts);
                if eat_part(cx.stream) {
                    return part_or_method(cx.stream, ExpressionKind::PropertyPart);
                }
            }
            ExpressionState::WithinMethodParameters => match b {
                COMMA => {
                    cx.stream.advance(1);
                    return ExpressionKind::Comma;
                }
                LEFT_PAREN => return self.open_bracket(cx),
                RIGHT_PAREN => {
                    cx.stream.advance(1);
                    self.paren_depth = self.paren_depth.saturating_sub(1);
                    if self.paren_depth == 0 {
                        cx.set_state(ExpressionState::WithinParts);
                    }
                    return ExpressionKind::CloseBracket;
                }
                _ => {
                    cx.stream.advance_while_char(|b| {
                        !is_whitespace(b)
                            && !matches!(b, COMMA | LEFT_PAREN | RIGHT_PAREN | DOUBLE_QUOTE | SINGLE_QUOTE)
                    });
                    return ExpressionKind::Parameter;
                }
            },
            ExpressionState::AfterInfixMethod => {
                cx.stream.advance_while_char(|b| !is_whitespace(b));
                cx.set_state(ExpressionState::WithinParts);
                return ExpressionKind::InfixParameter;
            }
            ExpressionState::WithinString => {}
        }

        cx.stream.advance_char();
        ExpressionKind::Unknown
    }
}

impl Expression {
    fn open_bracket(&mut self, cx: &mut ScanContext<'_, '_, ExpressionState>) -> ExpressionKind {
        cx.stream.advance(1);
        self.paren_depth += 1;
        cx.set_state(ExpressionState::WithinMethodParameters);
        ExpressionKind::OpenBracket
    }

    fn start_string(&mut self, cx: &mut ScanContext<'_, '_, ExpressionState>) -> ExpressionKind {
        self.string_quote = cx.stream.peek_char(0);
        cx.stream.advance(1);
        let return_state = match cx.state() {
            ExpressionState::WithinMethodParameters => ExpressionState::WithinMethodParameters,
            _ => ExpressionState::WithinParts,
        };
        self.return_state_after_string = Some(return_state);
        cx.set_state(ExpressionState::WithinString);
        ExpressionKind::StartString
    }

    fn string_content(&mut self, cx: &mut ScanContext<'_, '_, ExpressionState>) -> ExpressionKind {
        let quote = self.string_quote;
        if cx.stream.advance_if_char(quote) {
            cx.set_state(
                self.return_state_after_string
                    .take()
                    .unwrap_or(ExpressionState::WithinParts),
            );
            return ExpressionKind::EndString;
        }
        while cx.stream.advance_until_char(&[quote, BACKSLASH]) {
            if cx.stream.peek_char(0) == quote {
                break;
            }
            cx.stream.advance(1);
            cx.stream.advance_char();
        }
        ExpressionKind::String
    }
}

fn is_part_char(b: u8) -> bool {
    !is_whitespace(b)
        && !matches!(
            b,
            DOT | COLON | COMMA | LEFT_PAREN | RIGHT_PAREN | DOUBLE_QUOTE | SINGLE_QUOTE | b'[' | b']'
        )
}

fn eat_part(stream: &mut CharacterStream<'_>) -> bool {
    stream.advance_while_char(is_part_char) > 0
}

/// A part directly followed by `(` is a method.
fn part_or_method(stream: &CharacterStream<'_>, part: ExpressionKind) -> ExpressionKind {
    if stream.peek_char(0) == LEFT_PAREN {
        ExpressionKind::MethodPart
    } else {
        part
    }
}
