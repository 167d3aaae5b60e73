//! YAML subset scanner.
//!
//! Covers block mappings and sequences, flow collections, quoted strings,
//! comments and plain scalars classified by [`classify_value`]. Block
//! scalars, anchors, aliases and tags are not recognized; they scan as plain
//! scalars.
//!
//! # Keys and values
//!
//! A plain run is read first and then disambiguated: the scanner probes past
//! trailing spaces and tabs (never past a line break) for a `:` indicator
//! and rewinds. A following `:` makes the run a [`Key`](YamlKind::Key).
//!
//! A `key:` or `-` without a value on its own line keeps its state
//! ([`AfterColon`](YamlState::AfterColon), [`AfterDash`](YamlState::AfterDash))
//! across line breaks, so an indented run on a following line is its value.
//! Any other colon-less run in block content is reported as a key missing its
//! colon.
//!
//! # Restarting
//!
//! The state alone is enough to restart a scan except inside a quoted string,
//! inside a comment that follows a `key:` or `-`, and inside nested flow
//! collections: a flow state implies one open collection of its kind.

use inlay_core::constants::{
    is_inline_whitespace, is_line_break, is_whitespace, COLON, COMMA, DASH, DOUBLE_QUOTE, HASH,
    LEFT_BRACE, LEFT_BRACKET, RIGHT_BRACE, RIGHT_BRACKET, SINGLE_QUOTE, TAB, SPACE,
    YAML_BOOLEAN_LITERALS, YAML_NULL_LITERALS, YAML_SPECIAL_FLOATS,
};
use inlay_core::{token_set, CharacterStream, Format, ScanContext, Scanner};

pub const MISSING_COLON: &str = "Expected ':' after key";

token_set! {
    /// Token kinds produced by [`Yaml`].
    pub enum YamlKind: TokenKind(eos = Eos, unknown = Unknown) {
        Key,
        Colon,
        Dash,
        ArrayOpen,
        ArrayClose,
        ObjectOpen,
        ObjectClose,
        Comma,
        Newline,
        Whitespace,
        StartString,
        String,
        EndString,
        ScalarString,
        ScalarNumber,
        ScalarBoolean,
        ScalarNull,
        /// Empty scalar.
        Value,
        StartComment,
        Comment,
        Unknown,
        Eos,
    }
}

token_set! {
    /// Lexical states of [`Yaml`].
    pub enum YamlState: ScannerState {
        WithinContent,
        AfterKey,
        AfterColon,
        AfterDash,
        WithinValue,
        WithinString,
        WithinComment,
        WithinFlowSequence,
        WithinFlowMapping,
    }
}

/// Auxiliary context of the YAML scanner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Yaml {
    flow_sequence_depth: u32,
    flow_mapping_depth: u32,
    /// State restored by the closing quote.
    return_state_after_string: Option<YamlState>,
    string_quote: u8,
    /// State restored at the end of a comment, when it differs from
    /// [`context_state`](Yaml::context_state).
    return_state_after_comment: Option<YamlState>,
}

pub type YamlScanner<'src> = Scanner<'src, Yaml>;

impl Yaml {
    pub fn flow_sequence_depth(&self) -> u32 {
        self.flow_sequence_depth
    }

    pub fn flow_mapping_depth(&self) -> u32 {
        self.flow_mapping_depth
    }

    fn in_flow(&self) -> bool {
        self.flow_sequence_depth > 0 || self.flow_mapping_depth > 0
    }

    /// State to continue in outside of a key/value: the open flow
    /// collection, sequences first, or block content.
    fn context_state(&self) -> YamlState {
        if self.flow_sequence_depth > 0 {
            YamlState::WithinFlowSequence
        } else if self.flow_mapping_depth > 0 {
            YamlState::WithinFlowMapping
        } else {
            YamlState::WithinContent
        }
    }

    /// Returns `true` if a `:` followed by `next` is a mapping indicator.
    fn is_colon_indicator(&self, next: u8) -> bool {
        next == 0
            || is_whitespace(next)
            || (self.in_flow() && matches!(next, COMMA | LEFT_BRACKET | RIGHT_BRACKET | LEFT_BRACE | RIGHT_BRACE))
    }

    fn at_colon_indicator(&self, stream: &CharacterStream<'_>) -> bool {
        stream.peek_char(0) == COLON && self.is_colon_indicator(stream.peek_char(1))
    }

    /// A flow state implies at least one open collection of its kind, even
    /// when the scan was restarted there with a fresh context.
    fn sync_flow_depth(&mut self, state: YamlState) {
        match state {
            YamlState::WithinFlowSequence if self.flow_sequence_depth == 0 => self.flow_sequence_depth = 1,
            YamlState::WithinFlowMapping if self.flow_mapping_depth == 0 => self.flow_mapping_depth = 1,
            _ => {}
        }
    }
}

impl Format for Yaml {
    type Kind = YamlKind;
    type State = YamlState;

    const INITIAL_STATE: YamlState = YamlState::WithinContent;

    fn scan(&mut self, cx: &mut ScanContext<'_, '_, YamlState>) -> YamlKind {
        self.sync_flow_depth(cx.state());
        loop {
            match cx.state() {
                YamlState::WithinString => return self.string_content(cx),
                YamlState::WithinComment => {
                    let restored = self
                        .return_state_after_comment
                        .take()
                        .unwrap_or_else(|| self.context_state());
                    cx.set_state(restored);
                    cx.stream.advance_until_line_break();
                    if cx.has_progress() {
                        return YamlKind::Comment;
                    }
                    // Nothing left on the line; rescan in the restored state.
                }
                YamlState::AfterKey => return self.after_key(cx),
                _ => return self.content(cx),
            }
        }
    }
}

impl Yaml {
    // ─── Shared Content Dispatch ──────────────────────────────────

    fn content(&mut self, cx: &mut ScanContext<'_, '_, YamlState>) -> YamlKind {
        let state = cx.state();
        let b = cx.stream.peek_char(0);

        if is_line_break(b) {
            return self.newline(cx);
        }
        if cx.stream.skip_whitespace_only() {
            return YamlKind::Whitespace;
        }
        if b == HASH && at_token_boundary(cx.stream) {
            return self.start_comment(cx);
        }

        match b {
            LEFT_BRACKET => {
                cx.stream.advance(1);
                self.flow_sequence_depth += 1;
                cx.set_state(YamlState::WithinFlowSequence);
                return YamlKind::ArrayOpen;
            }
            LEFT_BRACE => {
                cx.stream.advance(1);
                self.flow_mapping_depth += 1;
                cx.set_state(YamlState::WithinFlowMapping);
                return YamlKind::ObjectOpen;
            }
            RIGHT_BRACKET | RIGHT_BRACE | COMMA if self.in_flow() => {
                cx.stream.advance(1);
                let kind = match b {
                    RIGHT_BRACKET => {
                        self.flow_sequence_depth = self.flow_sequence_depth.saturating_sub(1);
                        YamlKind::ArrayClose
                    }
                    RIGHT_BRACE => {
                        self.flow_mapping_depth = self.flow_mapping_depth.saturating_sub(1);
                        YamlKind::ObjectClose
                    }
                    _ => YamlKind::Comma,
                };
                cx.set_state(self.context_state());
                return kind;
            }
            COLON
                if self.is_colon_indicator(cx.stream.peek_char(1))
                    || (self.in_flow() && matches!(cx.stream.prev_char(), DOUBLE_QUOTE | SINGLE_QUOTE)) =>
            {
                return self.colon(cx);
            }
            DASH if is_indicator_end(cx.stream.peek_char(1))
                && match state {
                    YamlState::WithinContent | YamlState::AfterDash => true,
                    YamlState::AfterColon => first_on_line(cx.stream),
                    _ => false,
                } =>
            {
                cx.stream.advance(1);
                cx.set_state(YamlState::AfterDash);
                return YamlKind::Dash;
            }
            DOUBLE_QUOTE | SINGLE_QUOTE => {
                cx.stream.advance(1);
                self.string_quote = b;
                self.return_state_after_string = Some(if self.in_flow() {
                    self.context_state()
                } else {
                    YamlState::WithinValue
                });
                cx.set_state(YamlState::WithinString);
                return YamlKind::StartString;
            }
            _ => {}
        }

        self.plain_run(cx)
    }

    /// A `key:` or `-` still waiting for its value keeps waiting on the
    /// next line.
    fn newline(&mut self, cx: &mut ScanContext<'_, '_, YamlState>) -> YamlKind {
        cx.stream.advance_line_break();
        if !awaits_block_value(cx.state()) {
            cx.set_state(self.context_state());
        }
        YamlKind::Newline
    }

    fn start_comment(&mut self, cx: &mut ScanContext<'_, '_, YamlState>) -> YamlKind {
        cx.stream.advance(1);
        let state = cx.state();
        let restored = if awaits_block_value(state) {
            state
        } else {
            self.context_state()
        };
        if cx.stream.eos() || is_line_break(cx.stream.peek_char(0)) {
            cx.set_state(restored);
        } else {
            self.return_state_after_comment = awaits_block_value(state).then_some(state);
            cx.set_state(YamlState::WithinComment);
        }
        YamlKind::StartComment
    }

    fn colon(&mut self, cx: &mut ScanContext<'_, '_, YamlState>) -> YamlKind {
        cx.stream.advance(1);
        if self.in_flow() {
            cx.set_state(self.context_state());
        } else {
            cx.set_state(YamlState::AfterColon);
        }
        YamlKind::Colon
    }

    // ─── Keys and Plain Scalars ───────────────────────────────────

    fn plain_run(&mut self, cx: &mut ScanContext<'_, '_, YamlState>) -> YamlKind {
        let state = cx.state();
        let line_start = cx.stream.at_line_start();
        self.eat_plain_run(cx.stream);

        let saved = cx.stream.pos();
        cx.stream.skip_whitespace_only();
        let is_key = self.at_colon_indicator(cx.stream);
        cx.stream.go_back_to(saved);

        // Inside flow collections keys and values stay in the flow state.
        if is_key {
            if !self.in_flow() {
                cx.set_state(YamlState::AfterKey);
            }
            return YamlKind::Key;
        }

        let missing_colon = match state {
            YamlState::WithinContent => true,
            YamlState::AfterColon | YamlState::AfterDash => line_start,
            _ => false,
        };
        if missing_colon {
            cx.set_state(YamlState::WithinContent);
            return cx.finish_with_error(YamlKind::Unknown, MISSING_COLON);
        }

        if !self.in_flow() {
            cx.set_state(YamlState::WithinValue);
        }
        classify_value(cx.token_text())
    }

    /// Consumes a plain run, excluding trailing spaces and tabs.
    fn eat_plain_run(&self, stream: &mut CharacterStream<'_>) {
        let flow = self.in_flow();
        let mut content_end = stream.pos();
        while !stream.eos() {
            let b = stream.peek_char(0);
            if is_line_break(b)
                || (b == COLON && self.is_colon_indicator(stream.peek_char(1)))
                || (b == HASH && is_inline_whitespace(stream.prev_char()))
                || (flow && matches!(b, COMMA | LEFT_BRACKET | RIGHT_BRACKET | LEFT_BRACE | RIGHT_BRACE))
            {
                break;
            }
            if is_inline_whitespace(b) {
                stream.advance(1);
            } else {
                stream.advance_char();
                content_end = stream.pos();
            }
        }
        stream.go_back_to(content_end);
    }

    fn after_key(&mut self, cx: &mut ScanContext<'_, '_, YamlState>) -> YamlKind {
        let b = cx.stream.peek_char(0);
        if cx.stream.skip_whitespace_only() {
            return YamlKind::Whitespace;
        }
        if b == COLON {
            return self.colon(cx);
        }
        if is_line_break(b) {
            cx.stream.advance_line_break();
            cx.set_state(self.context_state());
            return cx.finish_with_error(YamlKind::Newline, MISSING_COLON);
        }
        cx.stream.advance_char();
        cx.set_state(self.context_state());
        cx.finish_with_error(YamlKind::Unknown, MISSING_COLON)
    }

    // ─── Quoted Strings ───────────────────────────────────────────

    fn string_content(&mut self, cx: &mut ScanContext<'_, '_, YamlState>) -> YamlKind {
        let quote = self.string_quote;
        if !cx.stream.eos() && cx.stream.peek_char(0) == quote && !is_escaped_quote(cx.stream, quote) {
            cx.stream.advance(1);
            cx.set_state(
                self.return_state_after_string
                    .take()
                    .unwrap_or(YamlState::WithinValue),
            );
            return YamlKind::EndString;
        }

        while cx.stream.advance_until_char(&[quote]) {
            if is_escaped_quote(cx.stream, quote) {
                cx.stream.advance(2);
            } else {
                break;
            }
        }
        YamlKind::String
    }
}

/// `''` inside a single-quoted string is one literal quote.
fn is_escaped_quote(stream: &CharacterStream<'_>, quote: u8) -> bool {
    quote == SINGLE_QUOTE && stream.peek_char(1) == SINGLE_QUOTE
}

/// `-`, `?` and `:` act as indicators only when followed by a blank.
fn is_indicator_end(next: u8) -> bool {
    next == 0 || is_whitespace(next)
}

fn awaits_block_value(state: YamlState) -> bool {
    matches!(state, YamlState::AfterColon | YamlState::AfterDash)
}

/// Only spaces and tabs precede the cursor on its line.
fn first_on_line(stream: &CharacterStream<'_>) -> bool {
    let before = &stream.text().as_bytes()[..stream.pos() as usize];
    before
        .iter()
        .rev()
        .take_while(|&&b| !is_line_break(b))
        .all(|&b| is_inline_whitespace(b))
}

fn at_token_boundary(stream: &CharacterStream<'_>) -> bool {
    stream.at_line_start() || matches!(stream.prev_char(), SPACE | TAB)
}

// ─── Scalar Classification ────────────────────────────────────────

/// Classifies a plain scalar.
///
/// ```
/// use inlay_formats::yaml::{classify_value, YamlKind};
///
/// assert_eq!(classify_value("true"), YamlKind::ScalarBoolean);
/// assert_eq!(classify_value("42"), YamlKind::ScalarNumber);
/// assert_eq!(classify_value("null"), YamlKind::ScalarNull);
/// assert_eq!(classify_value("hello"), YamlKind::ScalarString);
/// ```
pub fn classify_value(text: &str) -> YamlKind {
    if text.is_empty() {
        YamlKind::Value
    } else if YAML_NULL_LITERALS.contains(&text) {
        YamlKind::ScalarNull
    } else if YAML_BOOLEAN_LITERALS.contains(&text) {
        YamlKind::ScalarBoolean
    } else if is_number(text) || YAML_SPECIAL_FLOATS.contains(&text) {
        YamlKind::ScalarNumber
    } else {
        YamlKind::ScalarString
    }
}

/// Decimal (`-1.5e3`, `.5`, `3.`), hexadecimal (`0x1F`) or octal (`0o17`).
fn is_number(text: &str) -> bool {
    if let Some(hex) = text.strip_prefix("0x") {
        return !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    if let Some(octal) = text.strip_prefix("0o") {
        return !octal.is_empty() && octal.bytes().all(|b| (b'0'..=b'7').contains(&b));
    }

    let bytes = text.as_bytes();
    let mut i = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));

    let integer = count_digits(&bytes[i..]);
    i += integer;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let fraction = count_digits(&bytes[i..]);
        if integer == 0 && fraction == 0 {
            return false;
        }
        i += fraction;
    } else if integer == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'-' | b'+')) {
            i += 1;
        }
        let exponent = count_digits(&bytes[i..]);
        if exponent == 0 {
            return false;
        }
        i += exponent;
    }

    i == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
