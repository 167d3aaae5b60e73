//! HTML scanner.
//!
//! Covers what template hosts need from HTML: tags, attributes, comments,
//! doctypes and raw text. The bodies of `<script>` and `<style>` elements are
//! emitted as single `Script` / `Styles` runs up to their close tag. A
//! script whose `type` declares an HTML template is scanned as ordinary
//! content instead.

use inlay_core::constants::{
    is_whitespace, BACKTICK, BANG, DASH, DOUBLE_QUOTE, EQUALS, GREATER_THAN, LESS_THAN,
    SINGLE_QUOTE, SLASH,
};
use inlay_core::{token_set, CharacterStream, Format, ScanContext, Scanner};

pub const TAG_NAME_MUST_FOLLOW: &str = "Tag name must directly follow the open bracket.";
pub const START_TAG_NAME_EXPECTED: &str = "Start tag name expected.";
pub const END_TAG_NAME_EXPECTED: &str = "End tag name expected.";
pub const CLOSING_BRACKET_EXPECTED: &str = "Closing bracket expected.";
pub const UNEXPECTED_CHARACTER_IN_TAG: &str = "Unexpected character in tag.";

/// `type` values of scripts whose body is HTML rather than code.
const HTML_SCRIPT_TYPES: [&str; 2] = ["text/html", "text/x-handlebars-template"];

token_set! {
    /// Token kinds produced by [`Html`].
    pub enum HtmlKind: TokenKind(eos = Eos, unknown = Unknown) {
        StartCommentTag,
        Comment,
        EndCommentTag,
        StartTagOpen,
        StartTagClose,
        StartTagSelfClose,
        StartTag,
        EndTagOpen,
        EndTagClose,
        EndTag,
        DelimiterAssign,
        AttributeName,
        AttributeValue,
        StartDoctypeTag,
        Doctype,
        EndDoctypeTag,
        Content,
        Whitespace,
        Unknown,
        Script,
        Styles,
        Eos,
    }
}

token_set! {
    /// Lexical states of [`Html`].
    pub enum HtmlState: ScannerState {
        WithinContent,
        AfterOpeningStartTag,
        WithinTag,
        AfterOpeningEndTag,
        WithinEndTag,
        WithinComment,
        WithinDoctype,
        AfterAttributeName,
        BeforeAttributeValue,
        WithinScriptContent,
        WithinStyleContent,
    }
}

/// Element whose start tag is being scanned, as far as raw text is
/// concerned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum RawTextTag {
    #[default]
    None,
    Script,
    Style,
}

/// Auxiliary context of the HTML scanner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Html {
    last_tag: RawTextTag,
    last_attribute_is_type: bool,
    script_holds_html: bool,
    has_space_after_tag: bool,
}

pub type HtmlScanner<'src> = Scanner<'src, Html>;

impl Format for Html {
    type Kind = HtmlKind;
    type State = HtmlState;

    const INITIAL_STATE: HtmlState = HtmlState::WithinContent;

    fn scan(&mut self, cx: &mut ScanContext<'_, '_, HtmlState>) -> HtmlKind {
        loop {
            match cx.state() {
                HtmlState::WithinComment => {
                    if cx.stream.advance_if_chars("-->") {
                        cx.set_state(HtmlState::WithinContent);
                        return HtmlKind::EndCommentTag;
                    }
                    cx.stream.advance_until_chars("-->");
                    return HtmlKind::Comment;
                }
                HtmlState::WithinDoctype => {
                    if cx.stream.advance_if_char(GREATER_THAN) {
                        cx.set_state(HtmlState::WithinContent);
                        return HtmlKind::EndDoctypeTag;
                    }
                    cx.stream.advance_until_char(&[GREATER_THAN]);
                    return HtmlKind::Doctype;
                }
                HtmlState::WithinContent => return content(cx),
                HtmlState::AfterOpeningEndTag => {
                    if eat_element_name(cx.stream) > 0 {
                        cx.set_state(HtmlState::WithinEndTag);
                        return HtmlKind::EndTag;
                    }
                    if cx.stream.skip_whitespace() {
                        return cx.finish_with_error(HtmlKind::Whitespace, TAG_NAME_MUST_FOLLOW);
                    }
                    cx.set_state(HtmlState::WithinEndTag);
                    cx.stream.advance_until_char(&[GREATER_THAN]);
                    if cx.has_progress() {
                        return cx.finish_with_error(HtmlKind::Unknown, END_TAG_NAME_EXPECTED);
                    }
                }
                HtmlState::WithinEndTag => {
                    if cx.stream.skip_whitespace() {
                        return HtmlKind::Whitespace;
                    }
                    if cx.stream.advance_if_char(GREATER_THAN) {
                        cx.set_state(HtmlState::WithinContent);
                        return HtmlKind::EndTagClose;
                    }
                    cx.stream.advance_char();
                    return cx.finish_with_error(HtmlKind::Unknown, CLOSING_BRACKET_EXPECTED);
                }
                HtmlState::AfterOpeningStartTag => {
                    let start = cx.stream.pos();
                    let len = eat_element_name(cx.stream);
                    self.last_tag = raw_text_tag(cx.stream.slice(start, start + len));
                    self.last_attribute_is_type = false;
                    self.script_holds_html = false;
                    if len > 0 {
                        self.has_space_after_tag = false;
                        cx.set_state(HtmlState::WithinTag);
                        return HtmlKind::StartTag;
                    }
                    if cx.stream.skip_whitespace() {
                        return cx.finish_with_error(HtmlKind::Whitespace, TAG_NAME_MUST_FOLLOW);
                    }
                    cx.set_state(HtmlState::WithinTag);
                    cx.stream.advance_until_char(&[GREATER_THAN]);
                    if cx.has_progress() {
                        return cx.finish_with_error(HtmlKind::Unknown, START_TAG_NAME_EXPECTED);
                    }
                }
                HtmlState::WithinTag => return self.within_tag(cx),
                HtmlState::AfterAttributeName => {
                    if cx.stream.skip_whitespace() {
                        self.has_space_after_tag = true;
                        return HtmlKind::Whitespace;
                    }
                    if cx.stream.advance_if_char(EQUALS) {
                        cx.set_state(HtmlState::BeforeAttributeValue);
                        return HtmlKind::DelimiterAssign;
                    }
                    cx.set_state(HtmlState::WithinTag);
                }
                HtmlState::BeforeAttributeValue => {
                    if cx.stream.skip_whitespace() {
                        return HtmlKind::Whitespace;
                    }
                    cx.set_state(HtmlState::WithinTag);
                    self.has_space_after_tag = false;
                    if self.attribute_value(cx.stream) {
                        return HtmlKind::AttributeValue;
                    }
                }
                HtmlState::WithinScriptContent => {
                    eat_script(cx.stream);
                    cx.set_state(HtmlState::WithinContent);
                    if cx.has_progress() {
                        return HtmlKind::Script;
                    }
                }
                HtmlState::WithinStyleContent => {
                    eat_until_close_tag(cx.stream, "</style");
                    cx.set_state(HtmlState::WithinContent);
                    if cx.has_progress() {
                        return HtmlKind::Styles;
                    }
                }
            }
        }
    }
}

fn content(cx: &mut ScanContext<'_, '_, HtmlState>) -> HtmlKind {
    if cx.stream.advance_if_char(LESS_THAN) {
        if cx.stream.peek_char(0) == BANG {
            if cx.stream.advance_if_chars("!--") {
                cx.set_state(HtmlState::WithinComment);
                return HtmlKind::StartCommentTag;
            }
            if cx.stream.advance_if_chars_ignore_case("!doctype") {
                cx.set_state(HtmlState::WithinDoctype);
                return HtmlKind::StartDoctypeTag;
            }
        }
        if cx.stream.advance_if_char(SLASH) {
            cx.set_state(HtmlState::AfterOpeningEndTag);
            return HtmlKind::EndTagOpen;
        }
        cx.set_state(HtmlState::AfterOpeningStartTag);
        return HtmlKind::StartTagOpen;
    }
    cx.stream.advance_until_char(&[LESS_THAN]);
    HtmlKind::Content
}

impl Html {
    fn within_tag(&mut self, cx: &mut ScanContext<'_, '_, HtmlState>) -> HtmlKind {
        if cx.stream.skip_whitespace() {
            self.has_space_after_tag = true;
            return HtmlKind::Whitespace;
        }
        if self.has_space_after_tag {
            let start = cx.stream.pos();
            let len = cx.stream.advance_while_char(is_attribute_name_char);
            if len > 0 {
                self.last_attribute_is_type = cx.stream.slice(start, start + len).eq_ignore_ascii_case("type");
                self.has_space_after_tag = false;
                cx.set_state(HtmlState::AfterAttributeName);
                return HtmlKind::AttributeName;
            }
        }
        if cx.stream.advance_if_chars("/>") {
            cx.set_state(HtmlState::WithinContent);
            return HtmlKind::StartTagSelfClose;
        }
        if cx.stream.advance_if_char(GREATER_THAN) {
            let next = match self.last_tag {
                RawTextTag::Script if !self.script_holds_html => HtmlState::WithinScriptContent,
                RawTextTag::Style => HtmlState::WithinStyleContent,
                _ => HtmlState::WithinContent,
            };
            cx.set_state(next);
            return HtmlKind::StartTagClose;
        }
        cx.stream.advance_char();
        cx.finish_with_error(HtmlKind::Unknown, UNEXPECTED_CHARACTER_IN_TAG)
    }

    /// Consumes a quoted or unquoted attribute value. Returns `false` if
    /// none starts at the cursor.
    fn attribute_value(&mut self, stream: &mut CharacterStream<'_>) -> bool {
        let start = stream.pos();
        let quote = stream.peek_char(0);
        let value = if quote == DOUBLE_QUOTE || quote == SINGLE_QUOTE {
            stream.advance(1);
            if stream.advance_until_char(&[quote]) {
                stream.advance(1);
            }
            let raw = stream.slice_from(start);
            raw.strip_prefix(char::from(quote))
                .map(|inner| inner.strip_suffix(char::from(quote)).unwrap_or(inner))
                .unwrap_or(raw)
        } else {
            stream.advance_while_char(is_unquoted_value_char);
            // `<a href=foo/>`: the slash belongs to the self-close.
            if stream.peek_char(0) == GREATER_THAN && stream.prev_char() == SLASH && stream.pos() > start {
                stream.go_back(1);
            }
            stream.slice_from(start)
        };
        if stream.pos() == start {
            return false;
        }
        if self.last_attribute_is_type {
            self.script_holds_html = HTML_SCRIPT_TYPES
                .iter()
                .any(|html| value.trim().eq_ignore_ascii_case(html));
        }
        true
    }
}

fn is_element_name_start(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b':'
}

fn is_element_name_char(b: u8) -> bool {
    is_element_name_start(b) || b == DASH || b == b'.'
}

/// Consumes an element name and returns its length.
fn eat_element_name(stream: &mut CharacterStream<'_>) -> u32 {
    if !is_element_name_start(stream.peek_char(0)) {
        return 0;
    }
    stream.advance_while_char(is_element_name_char)
}

fn is_attribute_name_char(b: u8) -> bool {
    !is_whitespace(b)
        && !matches!(b, DOUBLE_QUOTE | SINGLE_QUOTE | GREATER_THAN | LESS_THAN | SLASH | EQUALS)
        && b >= 0x10
        && b != 0x7F
}

fn is_unquoted_value_char(b: u8) -> bool {
    !is_whitespace(b)
        && !matches!(b, DOUBLE_QUOTE | SINGLE_QUOTE | BACKTICK | EQUALS | LESS_THAN | GREATER_THAN)
}

fn raw_text_tag(name: &str) -> RawTextTag {
    if name.eq_ignore_ascii_case("script") {
        RawTextTag::Script
    } else if name.eq_ignore_ascii_case("style") {
        RawTextTag::Style
    } else {
        RawTextTag::None
    }
}

// ─── Raw Text ─────────────────────────────────────────────────────

/// Consumes up to, not including, the first case-insensitive `close`.
fn eat_until_close_tag(stream: &mut CharacterStream<'_>, close: &str) {
    while stream.advance_until_char(&[LESS_THAN]) {
        let at = stream.pos();
        if stream.advance_if_chars_ignore_case(close) {
            stream.go_back_to(at);
            return;
        }
        stream.advance(1);
    }
}

/// Where a script body stands with respect to `<!--` escapes.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ScriptEscape {
    Outside,
    InComment,
    InNestedScript,
}

/// Consumes a script body up to its `</script`. Inside a `<!--` escape a
/// nested `<script>` must be closed before the body can end.
fn eat_script(stream: &mut CharacterStream<'_>) {
    let mut escape = ScriptEscape::Outside;
    while stream.advance_until_char(&[LESS_THAN, DASH]) {
        if stream.advance_if_chars("<!--") {
            if escape == ScriptEscape::Outside {
                escape = ScriptEscape::InComment;
            }
        } else if stream.advance_if_chars("-->") {
            escape = ScriptEscape::Outside;
        } else if let Some((len, closing)) = script_tag_at(stream) {
            if !closing {
                if escape == ScriptEscape::InComment {
                    escape = ScriptEscape::InNestedScript;
                }
            } else if escape == ScriptEscape::InNestedScript {
                escape = ScriptEscape::InComment;
            } else {
                return;
            }
            stream.advance(len);
        } else {
            stream.advance(1);
        }
    }
}

/// Length of a `<script ...>` or `</script ...>` tag at the cursor, and
/// whether it closes.
fn script_tag_at(stream: &CharacterStream<'_>) -> Option<(u32, bool)> {
    if stream.peek_char(0) != LESS_THAN {
        return None;
    }
    let mut at = 1;
    let closing = stream.peek_char(at) == SLASH;
    if closing {
        at += 1;
    }
    for expected in b"script" {
        if !stream.peek_char(at).eq_ignore_ascii_case(expected) {
            return None;
        }
        at += 1;
    }
    while is_whitespace(stream.peek_char(at)) {
        at += 1;
    }
    if stream.peek_char(at) == SLASH {
        at += 1;
    }
    if stream.peek_char(at) == GREATER_THAN {
        at += 1;
    }
    Some((at, closing))
}
