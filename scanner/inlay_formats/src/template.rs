//! Template scanner: sections, comments, unparsed blocks, parameter
//! declarations, expressions and language injections in host content.
//!
//! | syntax | meaning |
//! |---|---|
//! | `{#name params}` / `{#name/}` | section start / self-closing section |
//! | `{/name}` / `{/}` | section end |
//! | `{! ... !}` | comment |
//! | `{\| ... \|}`, `{[ ... ]}` | unparsed character data |
//! | `{@Type name}` | parameter declaration |
//! | `{expr}` | expression, see [`expression`](crate::expression) |
//!
//! A `{` followed by whitespace, `}` or the end of input is plain content,
//! as is an escaped `\{`.

use std::sync::Arc;

use inlay_core::constants::{
    is_line_break, is_whitespace, AT, BACKSLASH, BANG, CARRIAGE_RETURN, DOUBLE_QUOTE, HASH,
    LEFT_BRACE, LEFT_BRACKET, LINE_FEED, PIPE, RIGHT_BRACE, SINGLE_QUOTE, SLASH,
};
use inlay_core::{token_set, CharacterStream, Format, ScanContext, Scanner};
use tracing::debug;

use crate::injection::{EndDelimiter, FrontMatterDetector, InjectionDetector, InjectionTrigger};

pub const START_TAG_NAME_EXPECTED: &str = "Start tag name expected.";
pub const CLOSING_BRACKET_EXPECTED: &str = "Closing bracket expected.";

token_set! {
    /// Token kinds produced by [`Template`].
    pub enum TemplateKind: TokenKind(eos = Eos, unknown = Unknown) {
        Content,
        Whitespace,
        StartTagOpen,
        StartTag,
        ParameterTag,
        StartTagSelfClose,
        StartTagClose,
        EndTagOpen,
        EndTag,
        EndTagClose,
        StartComment,
        Comment,
        EndComment,
        CdataTagOpen,
        CdataContent,
        CdataTagClose,
        StartParameterDeclaration,
        ParameterDeclaration,
        EndParameterDeclaration,
        StartExpression,
        ExpressionContent,
        EndExpression,
        LanguageInjectionStart,
        LanguageInjectionContent,
        LanguageInjectionEnd,
        Unknown,
        Eos,
    }
}

token_set! {
    /// Lexical states of [`Template`].
    pub enum TemplateState: ScannerState {
        WithinContent,
        AfterOpeningStartTag,
        WithinTag,
        AfterOpeningEndTag,
        WithinEndTag,
        WithinComment,
        WithinCdata,
        WithinCdataOld,
        WithinParameterDeclaration,
        WithinExpression,
        WithinInjection,
        AfterInjectionContent,
    }
}

/// Template scanner options.
#[derive(Clone, Debug)]
pub struct TemplateConfig {
    /// Consulted in order; the first match wins.
    pub detectors: Vec<Arc<dyn InjectionDetector>>,
}

impl Default for TemplateConfig {
    /// YAML front matter detection only.
    fn default() -> Self {
        TemplateConfig {
            detectors: vec![Arc::new(FrontMatterDetector)],
        }
    }
}

impl TemplateConfig {
    /// Configuration that never detects injections.
    pub fn without_injections() -> Self {
        TemplateConfig {
            detectors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_detector(mut self, detector: impl InjectionDetector + 'static) -> Self {
        self.detectors.push(Arc::new(detector));
        self
    }

    /// Scanner over the whole text using this configuration.
    pub fn scanner<'src>(&self, text: &'src str) -> TemplateScanner<'src> {
        Scanner::with_format(
            CharacterStream::new(text),
            TemplateState::WithinContent,
            Template::with_config(self.clone()),
        )
    }

    fn breaks_at_line_start(&self) -> bool {
        self.detectors
            .iter()
            .any(|detector| detector.trigger() == InjectionTrigger::LineStart)
    }
}

/// Injection whose content or end delimiter is being scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ActiveInjection {
    language_id: &'static str,
    end: EndDelimiter,
}

/// Auxiliary context of the template scanner.
#[derive(Clone, Debug, Default)]
pub struct Template {
    config: Arc<TemplateConfig>,
    injection: Option<ActiveInjection>,
}

pub type TemplateScanner<'src> = Scanner<'src, Template>;

impl Template {
    pub fn with_config(config: TemplateConfig) -> Self {
        Template {
            config: Arc::new(config),
            injection: None,
        }
    }

    /// Language id of the injection being scanned, if any.
    pub fn injection_language(&self) -> Option<&'static str> {
        self.injection.map(|injection| injection.language_id)
    }
}

impl Format for Template {
    type Kind = TemplateKind;
    type State = TemplateState;

    const INITIAL_STATE: TemplateState = TemplateState::WithinContent;

    fn scan(&mut self, cx: &mut ScanContext<'_, '_, TemplateState>) -> TemplateKind {
        loop {
            match cx.state() {
                TemplateState::WithinContent => return self.content(cx),
                TemplateState::AfterOpeningStartTag => {
                    if eat_tag_name(cx.stream) {
                        cx.set_state(TemplateState::WithinTag);
                        return TemplateKind::StartTag;
                    }
                    cx.set_state(TemplateState::WithinTag);
                    let kind = within_tag(cx);
                    return cx.finish_with_error(kind, START_TAG_NAME_EXPECTED);
                }
                TemplateState::WithinTag => return within_tag(cx),
                TemplateState::AfterOpeningEndTag => {
                    cx.set_state(TemplateState::WithinEndTag);
                    if eat_tag_name(cx.stream) {
                        return TemplateKind::EndTag;
                    }
                }
                TemplateState::WithinEndTag => {
                    if cx.stream.skip_whitespace() {
                        return TemplateKind::Whitespace;
                    }
                    if cx.stream.advance_if_char(RIGHT_BRACE) {
                        cx.set_state(TemplateState::WithinContent);
                        return TemplateKind::EndTagClose;
                    }
                    cx.stream.advance_until_char(&[RIGHT_BRACE]);
                    return cx.finish_with_error(TemplateKind::Unknown, CLOSING_BRACKET_EXPECTED);
                }
                TemplateState::WithinComment => {
                    return close_or_run(cx, "!}", TemplateKind::EndComment, TemplateKind::Comment);
                }
                TemplateState::WithinCdata => {
                    return close_or_run(cx, "|}", TemplateKind::CdataTagClose, TemplateKind::CdataContent);
                }
                TemplateState::WithinCdataOld => {
                    return close_or_run(cx, "]}", TemplateKind::CdataTagClose, TemplateKind::CdataContent);
                }
                TemplateState::WithinParameterDeclaration => {
                    if cx.stream.advance_if_char(RIGHT_BRACE) {
                        cx.set_state(TemplateState::WithinContent);
                        return TemplateKind::EndParameterDeclaration;
                    }
                    eat_until_close(cx.stream);
                    return TemplateKind::ParameterDeclaration;
                }
                TemplateState::WithinExpression => {
                    if cx.stream.advance_if_char(RIGHT_BRACE) {
                        cx.set_state(TemplateState::WithinContent);
                        return TemplateKind::EndExpression;
                    }
                    eat_until_close(cx.stream);
                    return TemplateKind::ExpressionContent;
                }
                TemplateState::WithinInjection => {
                    let Some(injection) = self.active_injection(cx.stream) else {
                        cx.set_state(TemplateState::WithinContent);
                        continue;
                    };
                    cx.set_state(TemplateState::AfterInjectionContent);
                    let stream = &mut *cx.stream;
                    match injection.end.find(stream.text(), stream.pos(), stream.range_end()) {
                        Some(end) => stream.advance(end - stream.pos()),
                        None => stream.advance(stream.range_end() - stream.pos()),
                    }
                    if cx.has_progress() {
                        return TemplateKind::LanguageInjectionContent;
                    }
                }
                TemplateState::AfterInjectionContent => {
                    cx.set_state(TemplateState::WithinContent);
                    let Some(injection) = self.active_injection(cx.stream) else {
                        continue;
                    };
                    self.injection = None;
                    let stream = &mut *cx.stream;
                    if let Some(len) = injection.end.len_at(stream.text(), stream.pos(), stream.range_end()) {
                        stream.advance(len);
                        return TemplateKind::LanguageInjectionEnd;
                    }
                }
            }
        }
    }
}

impl Template {
    // ─── Host Content ─────────────────────────────────────────────

    fn content(&mut self, cx: &mut ScanContext<'_, '_, TemplateState>) -> TemplateKind {
        if let Some(kind) = self.start_injection(cx) {
            return kind;
        }

        if cx.stream.peek_char(0) == LEFT_BRACE {
            let opened = match cx.stream.peek_char(1) {
                BANG => Some((TemplateState::WithinComment, TemplateKind::StartComment)),
                PIPE => Some((TemplateState::WithinCdata, TemplateKind::CdataTagOpen)),
                LEFT_BRACKET => Some((TemplateState::WithinCdataOld, TemplateKind::CdataTagOpen)),
                HASH => Some((TemplateState::AfterOpeningStartTag, TemplateKind::StartTagOpen)),
                SLASH => Some((TemplateState::AfterOpeningEndTag, TemplateKind::EndTagOpen)),
                AT => Some((TemplateState::WithinParameterDeclaration, TemplateKind::StartParameterDeclaration)),
                next if is_content_brace(next) => None,
                _ => {
                    cx.stream.advance(1);
                    cx.set_state(TemplateState::WithinExpression);
                    return TemplateKind::StartExpression;
                }
            };
            if let Some((state, kind)) = opened {
                cx.stream.advance(2);
                cx.set_state(state);
                return kind;
            }
        }

        self.eat_content(cx.stream);
        TemplateKind::Content
    }

    fn start_injection(&mut self, cx: &mut ScanContext<'_, '_, TemplateState>) -> Option<TemplateKind> {
        if self.config.detectors.is_empty() {
            return None;
        }
        let offset = cx.stream.pos();
        let document_start = offset == 0;
        let line_start = cx.stream.at_line_start();
        let text = cx.stream.text();
        let found = self
            .config
            .detectors
            .iter()
            .filter(|detector| match detector.trigger() {
                InjectionTrigger::DocumentStart => document_start,
                InjectionTrigger::LineStart => line_start,
            })
            .find_map(|detector| detector.detect(text, offset))
            .filter(|found| found.start_len > 0)?;

        debug!(language = found.language_id, offset, "language injection detected");
        cx.stream.advance(found.start_len);
        self.injection = Some(ActiveInjection {
            language_id: found.language_id,
            end: found.end,
        });
        cx.set_state(TemplateState::WithinInjection);
        Some(TemplateKind::LanguageInjectionStart)
    }

    /// The injection being scanned. A scan restarted inside an injection has
    /// none recorded; it is found again by running the detectors over the
    /// line starts before the cursor, nearest first.
    fn active_injection(&mut self, stream: &CharacterStream<'_>) -> Option<ActiveInjection> {
        if self.injection.is_none() {
            self.injection = self.recover_injection(stream.text(), stream.pos());
            if let Some(injection) = self.injection {
                debug!(language = injection.language_id, offset = stream.pos(), "injection recovered");
            }
        }
        self.injection
    }

    fn recover_injection(&self, text: &str, offset: u32) -> Option<ActiveInjection> {
        let bytes = text.as_bytes().get(..offset as usize)?;
        let line_starts = (1..bytes.len())
            .rev()
            .filter(|&at| match bytes[at - 1] {
                LINE_FEED => true,
                CARRIAGE_RETURN => bytes[at] != LINE_FEED,
                _ => false,
            })
            .chain(std::iter::once(0));

        for start in line_starts {
            let start = u32::try_from(start).ok()?;
            let found = self
                .config
                .detectors
                .iter()
                .filter(|detector| start == 0 || detector.trigger() == InjectionTrigger::LineStart)
                .find_map(|detector| detector.detect(text, start))
                .filter(|found| found.start_len > 0 && start + found.start_len <= offset);
            let Some(found) = found else {
                continue;
            };
            // The nearest opening wins; it is only active if it has not
            // been closed before the cursor.
            let content_start = start + found.start_len;
            if found.end.find(text, content_start, offset).is_some() {
                return None;
            }
            return Some(ActiveInjection {
                language_id: found.language_id,
                end: found.end,
            });
        }
        None
    }

    /// Consumes content up to the next construct. With line-start detectors
    /// configured, content also ends after each line break.
    fn eat_content(&self, stream: &mut CharacterStream<'_>) {
        let break_lines = self.config.breaks_at_line_start();
        let stops: &[u8] = if break_lines {
            &[LEFT_BRACE, BACKSLASH, LINE_FEED, CARRIAGE_RETURN]
        } else {
            &[LEFT_BRACE, BACKSLASH]
        };
        while stream.advance_until_char(stops) {
            match stream.peek_char(0) {
                BACKSLASH => {
                    stream.advance(1);
                    stream.advance_if_char(LEFT_BRACE);
                }
                LEFT_BRACE if is_content_brace(stream.peek_char(1)) => stream.advance(1),
                LEFT_BRACE => break,
                _ => {
                    stream.advance_line_break();
                    break;
                }
            }
        }
    }
}

// ─── Tags ─────────────────────────────────────────────────────────

fn within_tag(cx: &mut ScanContext<'_, '_, TemplateState>) -> TemplateKind {
    if cx.stream.skip_whitespace() {
        return TemplateKind::Whitespace;
    }
    if cx.stream.advance_if_chars("/}") {
        cx.set_state(TemplateState::WithinContent);
        return TemplateKind::StartTagSelfClose;
    }
    if cx.stream.advance_if_char(RIGHT_BRACE) {
        cx.set_state(TemplateState::WithinContent);
        return TemplateKind::StartTagClose;
    }
    eat_parameters(cx.stream);
    TemplateKind::ParameterTag
}

fn is_tag_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':' | b'$') || !b.is_ascii()
}

fn eat_tag_name(stream: &mut CharacterStream<'_>) -> bool {
    stream.advance_while_char(is_tag_name_char) > 0
}

/// Consumes section parameters up to `}` or `/}`, skipping quoted text and
/// excluding trailing whitespace.
fn eat_parameters(stream: &mut CharacterStream<'_>) {
    let mut content_end = stream.pos();
    while !stream.eos() {
        let b = stream.peek_char(0);
        if b == RIGHT_BRACE || (b == SLASH && stream.peek_char(1) == RIGHT_BRACE) {
            break;
        }
        if b == DOUBLE_QUOTE || b == SINGLE_QUOTE {
            skip_quoted(stream, b);
            content_end = stream.pos();
        } else if is_whitespace(b) {
            stream.advance(1);
        } else {
            stream.advance_char();
            content_end = stream.pos();
        }
    }
    stream.go_back_to(content_end);
}

/// Consumes text up to an unquoted `}`.
fn eat_until_close(stream: &mut CharacterStream<'_>) {
    while stream.advance_until_char(&[RIGHT_BRACE, DOUBLE_QUOTE, SINGLE_QUOTE]) {
        let b = stream.peek_char(0);
        if b == RIGHT_BRACE {
            break;
        }
        skip_quoted(stream, b);
    }
}

/// Consumes a quoted literal starting at the opening quote. An unterminated
/// literal runs to the end of the line.
fn skip_quoted(stream: &mut CharacterStream<'_>, quote: u8) {
    stream.advance(1);
    while !stream.eos() {
        let b = stream.peek_char(0);
        if is_line_break(b) {
            return;
        }
        stream.advance_char();
        if b == quote {
            return;
        }
        if b == BACKSLASH {
            stream.advance_char();
        }
    }
}

fn close_or_run(
    cx: &mut ScanContext<'_, '_, TemplateState>,
    close: &str,
    close_kind: TemplateKind,
    run_kind: TemplateKind,
) -> TemplateKind {
    if cx.stream.advance_if_chars(close) {
        cx.set_state(TemplateState::WithinContent);
        return close_kind;
    }
    cx.stream.advance_until_chars(close);
    run_kind
}

/// `{` followed by whitespace, `}` or the end of input opens nothing.
fn is_content_brace(next: u8) -> bool {
    next == 0 || is_whitespace(next) || next == RIGHT_BRACE
}

#[cfg(test)]
mod tests;
