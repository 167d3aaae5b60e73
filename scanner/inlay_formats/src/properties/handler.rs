//! Structural events for properties tree builders.

use inlay_core::Token;

use super::{split_profile, PropertiesKind, PropertiesScanner};

/// Receives the structure of a properties document.
///
/// Every method defaults to a no-op so builders implement only what they
/// need. Offsets are byte offsets into the parsed text.
pub trait PropertiesHandler {
    fn start_property(&mut self, _offset: u32) {}

    /// The key token, with its optional `%profile.` prefix split off.
    fn property_key(&mut self, _token: Token<PropertiesKind>, _profile: Option<&str>, _name: &str) {}

    fn delimiter(&mut self, _token: Token<PropertiesKind>) {}

    /// A piece of value text: plain value text or an expression default.
    fn value_part(&mut self, _token: Token<PropertiesKind>, _text: &str) {}

    fn expression_start(&mut self, _token: Token<PropertiesKind>) {}

    fn expression_reference(&mut self, _token: Token<PropertiesKind>, _name: &str) {}

    /// `closed` is `false` when the line ended before the `}`.
    fn expression_end(&mut self, _offset: u32, _closed: bool) {}

    fn end_property(&mut self, _offset: u32) {}

    fn comment(&mut self, _token: Token<PropertiesKind>, _text: &str) {}

    /// A line with nothing but whitespace.
    fn blank_line(&mut self, _offset: u32) {}
}

/// Scans `text` and reports its structure to `handler`.
#[tracing::instrument(level = "debug", skip_all, fields(len = text.len()))]
pub fn parse_properties<H: PropertiesHandler + ?Sized>(text: &str, handler: &mut H) {
    let mut in_property = false;
    let mut open_expressions = 0usize;
    let mut line_is_blank = true;
    let mut line_start = 0;

    let mut scanner = PropertiesScanner::new(text);
    for token in scanner.tokens() {
        let token_text = token.text(text);
        match token.kind {
            PropertiesKind::Key => {
                if in_property {
                    handler.end_property(token.start);
                }
                in_property = true;
                handler.start_property(token.start);
                let (profile, name) = split_profile(token_text);
                handler.property_key(token, profile, name);
            }
            PropertiesKind::Delimiter => {
                if !in_property {
                    in_property = true;
                    handler.start_property(token.start);
                }
                handler.delimiter(token);
            }
            PropertiesKind::Value => handler.value_part(token, token_text),
            PropertiesKind::ExpressionStart => {
                open_expressions += 1;
                handler.expression_start(token);
            }
            PropertiesKind::ExpressionReference => handler.expression_reference(token, token_text),
            PropertiesKind::ExpressionEnd => {
                open_expressions = open_expressions.saturating_sub(1);
                handler.expression_end(token.end, true);
            }
            PropertiesKind::Comment => handler.comment(token, token_text),
            PropertiesKind::Newline | PropertiesKind::Eos => {
                for _ in 0..open_expressions {
                    handler.expression_end(token.start, false);
                }
                open_expressions = 0;
                if in_property {
                    handler.end_property(token.start);
                    in_property = false;
                } else if line_is_blank && (token.kind == PropertiesKind::Newline || token.start > line_start) {
                    handler.blank_line(line_start);
                }
                line_is_blank = true;
                line_start = token.end;
            }
            PropertiesKind::Whitespace
            | PropertiesKind::LineContinuation
            | PropertiesKind::ExpressionDefaultDelimiter
            | PropertiesKind::Unknown => {}
        }
        if !matches!(
            token.kind,
            PropertiesKind::Whitespace | PropertiesKind::Newline | PropertiesKind::Eos
        ) {
            line_is_blank = false;
        }
    }
}
