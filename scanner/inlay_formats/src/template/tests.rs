use inlay_core::Token;
use pretty_assertions::assert_eq;

use super::*;
use TemplateKind::*;

fn scan(source: &str) -> Vec<(TemplateKind, &str)> {
    TemplateScanner::new(source)
        .tokenize()
        .into_iter()
        .map(|token| (token.kind, token.text(source)))
        .collect()
}

fn tokens(source: &str) -> Vec<Token<TemplateKind>> {
    TemplateScanner::new(source).tokenize()
}

// ─── Front Matter ─────────────────────────────────────────────────

#[test]
fn front_matter_with_blank_line() {
    let source = "---\r\n\r\n---\r\n";
    assert_eq!(
        tokens(source),
        vec![
            Token::new(LanguageInjectionStart, 0, 5),
            Token::new(LanguageInjectionContent, 5, 7),
            Token::new(LanguageInjectionEnd, 7, 12),
            Token::new(Eos, 12, 12),
        ]
    );
}

#[test]
fn front_matter_then_content() {
    assert_eq!(
        scan("---\ntitle: x\n---\nHello {name}"),
        vec![
            (LanguageInjectionStart, "---\n"),
            (LanguageInjectionContent, "title: x\n"),
            (LanguageInjectionEnd, "---\n"),
            (Content, "Hello "),
            (StartExpression, "{"),
            (ExpressionContent, "name"),
            (EndExpression, "}"),
            (Eos, ""),
        ]
    );
}

#[test]
fn empty_front_matter_omits_content() {
    assert_eq!(
        scan("---\n---\n"),
        vec![
            (LanguageInjectionStart, "---\n"),
            (LanguageInjectionEnd, "---\n"),
            (Eos, ""),
        ]
    );
}

#[test]
fn unterminated_front_matter_runs_to_eos() {
    assert_eq!(
        scan("---\na: 1"),
        vec![
            (LanguageInjectionStart, "---\n"),
            (LanguageInjectionContent, "a: 1"),
            (Eos, ""),
        ]
    );
}

#[test]
fn front_matter_only_at_document_start() {
    assert_eq!(scan("x\n---\n"), vec![(Content, "x\n---\n"), (Eos, "")]);
}

#[test]
fn dashes_without_line_break_are_content() {
    assert_eq!(scan("---x"), vec![(Content, "---x"), (Eos, "")]);
}

#[test]
fn injections_can_be_disabled() {
    let source = "---\na: 1\n---\n";
    let kinds: Vec<_> = TemplateConfig::without_injections()
        .scanner(source)
        .tokenize()
        .into_iter()
        .map(|token| token.kind)
        .collect();
    assert_eq!(kinds, vec![Content, Eos]);
}

#[test]
fn injection_language_is_tracked() {
    let mut scanner = TemplateScanner::new("---\na: 1\n---\n");
    assert_eq!(scanner.scan(), LanguageInjectionStart);
    assert_eq!(scanner.format().injection_language(), Some("yaml"));
    assert_eq!(scanner.scan(), LanguageInjectionContent);
    assert_eq!(scanner.scan(), LanguageInjectionEnd);
    assert_eq!(scanner.format().injection_language(), None);
}

// ─── Sections ─────────────────────────────────────────────────────

#[test]
fn section_with_parameters() {
    assert_eq!(
        scan("{#each items}{it}{/each}"),
        vec![
            (StartTagOpen, "{#"),
            (StartTag, "each"),
            (Whitespace, " "),
            (ParameterTag, "items"),
            (StartTagClose, "}"),
            (StartExpression, "{"),
            (ExpressionContent, "it"),
            (EndExpression, "}"),
            (EndTagOpen, "{/"),
            (EndTag, "each"),
            (EndTagClose, "}"),
            (Eos, ""),
        ]
    );
}

#[test]
fn self_closing_section() {
    assert_eq!(
        scan("{#include foo /}"),
        vec![
            (StartTagOpen, "{#"),
            (StartTag, "include"),
            (Whitespace, " "),
            (ParameterTag, "foo"),
            (Whitespace, " "),
            (StartTagSelfClose, "/}"),
            (Eos, ""),
        ]
    );
}

#[test]
fn quoted_parameters_keep_braces() {
    assert_eq!(
        scan("{#let a=\"}\" b='/}'}"),
        vec![
            (StartTagOpen, "{#"),
            (StartTag, "let"),
            (Whitespace, " "),
            (ParameterTag, "a=\"}\" b='/}'"),
            (StartTagClose, "}"),
            (Eos, ""),
        ]
    );
}

#[test]
fn anonymous_end_tag() {
    assert_eq!(
        scan("{/}"),
        vec![(EndTagOpen, "{/"), (EndTagClose, "}"), (Eos, "")]
    );
}

#[test]
fn missing_section_name() {
    let tokens = tokens("{#}");
    assert_eq!(tokens[1].kind, StartTagClose);
    assert_eq!(tokens[1].error, Some(START_TAG_NAME_EXPECTED));
}

#[test]
fn junk_in_end_tag() {
    let tokens = tokens("{/if x}");
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![EndTagOpen, EndTag, Whitespace, Unknown, EndTagClose, Eos]
    );
    assert_eq!(tokens[3].error, Some(CLOSING_BRACKET_EXPECTED));
}

// ─── Comments, Unparsed Blocks, Declarations ──────────────────────

#[test]
fn comment() {
    assert_eq!(
        scan("{! note {x} !}"),
        vec![
            (StartComment, "{!"),
            (Comment, " note {x} "),
            (EndComment, "!}"),
            (Eos, ""),
        ]
    );
}

#[test]
fn unterminated_comment_runs_to_eos() {
    assert_eq!(
        scan("{! open"),
        vec![(StartComment, "{!"), (Comment, " open"), (Eos, "")]
    );
}

#[test]
fn unparsed_blocks() {
    assert_eq!(
        scan("{| {raw} |}{[ old ]}"),
        vec![
            (CdataTagOpen, "{|"),
            (CdataContent, " {raw} "),
            (CdataTagClose, "|}"),
            (CdataTagOpen, "{["),
            (CdataContent, " old "),
            (CdataTagClose, "]}"),
            (Eos, ""),
        ]
    );
}

#[test]
fn parameter_declaration() {
    assert_eq!(
        scan("{@java.util.List<String> items}"),
        vec![
            (StartParameterDeclaration, "{@"),
            (ParameterDeclaration, "java.util.List<String> items"),
            (EndParameterDeclaration, "}"),
            (Eos, ""),
        ]
    );
}

// ─── Expressions and Content ──────────────────────────────────────

#[test]
fn quoted_brace_inside_expression() {
    assert_eq!(
        scan("{a.b('}')}"),
        vec![
            (StartExpression, "{"),
            (ExpressionContent, "a.b('}')"),
            (EndExpression, "}"),
            (Eos, ""),
        ]
    );
}

#[test]
fn escaped_brace_is_content() {
    assert_eq!(scan("a\\{b}"), vec![(Content, "a\\{b}"), (Eos, "")]);
}

#[test]
fn braces_followed_by_blank_are_content() {
    assert_eq!(scan("a { b } {}"), vec![(Content, "a { b } {}"), (Eos, "")]);
}

#[test]
fn trailing_brace_is_content() {
    assert_eq!(scan("x{"), vec![(Content, "x{"), (Eos, "")]);
}

#[test]
fn unterminated_expression_runs_to_eos() {
    assert_eq!(
        scan("{name"),
        vec![(StartExpression, "{"), (ExpressionContent, "name"), (Eos, "")]
    );
}

// ─── Resume ───────────────────────────────────────────────────────

#[test]
fn resume_from_every_token() {
    let source = "---\na: 1\n---\n{#if x}y{! c !}{/if}\n";
    let full = TemplateScanner::new(source).tokenize();
    let mut scanner = TemplateScanner::new(source);
    for index in 0..full.len() {
        let resumed = TemplateScanner::resume(source, scanner.checkpoint()).tokenize();
        assert_eq!(resumed, full[index..].to_vec(), "resume before token {index}");
        scanner.scan();
    }
}

#[test]
fn restart_from_offset_and_state_in_front_matter() {
    let source = "---\r\n\r\n---\r\n";
    let full = tokens(source);
    let mut scanner = TemplateScanner::new(source);
    for index in 0..full.len() {
        let restarted = TemplateScanner::at(source, scanner.pos(), scanner.state()).tokenize();
        assert_eq!(restarted, full[index..].to_vec(), "restart before token {index}");
        scanner.scan();
    }
}

#[test]
fn restart_from_offset_and_state_everywhere() {
    let source = "---\na: 1\n---\n{#if x}y{! c !}{/if}\n";
    let full = tokens(source);
    let mut scanner = TemplateScanner::new(source);
    for index in 0..full.len() {
        let restarted = TemplateScanner::at(source, scanner.pos(), scanner.state()).tokenize();
        assert_eq!(restarted, full[index..].to_vec(), "restart before token {index}");
        scanner.scan();
    }
}

#[test]
fn restart_inside_front_matter_content() {
    let source = "---\na: 1\nb: 2\n---\nx";
    assert_eq!(
        TemplateScanner::at(source, 9, TemplateState::WithinInjection).tokenize(),
        vec![
            Token::new(LanguageInjectionContent, 9, 14),
            Token::new(LanguageInjectionEnd, 14, 18),
            Token::new(Content, 18, 19),
            Token::new(Eos, 19, 19),
        ]
    );
}

#[test]
fn injection_state_without_an_opening_falls_back_to_content() {
    let source = "a\n---\nb";
    assert_eq!(
        TemplateScanner::at(source, 2, TemplateState::WithinInjection).tokenize(),
        vec![Token::new(Content, 2, 7), Token::new(Eos, 7, 7)]
    );
}
