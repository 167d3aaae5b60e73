//! Property-based tests for the guarantees every scanner shares.
//!
//! Random, mostly malformed documents built from each format's structural
//! characters are scanned and checked for:
//! 1. Coverage: tokens tile the text without gaps or overlaps
//! 2. Progress: every token but the final EOS consumes input
//! 3. Determinism: scanning twice yields the same tokens
//! 4. Resumability: resuming from any checkpoint yields the same suffix
//! 5. Restart: for documents whose states carry all their context, a fresh
//!    scanner at any visited `(offset, state)` yields the same suffix

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use inlay_core::{Format, Scanner, TokenKind};
use inlay_formats::{Expression, Html, Properties, Template, TemplateConfig, Yaml};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

// -- Strategies --

const YAML_TEXT: &str = "[a-z0-9 :#'\"\\[\\]{},\\-\\n\\r\\t.~é✓]{0,60}";
const PROPERTIES_TEXT: &str = "[a-z0-9 =:#!%$.{}\\\\\\n\\r\\té]{0,60}";
const TEMPLATE_TEXT: &str = "(---\\r?\\n)?[a-z0-9 {}#/!|@\\[\\]'\"\\\\\\-\\n\\r.é]{0,60}";
const EXPRESSION_TEXT: &str = "[a-z0-9 .:(),'\"?\\\\\\[\\]é]{0,40}";
/// Block mappings and sequences with flat flow collections; no quotes,
/// comments or nesting.
const YAML_FLAT_TEXT: &str =
    "((- )?([a-z0-9 :\\-]{0,8}|\\{[a-z0-9 :,]{0,10}\\}|\\[[a-z0-9 :,]{0,10}\\])\\r?\\n?){0,6}";
const HTML_TEXT: &str = "[a-z0-9 <>/!=\"'\\-\\n]{0,40}|(<script>|<style>|<!--)[a-z<>/ \\-!]{0,40}";

// -- Checks --

fn check_scan<F: Format>(text: &str) -> Result<(), TestCaseError> {
    let tokens = Scanner::<F>::new(text).tokenize();
    let len = u32::try_from(text.len()).unwrap();

    let mut expected_start = 0;
    for (index, token) in tokens.iter().enumerate() {
        prop_assert_eq!(token.start, expected_start, "gap or overlap before token {}", index);
        prop_assert!(text.is_char_boundary(token.end as usize));
        let last = index + 1 == tokens.len();
        if last {
            prop_assert_eq!(token.kind, F::Kind::EOS);
            prop_assert_eq!(token.start, len);
            prop_assert_eq!(token.end, len);
        } else {
            prop_assert!(token.kind != F::Kind::EOS, "EOS before the end at token {}", index);
            prop_assert!(token.end > token.start, "no progress at token {}", index);
        }
        expected_start = token.end;
    }

    prop_assert_eq!(&Scanner::<F>::new(text).tokenize(), &tokens);

    let mut scanner = Scanner::<F>::new(text);
    for index in 0..tokens.len() {
        let resumed = Scanner::resume(text, scanner.checkpoint()).tokenize();
        prop_assert_eq!(&resumed[..], &tokens[index..], "resume before token {}", index);
        scanner.scan();
    }
    Ok(())
}

fn check_restart<F: Format>(text: &str) -> Result<(), TestCaseError> {
    let tokens = Scanner::<F>::new(text).tokenize();
    let mut scanner = Scanner::<F>::new(text);
    for index in 0..tokens.len() {
        let restarted = Scanner::<F>::at(text, scanner.pos(), scanner.state()).tokenize();
        prop_assert_eq!(
            &restarted[..],
            &tokens[index..],
            "restart at {} in {:?}",
            scanner.pos(),
            scanner.state()
        );
        scanner.scan();
    }
    Ok(())
}

fn check_bounded<F: Format>(text: &str, a: usize, b: usize) -> Result<(), TestCaseError> {
    let mut bounds = [a % (text.len() + 1), b % (text.len() + 1)];
    bounds.sort_unstable();
    let [mut start, mut end] = bounds;
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let range = u32::try_from(start).unwrap()..u32::try_from(end.max(start)).unwrap();

    let tokens = Scanner::<F>::with_range(text, range.clone(), F::INITIAL_STATE).tokenize();
    let mut expected_start = range.start;
    for token in &tokens {
        prop_assert_eq!(token.start, expected_start);
        prop_assert!(token.end <= range.end);
        expected_start = token.end;
    }
    prop_assert_eq!(tokens.last().map(|token| token.kind), Some(F::Kind::EOS));
    prop_assert_eq!(expected_start, range.end);
    Ok(())
}

// -- Properties --

proptest! {
    #[test]
    fn yaml_invariants(text in YAML_TEXT) {
        check_scan::<Yaml>(&text)?;
    }

    #[test]
    fn properties_invariants(text in PROPERTIES_TEXT) {
        check_scan::<Properties>(&text)?;
    }

    #[test]
    fn template_invariants(text in TEMPLATE_TEXT) {
        check_scan::<Template>(&text)?;
    }

    #[test]
    fn expression_invariants(text in EXPRESSION_TEXT) {
        check_scan::<Expression>(&text)?;
    }

    #[test]
    fn html_invariants(text in HTML_TEXT) {
        check_scan::<Html>(&text)?;
    }

    #[test]
    fn arbitrary_unicode_never_breaks_yaml(text in "\\PC{0,30}") {
        check_scan::<Yaml>(&text)?;
    }

    #[test]
    fn arbitrary_unicode_never_breaks_template(text in "\\PC{0,30}") {
        check_scan::<Template>(&text)?;
    }

    #[test]
    fn yaml_restarts_from_offset_and_state(text in YAML_FLAT_TEXT) {
        check_restart::<Yaml>(&text)?;
    }

    #[test]
    fn template_restarts_from_offset_and_state(text in TEMPLATE_TEXT) {
        check_restart::<Template>(&text)?;
    }

    #[test]
    fn bounded_scans_stay_in_range(text in YAML_TEXT, a in 0usize..80, b in 0usize..80) {
        check_bounded::<Yaml>(&text, a, b)?;
        check_bounded::<Properties>(&text, a, b)?;
        check_bounded::<Expression>(&text, a, b)?;
    }

    #[test]
    fn template_without_injections_covers_text(text in TEMPLATE_TEXT) {
        let tokens: Vec<_> = TemplateConfig::without_injections().scanner(&text).tokenize();
        let covered: u32 = tokens.iter().map(|token| token.len()).sum();
        prop_assert_eq!(covered as usize, text.len());
        prop_assert!(tokens.iter().all(|token| !matches!(
            token.kind.name(),
            "LanguageInjectionStart" | "LanguageInjectionContent" | "LanguageInjectionEnd"
        )));
    }
}
