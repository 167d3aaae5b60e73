use pretty_assertions::assert_eq;

use super::*;

crate::token_set! {
    enum Kind: TokenKind(eos = Eos, unknown = Unknown) {
        Word, Space, Open, Close, Inner, Unknown, Eos,
    }
}

crate::token_set! {
    enum Mode: ScannerState { Outside, Inside }
}

/// Words outside parentheses, raw runs inside; parentheses nest. `!` is a
/// deliberately stuck rule that returns without consuming anything.
#[derive(Clone, Default, Debug)]
struct Words {
    depth: u32,
}

impl Format for Words {
    type Kind = Kind;
    type State = Mode;

    const INITIAL_STATE: Mode = Mode::Outside;

    fn scan(&mut self, cx: &mut ScanContext<'_, '_, Mode>) -> Kind {
        if cx.stream.skip_whitespace() {
            return Kind::Space;
        }
        if cx.stream.advance_if_char(b'(') {
            self.depth += 1;
            cx.set_state(Mode::Inside);
            return Kind::Open;
        }
        match cx.state() {
            Mode::Outside => {
                if cx.stream.peek_char(0) == b'!' {
                    return Kind::Word;
                }
                if cx.stream.advance_while_char(|b| b.is_ascii_alphanumeric()) > 0 {
                    return Kind::Word;
                }
                cx.stream.advance_char();
                cx.finish_with_error(Kind::Unknown, "unexpected character")
            }
            Mode::Inside => {
                if cx.stream.advance_if_char(b')') {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        cx.set_state(Mode::Outside);
                    }
                    return Kind::Close;
                }
                cx.stream.advance_while_char(|b| !matches!(b, b'(' | b')' | b' '));
                cx.finish(Kind::Inner)
            }
        }
    }
}

type WordScanner<'src> = Scanner<'src, Words>;

fn scan_all(source: &str) -> Vec<(Kind, &str)> {
    WordScanner::new(source)
        .tokenize()
        .into_iter()
        .map(|token| (token.kind, token.text(source)))
        .collect()
}

// === Token Sequence ===

#[test]
fn scans_simple_words() {
    assert_eq!(
        scan_all("ab cd"),
        vec![
            (Kind::Word, "ab"),
            (Kind::Space, " "),
            (Kind::Word, "cd"),
            (Kind::Eos, ""),
        ]
    );
}

#[test]
fn nested_groups_track_auxiliary_depth() {
    assert_eq!(
        scan_all("a(b(c))d"),
        vec![
            (Kind::Word, "a"),
            (Kind::Open, "("),
            (Kind::Inner, "b"),
            (Kind::Open, "("),
            (Kind::Inner, "c"),
            (Kind::Close, ")"),
            (Kind::Close, ")"),
            (Kind::Word, "d"),
            (Kind::Eos, ""),
        ]
    );
}

#[test]
fn empty_input_is_single_eos() {
    let mut scanner = WordScanner::new("");
    assert_eq!(scanner.scan(), Kind::Eos);
    assert_eq!(scanner.token_offset(), 0);
    assert_eq!(scanner.token_end(), 0);
}

#[test]
fn eos_is_sticky() {
    let mut scanner = WordScanner::new("a");
    assert_eq!(scanner.scan(), Kind::Word);
    assert_eq!(scanner.scan(), Kind::Eos);
    assert_eq!(scanner.scan(), Kind::Eos);
    assert_eq!(scanner.token_offset(), 1);
}

#[test]
fn tokens_stop_after_eos() {
    let mut scanner = WordScanner::new("a");
    let mut tokens = scanner.tokens();
    assert_eq!(tokens.next().map(|token| token.kind), Some(Kind::Word));
    assert_eq!(tokens.next().map(|token| token.kind), Some(Kind::Eos));
    assert!(tokens.next().is_none());
    assert!(tokens.next().is_none());
}

#[test]
fn scan_is_callable_on_an_owned_scanner() {
    let mut scanner = WordScanner::new("ab cd");
    assert_eq!(scanner.scan(), Kind::Word);
    assert_eq!(scanner.token_text(), "ab");
    assert_eq!(scanner.tokens().count(), 3);
    assert_eq!(scanner.pos(), 5);
    assert_eq!(scanner.tokens().map(|token| token.kind).collect::<Vec<_>>(), vec![Kind::Eos]);
}

// === Fault Tolerance ===

#[test]
fn error_message_is_attached() {
    let mut scanner = WordScanner::new("a-");
    scanner.scan();
    assert_eq!(scanner.scan(), Kind::Unknown);
    assert_eq!(scanner.token_text(), "-");
    assert_eq!(scanner.token_error(), Some("unexpected character"));
}

#[test]
fn stuck_rule_becomes_single_unknown() {
    let mut scanner = WordScanner::new("!!a");
    assert_eq!(scanner.scan(), Kind::Unknown);
    assert_eq!(scanner.token_text(), "!");
    assert_eq!(scanner.token_error(), Some(NO_PROGRESS_MESSAGE));
    assert_eq!(scanner.scan(), Kind::Unknown);
    assert_eq!(scanner.scan(), Kind::Word);
}

#[test]
fn unknown_consumes_whole_code_point() {
    let mut scanner = WordScanner::new("é");
    assert_eq!(scanner.scan(), Kind::Unknown);
    assert_eq!(scanner.token_text(), "é");
    assert_eq!(scanner.token_length(), 2);
}

// === Construction ===

#[test]
fn at_clamps_and_snaps_offset() {
    let mut scanner = WordScanner::at("ab", 40, Mode::Outside);
    assert_eq!(scanner.scan(), Kind::Eos);
    assert_eq!(scanner.token_offset(), 2);

    let mut scanner = WordScanner::at("é a", 1, Mode::Outside);
    assert_eq!(scanner.pos(), 2);
    assert_eq!(scanner.scan(), Kind::Space);
}

#[test]
fn at_starts_in_given_state() {
    let mut scanner = WordScanner::at("x y", 0, Mode::Inside);
    assert_eq!(scanner.scan(), Kind::Inner);
    assert_eq!(scanner.state(), Mode::Inside);
}

#[test]
fn with_range_keeps_absolute_offsets() {
    let source = "skip mid skip";
    let tokens = WordScanner::with_range(source, 5..8, Mode::Outside).tokenize();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], Token::new(Kind::Word, 5, 8));
    assert_eq!(tokens[1], Token::new(Kind::Eos, 8, 8));
}

// === Checkpoints ===

#[test]
fn resume_from_checkpoint_reproduces_suffix() {
    let source = "a((b c) d) e";
    let full = WordScanner::new(source).tokenize();

    let mut scanner = WordScanner::new(source);
    for index in 0..full.len() {
        let checkpoint = scanner.checkpoint();
        let resumed = WordScanner::resume(source, checkpoint).tokenize();
        assert_eq!(resumed, full[index..].to_vec(), "resuming before token {index}");
        scanner.scan();
    }
}

#[test]
fn checkpoint_carries_auxiliary_context() {
    let mut scanner = WordScanner::new("((x))");
    scanner.scan();
    scanner.scan();
    let checkpoint = scanner.checkpoint();
    assert_eq!(checkpoint.format.depth, 2);
    assert_eq!(checkpoint.state, Mode::Inside);
}
