use super::*;

crate::token_set! {
    enum Kind: TokenKind(eos = Eos, unknown = Unknown) {
        Word,
        Unknown,
        Eos,
    }
}

crate::token_set! {
    enum Mode: ScannerState {
        Outside,
        /// Between quotes.
        Inside,
    }
}

#[test]
fn text_slices_lazily() {
    let source = "hello world";
    let token = Token::new(Kind::Word, 6, 11);
    assert_eq!(token.text(source), "world");
    assert_eq!(token.len(), 5);
    assert!(!token.is_empty());
}

#[test]
fn text_outside_source_is_empty() {
    let token = Token::new(Kind::Word, 4, 40);
    assert_eq!(token.text("short"), "");
}

#[test]
fn contains_is_half_open() {
    let token = Token::new(Kind::Word, 2, 4);
    assert!(!token.contains(1));
    assert!(token.contains(2));
    assert!(token.contains(3));
    assert!(!token.contains(4));
}

#[test]
fn with_error_keeps_offsets() {
    let token = Token::new(Kind::Unknown, 3, 4).with_error("bad");
    assert_eq!(token.error, Some("bad"));
    assert_eq!((token.start, token.end), (3, 4));
}

#[test]
fn generated_names_round_trip() {
    for kind in Kind::ALL {
        assert_eq!(Kind::from_name(kind.name()), Some(*kind));
    }
    assert_eq!(Mode::from_name("Inside"), Some(Mode::Inside));
    assert_eq!(Mode::from_name("inside"), None);
    assert_eq!(Mode::Outside.to_string(), "Outside");
}

#[test]
fn trait_constants_point_at_declared_variants() {
    assert_eq!(<Kind as TokenKind>::EOS, Kind::Eos);
    assert_eq!(<Kind as TokenKind>::UNKNOWN, Kind::Unknown);
    assert_eq!(<Mode as ScannerState>::name(Mode::Inside), "Inside");
}
