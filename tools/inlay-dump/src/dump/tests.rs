use std::path::PathBuf;

use pretty_assertions::assert_eq;

use super::*;

fn config(format: DumpFormat) -> DumpConfig {
    DumpConfig {
        path: PathBuf::from("input"),
        format: Some(format),
        ..DumpConfig::default()
    }
}

fn dump_to_string(text: &str, config: &DumpConfig) -> Result<String, DumpError> {
    let mut out = Vec::new();
    dump(text, config, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[test]
fn yaml_with_missing_colon() {
    let output = dump_to_string("key\r\nvalue", &config(DumpFormat::Yaml)).unwrap_or_default();
    let first = output.lines().next().unwrap_or_default();
    assert_eq!(first, "Unknown @ 0..3 \"key\" [Expected ':' after key]");
    assert!(output.ends_with("Eos @ 10..10 \"\"\n"));
}

#[test]
fn properties_lines() {
    let output = dump_to_string("a=1", &config(DumpFormat::Properties)).unwrap_or_default();
    assert_eq!(
        output,
        "Key @ 0..1 \"a\"\nDelimiter @ 1..2 \"=\"\nValue @ 2..3 \"1\"\nEos @ 3..3 \"\"\n"
    );
}

#[test]
fn positions_count_utf16_units() {
    let mut config = config(DumpFormat::Properties);
    config.positions = true;
    let output = dump_to_string("a=é\nb=2", &config).unwrap_or_default();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines[2], "Value @ 2..4 (0:2-0:3) \"é\"");
    assert_eq!(lines[4], "Key @ 5..6 (1:0-1:1) \"b\"");
}

#[test]
fn start_offset_and_state() {
    let mut config = config(DumpFormat::Template);
    config.offset = 4;
    config.state = Some("WithinExpression".to_owned());
    let output = dump_to_string("{ab}name}", &config).unwrap_or_default();
    assert_eq!(
        output,
        "ExpressionContent @ 4..8 \"name\"\nEndExpression @ 8..9 \"}\"\nEos @ 9..9 \"\"\n"
    );
}

#[test]
fn injected_tokens_are_indented() {
    let mut config = config(DumpFormat::Template);
    config.injections = true;
    let output = dump_to_string("---\na: 1\n---\n", &config).unwrap_or_default();
    assert_eq!(
        output,
        concat!(
            "LanguageInjectionStart @ 0..4 \"---\\n\"\n",
            "LanguageInjectionContent @ 4..9 \"a: 1\\n\"\n",
            "    Key @ 4..5 \"a\"\n",
            "    Colon @ 5..6 \":\"\n",
            "    Whitespace @ 6..7 \" \"\n",
            "    ScalarNumber @ 7..8 \"1\"\n",
            "    Newline @ 8..9 \"\\n\"\n",
            "    Eos @ 9..9 \"\"\n",
            "LanguageInjectionEnd @ 9..13 \"---\\n\"\n",
            "Eos @ 13..13 \"\"\n",
        )
    );
}

#[test]
fn rejected_configurations() {
    let mut bad_state = config(DumpFormat::Yaml);
    bad_state.state = Some("Nowhere".to_owned());
    assert!(matches!(
        dump_to_string("a", &bad_state),
        Err(DumpError::UnknownState { format: "yaml", .. })
    ));

    let mut past_end = config(DumpFormat::Yaml);
    past_end.offset = 5;
    assert!(matches!(
        dump_to_string("a", &past_end),
        Err(DumpError::OffsetOutOfRange { offset: 5, len: 1 })
    ));

    let mut inside_char = config(DumpFormat::Yaml);
    inside_char.offset = 1;
    assert!(matches!(
        dump_to_string("é", &inside_char),
        Err(DumpError::OffsetInsideChar(1))
    ));

    let mut injections = config(DumpFormat::Html);
    injections.injections = true;
    assert!(matches!(
        dump_to_string("<a>", &injections),
        Err(DumpError::InjectionsNeedTemplate("html"))
    ));
}

#[test]
fn error_messages() {
    assert_eq!(
        DumpError::UnknownState {
            format: "yaml",
            state: "Nowhere".to_owned(),
        }
        .to_string(),
        "unknown yaml state `Nowhere`"
    );
    assert_eq!(
        DumpError::OffsetOutOfRange { offset: 5, len: 1 }.to_string(),
        "offset 5 is past the end of the document (1 bytes)"
    );
}
