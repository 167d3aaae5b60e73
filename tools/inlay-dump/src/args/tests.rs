use pretty_assertions::assert_eq;

use super::*;

fn parse(args: &[&str]) -> Result<DumpConfig, DumpError> {
    parse_args(args.iter().map(|arg| (*arg).to_owned()))
}

#[test]
fn file_only() {
    let config = parse(&["page.html"]).unwrap_or_default();
    assert_eq!(
        config,
        DumpConfig {
            path: PathBuf::from("page.html"),
            ..DumpConfig::default()
        }
    );
    assert_eq!(config.format(), DumpFormat::Html);
}

#[test]
fn all_options() {
    let config = parse(&[
        "--format=yaml",
        "a.txt",
        "--offset=12",
        "--state=WithinFlowMapping",
        "--injections",
        "--positions",
        "--tree",
    ])
    .unwrap_or_default();
    assert_eq!(
        config,
        DumpConfig {
            path: PathBuf::from("a.txt"),
            format: Some(DumpFormat::Yaml),
            offset: 12,
            state: Some("WithinFlowMapping".to_owned()),
            injections: true,
            positions: true,
            tree: true,
            help: false,
        }
    );
    assert_eq!(config.format(), DumpFormat::Yaml);
}

#[test]
fn format_from_extension() {
    let format = |path: &str| DumpFormat::from_path(Path::new(path));
    assert_eq!(format("application.yml"), DumpFormat::Yaml);
    assert_eq!(format("a/b.YAML"), DumpFormat::Yaml);
    assert_eq!(format("application.properties"), DumpFormat::Properties);
    assert_eq!(format("index.htm"), DumpFormat::Html);
    assert_eq!(format("items.txt"), DumpFormat::Template);
    assert_eq!(format("README"), DumpFormat::Template);
}

#[test]
fn format_names_round_trip() {
    for format in [
        DumpFormat::Yaml,
        DumpFormat::Properties,
        DumpFormat::Template,
        DumpFormat::Html,
        DumpFormat::Expression,
    ] {
        assert_eq!(DumpFormat::from_name(format.name()), Some(format));
    }
}

#[test]
fn errors() {
    assert!(matches!(parse(&[]), Err(DumpError::MissingFile)));
    assert!(matches!(
        parse(&["--format=toml", "a"]),
        Err(DumpError::UnknownFormat(name)) if name == "toml"
    ));
    assert!(matches!(
        parse(&["a", "--offset=-1"]),
        Err(DumpError::InvalidOffset(value)) if value == "-1"
    ));
    assert!(matches!(
        parse(&["a", "--verbose"]),
        Err(DumpError::UnexpectedArgument(arg)) if arg == "--verbose"
    ));
    assert!(matches!(
        parse(&["a", "b"]),
        Err(DumpError::UnexpectedArgument(arg)) if arg == "b"
    ));
}

#[test]
fn help_needs_no_file() {
    assert!(matches!(parse(&["--help"]), Ok(DumpConfig { help: true, .. })));
}
