//! Command-line options.

use std::path::{Path, PathBuf};

use crate::DumpError;

/// Scanner selected for a dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DumpFormat {
    Yaml,
    Properties,
    Template,
    Html,
    Expression,
}

impl DumpFormat {
    pub const fn name(self) -> &'static str {
        match self {
            DumpFormat::Yaml => "yaml",
            DumpFormat::Properties => "properties",
            DumpFormat::Template => "template",
            DumpFormat::Html => "html",
            DumpFormat::Expression => "expression",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "yaml" | "yml" => Some(DumpFormat::Yaml),
            "properties" => Some(DumpFormat::Properties),
            "template" => Some(DumpFormat::Template),
            "html" => Some(DumpFormat::Html),
            "expression" => Some(DumpFormat::Expression),
            _ => None,
        }
    }

    /// Format implied by the file extension. Anything unrecognized is
    /// treated as a template.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => DumpFormat::Yaml,
            Some("properties") => DumpFormat::Properties,
            Some("html" | "htm") => DumpFormat::Html,
            _ => DumpFormat::Template,
        }
    }
}

/// Options of one `inlay-dump` invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DumpConfig {
    pub path: PathBuf,
    /// Explicit `--format=`; `None` picks the format from the extension.
    pub format: Option<DumpFormat>,
    /// Byte offset to start scanning at.
    pub offset: u32,
    /// Stable name of the state to start in.
    pub state: Option<String>,
    /// Also scan injected regions with their own formats.
    pub injections: bool,
    /// Print editor positions next to byte offsets.
    pub positions: bool,
    /// Hierarchical log output.
    pub tree: bool,
    pub help: bool,
}

impl DumpConfig {
    pub fn format(&self) -> DumpFormat {
        self.format.unwrap_or_else(|| DumpFormat::from_path(&self.path))
    }
}

/// Parses the arguments following the program name.
pub fn parse_args<I>(args: I) -> Result<DumpConfig, DumpError>
where
    I: IntoIterator<Item = String>,
{
    let mut config = DumpConfig::default();
    let mut path = None;

    for arg in args {
        if let Some(name) = arg.strip_prefix("--format=") {
            let format = DumpFormat::from_name(name).ok_or_else(|| DumpError::UnknownFormat(name.to_owned()))?;
            config.format = Some(format);
        } else if let Some(value) = arg.strip_prefix("--offset=") {
            config.offset = value
                .parse()
                .map_err(|_| DumpError::InvalidOffset(value.to_owned()))?;
        } else if let Some(name) = arg.strip_prefix("--state=") {
            config.state = Some(name.to_owned());
        } else if arg == "--injections" {
            config.injections = true;
        } else if arg == "--positions" {
            config.positions = true;
        } else if arg == "--tree" {
            config.tree = true;
        } else if arg == "--help" || arg == "-h" {
            config.help = true;
        } else if arg.starts_with('-') || path.is_some() {
            return Err(DumpError::UnexpectedArgument(arg));
        } else {
            path = Some(PathBuf::from(arg));
        }
    }

    match path {
        Some(path) => config.path = path,
        None if config.help => {}
        None => return Err(DumpError::MissingFile),
    }
    Ok(config)
}

#[cfg(test)]
mod tests;
