//! Token printing.

use std::io::{self, BufWriter, Write};

use inlay_core::{drive, Format, LineIndex, Scanner, ScannerState, Token, TokenKind, TokenSink};
use inlay_formats::{
    injection_regions, region_at, Expression, Html, InjectionRegistry, Properties, Template,
    TemplateConfig, TemplateKind, Yaml,
};
use tracing::debug;

use crate::{DumpConfig, DumpError, DumpFormat};

/// Reads the configured file and dumps it to stdout.
pub fn run(config: &DumpConfig) -> Result<(), DumpError> {
    let text = std::fs::read_to_string(&config.path).map_err(|source| DumpError::Read {
        path: config.path.clone(),
        source,
    })?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    dump(&text, config, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Writes the token stream of `text` to `out`, one token per line.
#[tracing::instrument(level = "debug", skip_all, fields(format = config.format().name()))]
pub fn dump<W: Write>(text: &str, config: &DumpConfig, out: &mut W) -> Result<(), DumpError> {
    let format = config.format();
    if config.injections && format != DumpFormat::Template {
        return Err(DumpError::InjectionsNeedTemplate(format.name()));
    }
    check_offset(text, config.offset)?;
    let index = config.positions.then(|| LineIndex::new(text));

    match format {
        DumpFormat::Yaml => dump_format::<Yaml, W>(text, config, format, index.as_ref(), out),
        DumpFormat::Properties => dump_format::<Properties, W>(text, config, format, index.as_ref(), out),
        DumpFormat::Html => dump_format::<Html, W>(text, config, format, index.as_ref(), out),
        DumpFormat::Expression => dump_format::<Expression, W>(text, config, format, index.as_ref(), out),
        DumpFormat::Template if config.injections => dump_with_injections(text, config, index.as_ref(), out),
        DumpFormat::Template => dump_format::<Template, W>(text, config, format, index.as_ref(), out),
    }
}

fn check_offset(text: &str, offset: u32) -> Result<(), DumpError> {
    if offset as usize > text.len() {
        return Err(DumpError::OffsetOutOfRange {
            offset,
            len: text.len(),
        });
    }
    if !text.is_char_boundary(offset as usize) {
        return Err(DumpError::OffsetInsideChar(offset));
    }
    Ok(())
}

fn start_state<F: Format>(config: &DumpConfig, format: DumpFormat) -> Result<F::State, DumpError> {
    match &config.state {
        Some(name) => <F::State as ScannerState>::from_name(name).ok_or_else(|| DumpError::UnknownState {
            format: format.name(),
            state: name.clone(),
        }),
        None => Ok(F::INITIAL_STATE),
    }
}

fn dump_format<F: Format, W: Write>(
    text: &str,
    config: &DumpConfig,
    format: DumpFormat,
    index: Option<&LineIndex>,
    out: &mut W,
) -> Result<(), DumpError> {
    let state = start_state::<F>(config, format)?;
    let mut scanner = Scanner::<F>::at(text, config.offset, state);
    let mut printer = TokenPrinter {
        out,
        source: text,
        index,
        error: None,
    };
    drive(&mut scanner, &mut printer);
    match printer.error {
        Some(err) => Err(DumpError::Write(err)),
        None => Ok(()),
    }
}

/// Host tokens, each injected region's tokens indented below its content
/// token.
fn dump_with_injections<W: Write>(
    text: &str,
    config: &DumpConfig,
    index: Option<&LineIndex>,
    out: &mut W,
) -> Result<(), DumpError> {
    let template = TemplateConfig::default();
    let regions = injection_regions(text, &template);
    let registry = InjectionRegistry::with_defaults();
    debug!(regions = regions.len(), "dumping with injections");

    let state = start_state::<Template>(config, DumpFormat::Template)?;
    let mut scanner = Scanner::<Template>::at(text, config.offset, state);
    for token in scanner.tokens() {
        writeln!(out, "{}", format_token(token.map_kind(TokenKind::name), text, index))?;
        if token.kind != TemplateKind::LanguageInjectionContent {
            continue;
        }
        let Some(region) = region_at(&regions, token.start) else {
            continue;
        };
        for inner in registry.tokenize(text, region)? {
            writeln!(out, "    {}", format_token(inner, text, index))?;
        }
    }
    Ok(())
}

/// One dump line: `Kind @ start..end "text"`, followed by the editor range
/// when `index` is given and by the diagnostic in brackets.
pub fn format_token(token: Token<&'static str>, source: &str, index: Option<&LineIndex>) -> String {
    let mut line = format!("{} @ {}..{}", token.kind, token.start, token.end);
    if let Some(index) = index {
        let start = index.position_at(source, token.start);
        let end = index.position_at(source, token.end);
        line.push_str(&format!(
            " ({}:{}-{}:{})",
            start.line, start.character, end.line, end.character
        ));
    }
    line.push_str(&format!(" {:?}", token.text(source)));
    if let Some(error) = token.error {
        line.push_str(&format!(" [{error}]"));
    }
    line
}

/// Prints every token it is fed, keeping the first write error.
struct TokenPrinter<'a, W> {
    out: &'a mut W,
    source: &'a str,
    index: Option<&'a LineIndex>,
    error: Option<io::Error>,
}

impl<W: Write> TokenPrinter<'_, W> {
    fn print(&mut self, token: Token<&'static str>) {
        if self.error.is_some() {
            return;
        }
        let line = format_token(token, self.source, self.index);
        if let Err(err) = writeln!(self.out, "{line}") {
            self.error = Some(err);
        }
    }
}

impl<K: TokenKind, W: Write> TokenSink<K> for TokenPrinter<'_, W> {
    fn token(&mut self, token: Token<K>, _text: &str) {
        self.print(token.map_kind(TokenKind::name));
    }

    fn finish(&mut self, eos: Token<K>) {
        self.print(eos.map_kind(TokenKind::name));
    }
}

#[cfg(test)]
mod tests;
