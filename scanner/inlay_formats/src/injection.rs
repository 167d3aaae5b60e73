//! Language injection: regions of a host document scanned by another
//! format.
//!
//! Detection is driven by the template scanner, which consults the
//! [`InjectionDetector`]s of its [`TemplateConfig`]. Once a region is known,
//! [`InjectionRegistry::tokenize`] scans it with the registered format over
//! a bounded stream, so every injected token keeps its absolute offset.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use inlay_core::constants::{is_line_break, CARRIAGE_RETURN, FRONT_MATTER_DELIMITER, LINE_FEED};
use inlay_core::{Format, Scanner, Token, TokenKind};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::html::Html;
use crate::properties::Properties;
use crate::template::{TemplateConfig, TemplateKind, TemplateScanner};
use crate::yaml::Yaml;

/// Token whose kind was erased to its stable name.
pub type ErasedToken = Token<&'static str>;

/// Where in the host document a detector may fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectionTrigger {
    /// Only at offset 0 of the document.
    DocumentStart,
    /// At the start of any line in host content.
    LineStart,
}

/// How an injected region ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndDelimiter {
    /// A line consisting of exactly this text; the delimiter includes the
    /// line's break.
    Line(&'static str),
    /// The first occurrence of this text.
    Literal(&'static str),
}

impl EndDelimiter {
    /// Offset of the first delimiter in `[from, end)` of `text`.
    ///
    /// `from` must be at a line start for [`EndDelimiter::Line`].
    pub fn find(&self, text: &str, from: u32, end: u32) -> Option<u32> {
        let end = (end as usize).min(text.len());
        let from = from as usize;
        if from > end {
            return None;
        }
        let window = text.get(..end)?;
        match *self {
            EndDelimiter::Literal(needle) => memchr::memmem::find(&window.as_bytes()[from..], needle.as_bytes())
                .and_then(|at| u32::try_from(from + at).ok()),
            EndDelimiter::Line(marker) => {
                let bytes = window.as_bytes();
                let mut line = from;
                loop {
                    if is_marker_line(bytes, line, marker) {
                        return u32::try_from(line).ok();
                    }
                    let found = memchr::memchr2(LINE_FEED, CARRIAGE_RETURN, &bytes[line..])?;
                    let at = line + found;
                    line = if bytes[at] == CARRIAGE_RETURN && bytes.get(at + 1) == Some(&LINE_FEED) {
                        at + 2
                    } else {
                        at + 1
                    };
                }
            }
        }
    }

    /// Length of the delimiter starting at `at`, including the line break
    /// of a [`EndDelimiter::Line`]. `None` if no delimiter starts there.
    pub fn len_at(&self, text: &str, at: u32, end: u32) -> Option<u32> {
        let end = (end as usize).min(text.len());
        let bytes = text.as_bytes().get(..end)?;
        let at = at as usize;
        let len = match *self {
            EndDelimiter::Literal(needle) => {
                if !bytes.get(at..)?.starts_with(needle.as_bytes()) {
                    return None;
                }
                needle.len()
            }
            EndDelimiter::Line(marker) => {
                if !is_marker_line(bytes, at, marker) {
                    return None;
                }
                marker.len() + line_break_len(&bytes[at + marker.len()..])
            }
        };
        u32::try_from(len).ok()
    }
}

fn is_marker_line(bytes: &[u8], line: usize, marker: &str) -> bool {
    let Some(rest) = bytes.get(line..) else {
        return false;
    };
    rest.starts_with(marker.as_bytes())
        && rest
            .get(marker.len())
            .map_or(true, |&b| is_line_break(b))
}

fn line_break_len(rest: &[u8]) -> usize {
    match rest {
        [CARRIAGE_RETURN, LINE_FEED, ..] => 2,
        [LINE_FEED | CARRIAGE_RETURN, ..] => 1,
        _ => 0,
    }
}

/// A detected injection, measured from the offset it was detected at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InjectionMatch {
    pub language_id: &'static str,
    /// Length of the opening delimiter, including its line break.
    pub start_len: u32,
    pub end: EndDelimiter,
}

/// Recognizes the start of an injected language in host text.
pub trait InjectionDetector: fmt::Debug + Send + Sync {
    fn trigger(&self) -> InjectionTrigger;

    /// Inspects `text` at `offset` and reports an injection starting there.
    fn detect(&self, text: &str, offset: u32) -> Option<InjectionMatch>;
}

/// YAML front matter: a `---` line at the very start of the document, up to
/// the next `---` line.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrontMatterDetector;

impl InjectionDetector for FrontMatterDetector {
    fn trigger(&self) -> InjectionTrigger {
        InjectionTrigger::DocumentStart
    }

    fn detect(&self, text: &str, offset: u32) -> Option<InjectionMatch> {
        if offset != 0 {
            return None;
        }
        let rest = text.as_bytes().strip_prefix(FRONT_MATTER_DELIMITER.as_bytes())?;
        let break_len = line_break_len(rest);
        if break_len == 0 {
            return None;
        }
        Some(InjectionMatch {
            language_id: "yaml",
            start_len: u32::try_from(FRONT_MATTER_DELIMITER.len() + break_len).ok()?,
            end: EndDelimiter::Line(FRONT_MATTER_DELIMITER),
        })
    }
}

// ─── Regions ──────────────────────────────────────────────────────

/// Content range of one injection in a host document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectionRegion {
    pub language_id: &'static str,
    /// Content between the delimiters; may be empty.
    pub range: Range<u32>,
}

/// Lists the injected regions of a template document, in document order.
#[tracing::instrument(level = "debug", skip_all, fields(len = text.len()))]
pub fn injection_regions(text: &str, config: &TemplateConfig) -> Vec<InjectionRegion> {
    let mut regions = Vec::new();
    let mut open: Option<(&'static str, u32)> = None;
    let mut scanner: TemplateScanner<'_> = config.scanner(text);
    loop {
        let kind = scanner.scan();
        match kind {
            TemplateKind::LanguageInjectionStart => {
                let language_id = scanner.format().injection_language().unwrap_or_default();
                open = Some((language_id, scanner.token_end()));
            }
            TemplateKind::LanguageInjectionEnd | TemplateKind::Eos => {
                if let Some((language_id, start)) = open.take() {
                    regions.push(InjectionRegion {
                        language_id,
                        range: start..scanner.token_offset(),
                    });
                }
                if kind == TemplateKind::Eos {
                    break;
                }
            }
            _ => {}
        }
    }
    debug!(count = regions.len(), "injection regions");
    regions
}

/// The region owning `offset`, or `None` if the host owns it.
pub fn region_at(regions: &[InjectionRegion], offset: u32) -> Option<&InjectionRegion> {
    let index = regions.partition_point(|region| region.range.start <= offset);
    let region = regions.get(index.checked_sub(1)?)?;
    region.range.contains(&offset).then_some(region)
}

// ─── Registry ─────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InjectionError {
    #[error("no scanner registered for injected language `{0}`")]
    UnknownLanguage(String),
}

/// A format that can scan an injected region.
pub trait InjectedLanguage: Send + Sync {
    /// Scans `range` of `text` and returns its tokens through `EOS`.
    fn tokenize(&self, text: &str, range: Range<u32>) -> Vec<ErasedToken>;
}

/// [`InjectedLanguage`] backed by a [`Format`], starting in its initial
/// state.
pub struct FormatLanguage<F>(PhantomData<fn() -> F>);

impl<F> Default for FormatLanguage<F> {
    fn default() -> Self {
        FormatLanguage(PhantomData)
    }
}

impl<F: Format> InjectedLanguage for FormatLanguage<F> {
    fn tokenize(&self, text: &str, range: Range<u32>) -> Vec<ErasedToken> {
        Scanner::<F>::with_range(text, range, F::INITIAL_STATE)
            .tokenize()
            .into_iter()
            .map(|token| token.map_kind(TokenKind::name))
            .collect()
    }
}

/// Scanners for injected regions, keyed by language id.
#[derive(Default)]
pub struct InjectionRegistry {
    languages: FxHashMap<&'static str, Box<dyn InjectedLanguage>>,
}

impl InjectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `yaml`, `properties` and `html`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("yaml", FormatLanguage::<Yaml>::default());
        registry.register("properties", FormatLanguage::<Properties>::default());
        registry.register("html", FormatLanguage::<Html>::default());
        registry
    }

    pub fn register(&mut self, language_id: &'static str, language: impl InjectedLanguage + 'static) {
        self.languages.insert(language_id, Box::new(language));
    }

    pub fn contains(&self, language_id: &str) -> bool {
        self.languages.contains_key(language_id)
    }

    /// Scans one injected region with its registered format.
    pub fn tokenize(&self, text: &str, region: &InjectionRegion) -> Result<Vec<ErasedToken>, InjectionError> {
        let language = self
            .languages
            .get(region.language_id)
            .ok_or_else(|| InjectionError::UnknownLanguage(region.language_id.to_owned()))?;
        debug!(
            language = region.language_id,
            start = region.range.start,
            end = region.range.end,
            "scanning injected region"
        );
        Ok(language.tokenize(text, region.range.clone()))
    }
}

impl fmt::Debug for InjectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.languages.keys().collect();
        ids.sort_unstable();
        f.debug_struct("InjectionRegistry").field("languages", &ids).finish()
    }
}
