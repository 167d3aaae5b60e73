//! Concrete format scanners for documents edited live in an IDE.
//!
//! Every format is a [`Format`](inlay_core::Format) driven by the generic
//! engine in `inlay_core`, so all of them share its guarantees: scanning
//! never fails, every token has exact byte offsets, and a
//! [`Checkpoint`](inlay_core::Checkpoint) taken anywhere is a valid restart
//! point.
//!
//! | module | format |
//! |---|---|
//! | [`yaml`] | the YAML subset used for configuration and front matter |
//! | [`properties`] | `.properties` files with `${...}` expressions |
//! | [`template`] | template documents: sections, expressions, injections |
//! | [`expression`] | the inside of a template expression |
//! | [`html`] | HTML hosts |
//!
//! [`injection`] composes them: the template scanner detects embedded
//! regions and [`InjectionRegistry`] scans each one with its own format.

pub mod expression;
pub mod html;
pub mod injection;
pub mod properties;
pub mod template;
pub mod yaml;

pub use expression::{Expression, ExpressionKind, ExpressionScanner, ExpressionState};
pub use html::{Html, HtmlKind, HtmlScanner, HtmlState};
pub use injection::{
    injection_regions, region_at, EndDelimiter, ErasedToken, FrontMatterDetector, InjectionDetector,
    InjectionError, InjectionMatch, InjectionRegion, InjectionRegistry, InjectionTrigger,
};
pub use properties::{
    parse_properties, Properties, PropertiesHandler, PropertiesKind, PropertiesScanner, PropertiesState,
};
pub use template::{Template, TemplateConfig, TemplateKind, TemplateScanner, TemplateState};
pub use yaml::{classify_value, Yaml, YamlKind, YamlScanner, YamlState};
