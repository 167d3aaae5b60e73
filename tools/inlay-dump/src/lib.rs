//! Token dumps for inspecting the inlay scanners.
//!
//! `inlay-dump <file>` scans a document and prints one token per line:
//!
//! ```text
//! Key @ 0..5 "title"
//! Colon @ 5..6 ":"
//! Unknown @ 12..17 "value" [Expected ':' after key]
//! ```

mod args;
mod dump;

use std::io;
use std::path::PathBuf;
use std::sync::Once;

use inlay_formats::InjectionError;
use thiserror::Error;

pub use args::{parse_args, DumpConfig, DumpFormat};
pub use dump::{dump, format_token, run};

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("missing file to dump")]
    MissingFile,

    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),

    #[error("unknown format `{0}` (expected yaml, properties, template, html or expression)")]
    UnknownFormat(String),

    #[error("unknown {format} state `{state}`")]
    UnknownState { format: &'static str, state: String },

    #[error("invalid offset `{0}`")]
    InvalidOffset(String),

    #[error("offset {offset} is past the end of the document ({len} bytes)")]
    OffsetOutOfRange { offset: u32, len: usize },

    #[error("offset {0} is inside a character")]
    OffsetInsideChar(u32),

    #[error("--injections needs the template format, not {0}")]
    InjectionsNeedTemplate(&'static str),

    #[error("cannot read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write output: {0}")]
    Write(#[from] io::Error),

    #[error(transparent)]
    Injection(#[from] InjectionError),
}

static TRACING_INIT: Once = Once::new();

/// Installs the tracing subscriber once.
///
/// Logging stays off unless `INLAY_LOG` (or, failing that, `RUST_LOG`)
/// holds a filter. `tree` selects the hierarchical span layout.
pub fn init_tracing(tree: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Some(directives) = ["INLAY_LOG", "RUST_LOG"]
            .iter()
            .find_map(|var| std::env::var(var).ok())
        else {
            return;
        };
        let filter = EnvFilter::new(directives);
        if tree {
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
