//! Shared scanning engine for text formats embedded in live-edited documents.
//!
//! The crate provides three layers:
//!
//! - [`CharacterStream`]: a cursor over immutable source text with peek,
//!   advance and bounded backtracking primitives.
//! - [`Scanner`]: a generic engine parameterized by a [`Format`]. The format
//!   supplies the token kinds, the lexical states and the per-state
//!   transition function; the engine owns the stream and the token
//!   bookkeeping.
//! - Consumer-facing helpers: [`LineIndex`] for protocol positions and the
//!   [`TokenSink`] boundary for tree builders.
//!
//! # Guarantees
//!
//! Scanning never fails. Malformed input becomes a token (usually the
//! format's `Unknown` kind) with an attached message, every non-EOS token
//! consumes at least one character, and any [`Checkpoint`] taken during a
//! pass is a valid restart point.

pub mod constants;
mod engine;
mod handler;
mod line_index;
mod macros;
mod stream;
mod token;

pub use engine::{Checkpoint, Format, ScanContext, Scanner, Tokens, NO_PROGRESS_MESSAGE};
pub use handler::{drive, TokenSink};
pub use line_index::{LineIndex, Position};
pub use stream::CharacterStream;
pub use token::{ScannerState, Token, TokenKind};
