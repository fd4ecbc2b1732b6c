//! paylens-core: heuristic text-to-structure parser for payment-app
//! screenshot OCR output.
//!
//! The input is noisy, inconsistently formatted multi-line text from an
//! external image-to-text service; the output is an ordered sequence of
//! normalized transaction records. Parsing is line-oriented and
//! best-effort: unmatched fields fall back to sentinels, incomplete
//! records are dropped, and nothing here performs I/O.

pub mod assemble;
pub mod classify;
pub mod extract;
pub mod normalize;
pub mod types;

pub use assemble::Parser;
pub use classify::{LineClass, classify};
pub use extract::{FieldPatterns, RawAmount, RawDate};
pub use types::{
    Amount, AmountPrecedence, AmountStyle, Annotation, CreditRule, Direction, ParseOptions,
    RawLine, Transaction, TransactionStatus,
};

use anyhow::Result;

/// Parse one OCR text blob with freshly compiled patterns. Callers that
/// parse repeatedly should build a [`Parser`] once and reuse it.
pub fn parse_transactions(text: &str, opts: ParseOptions) -> Result<Vec<Transaction>> {
    Ok(Parser::new(opts)?.parse(text))
}
