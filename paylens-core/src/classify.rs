//! Per-line classification: an ordered chain of pattern checks, first
//! match wins. Classification is line-local; cross-line decisions live
//! in the assembler.

use crate::extract::{self, FieldPatterns, RawAmount, RawDate};
use crate::types::{ParseOptions, RawLine};

/// What a single OCR line is, plus any eagerly-extracted fields.
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass {
    /// Administrative token or bare year. Discarded.
    Header,
    /// Month-total aggregate. Discarded, never contributes.
    MonthlySummary,
    /// A line that is exactly a day-month date. Contributes the date
    /// and closes a complete transaction block.
    Date(RawDate),
    /// A line that is exactly the failure keyword. Marks the open
    /// transaction failed.
    Failure,
    /// Name and amount on one line; starts a transaction immediately.
    NameAmount {
        name: String,
        amount: RawAmount,
        date: Option<RawDate>,
    },
    /// Capitalized text, no digits, no currency. Starts a transaction
    /// or extends a still-amountless name.
    Name(String),
    /// Amount with no leading name text. Fills the open transaction.
    Amount(RawAmount),
    /// Blank or unrecognized. Skipped; a blank line also ends the
    /// current block.
    Noise,
}

pub fn classify(line: RawLine<'_>, patterns: &FieldPatterns, opts: &ParseOptions) -> LineClass {
    let trimmed = line.text.trim();
    if trimmed.is_empty() {
        return LineClass::Noise;
    }
    if patterns.is_header(trimmed) {
        return LineClass::Header;
    }
    if patterns.is_monthly_summary(trimmed) {
        return LineClass::MonthlySummary;
    }

    // Sign markers are inspected separately on the raw line; strip them
    // before structural matching.
    let scrubbed = extract::strip_plus(trimmed);

    // A bare date must contribute to the open block, not read as a
    // "name plus amount" line.
    if let Some(date) = patterns.date_line(&scrubbed) {
        return LineClass::Date(date);
    }
    if extract::is_failure_marker(&scrubbed) {
        return LineClass::Failure;
    }

    // Status keywords never count as name text.
    let name_text = patterns.strip_failure(&scrubbed);
    let name = patterns.name(&name_text);
    let amount = patterns.amount(&scrubbed, opts.amount_precedence);

    match (name, amount) {
        (Some(name), Some(amount)) => LineClass::NameAmount {
            name,
            amount,
            date: patterns.date(&scrubbed),
        },
        (Some(name), None) if !has_amount_chars(&scrubbed) => LineClass::Name(name),
        (None, Some(amount)) => LineClass::Amount(amount),
        _ => LineClass::Noise,
    }
}

fn has_amount_chars(line: &str) -> bool {
    line.contains(extract::CURRENCY) || line.chars().any(|c| c.is_ascii_digit())
}
