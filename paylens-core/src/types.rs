//! Record types and parse configuration.

use serde::{Deserialize, Serialize};

/// One line of OCR output and its 0-based position in the sequence.
/// Exists only within a single parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub text: &'a str,
    pub index: usize,
}

/// Whether money moved in or out, derived from the "+" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "credited")]
    Credited,
    #[serde(rename = "debited")]
    Debited,
}

/// Final status of a record. Mirrors the direction unless a failure
/// keyword appeared on a contributing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[serde(rename = "credited")]
    Credited,
    #[serde(rename = "debited")]
    Debited,
    #[serde(rename = "failed")]
    Failed,
}

/// Transaction amount in one of the two supported output shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Currency-prefixed string, thousands separators kept ("₹1,250").
    Formatted(String),
    /// Plain decimal value, symbol and separators stripped.
    Numeric(f64),
}

/// One reconstructed transaction record. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Counterparty or title; "Unknown" when no pattern matched.
    pub name: String,
    /// ISO-8601 date, or "unknown" when absent or unparseable.
    pub date: String,
    pub amount: Amount,
    pub direction: Direction,
    pub status: TransactionStatus,
    /// Every emoji glyph from the contributing lines, in encounter
    /// order. Omitted from JSON when none were found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Output shape for amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountStyle {
    /// Keep the formatted currency string (receipt-line output).
    Formatted,
    /// Emit the plain decimal value (calendar-style entries).
    Numeric,
}

/// How a "+" marks a credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditRule {
    /// "+" anywhere in a contributing line.
    PlusAnywhere,
    /// "+" only when adjacent to the amount token (legacy variant).
    PlusNextToAmount,
}

/// Which amount pattern wins when both could match on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPrecedence {
    /// Prefer a currency-symbol-prefixed token anywhere on the line.
    CurrencySymbolFirst,
    /// Search the bare numeric pattern only (legacy variant).
    BareNumberFirst,
}

/// Constant annotations attached by the calling context, never derived
/// from OCR text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub category: String,
    pub description: String,
}

/// Parser configuration. `year` is the processing year used to resolve
/// day-month dates; callers normally pass the current calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    pub year: i32,
    pub amount_style: AmountStyle,
    pub credit_rule: CreditRule,
    pub amount_precedence: AmountPrecedence,
    pub annotation: Option<Annotation>,
}

impl ParseOptions {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            amount_style: AmountStyle::Formatted,
            credit_rule: CreditRule::PlusAnywhere,
            amount_precedence: AmountPrecedence::CurrencySymbolFirst,
            annotation: None,
        }
    }

    /// Calendar-entry shape: numeric amounts plus fixed annotations.
    pub fn calendar(year: i32, annotation: Annotation) -> Self {
        Self {
            amount_style: AmountStyle::Numeric,
            annotation: Some(annotation),
            ..Self::new(year)
        }
    }
}
