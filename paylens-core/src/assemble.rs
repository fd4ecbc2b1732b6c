//! Transaction assembler: a single-accumulator state machine over the
//! classified line sequence.
//!
//! At most one partial transaction is live at a time. It is created by
//! a name or name+amount line, filled by amount/date/status lines, and
//! consumed when a new start appears, a blank line ends the block, or
//! the input runs out. Partials that never see a positive amount are
//! dropped silently.

use anyhow::Result;

use crate::classify::{LineClass, classify};
use crate::extract::{self, FieldPatterns, RawAmount, RawDate};
use crate::normalize::{self, UNKNOWN_NAME};
use crate::types::{
    Amount, AmountStyle, Direction, ParseOptions, RawLine, Transaction, TransactionStatus,
};

/// Reusable parser: compiled patterns plus configuration. Construction
/// is the only fallible step; parsing itself never errors.
#[derive(Debug)]
pub struct Parser {
    opts: ParseOptions,
    patterns: FieldPatterns,
}

impl Parser {
    pub fn new(opts: ParseOptions) -> Result<Self> {
        Ok(Self {
            patterns: FieldPatterns::new()?,
            opts,
        })
    }

    /// Parse one OCR text blob into ordered transaction records.
    pub fn parse(&self, text: &str) -> Vec<Transaction> {
        let mut out = Vec::new();
        let mut open: Option<Partial> = None;
        let mut prev_was_name = false;

        for (index, raw) in text.lines().enumerate() {
            let line = RawLine { text: raw, index };
            let class = classify(line, &self.patterns, &self.opts);
            let was_name = matches!(&class, LineClass::Name(_));

            match class {
                LineClass::Header | LineClass::MonthlySummary => {}

                LineClass::Noise => {
                    // A blank line ends the current block; stray noise
                    // inside a block is skipped.
                    if raw.trim().is_empty() {
                        self.flush(&mut open, &mut out);
                    }
                }

                LineClass::Date(date) => {
                    if let Some(p) = open.as_mut() {
                        if p.date.is_none() {
                            p.date = Some(date);
                        }
                    }
                    // A date conventionally ends a transaction block in
                    // the source layout.
                    if open.as_ref().is_some_and(Partial::is_complete) {
                        self.flush(&mut open, &mut out);
                    }
                }

                LineClass::Failure => {
                    if let Some(p) = open.as_mut() {
                        p.failed = true;
                    }
                }

                LineClass::Name(name) => {
                    // The name spans lines until an amount shows up.
                    let extends =
                        prev_was_name && open.as_ref().is_some_and(|p| p.amount.is_none());
                    if extends {
                        if let Some(p) = open.as_mut() {
                            p.push_name(&name);
                            p.absorb(raw, &self.patterns, &self.opts);
                        }
                    } else {
                        self.flush(&mut open, &mut out);
                        let mut p = Partial::named(name);
                        p.absorb(raw, &self.patterns, &self.opts);
                        open = Some(p);
                    }
                }

                LineClass::NameAmount { name, amount, date } => {
                    self.flush(&mut open, &mut out);
                    let mut p = Partial::named(name);
                    p.amount = Some(amount);
                    p.date = date;
                    p.absorb(raw, &self.patterns, &self.opts);
                    open = Some(p);
                }

                LineClass::Amount(amount) => {
                    // No open transaction means no orphan record.
                    if let Some(p) = open.as_mut() {
                        if p.amount.is_none() {
                            p.amount = Some(amount);
                        }
                        p.absorb(raw, &self.patterns, &self.opts);
                    }
                }
            }

            prev_was_name = was_name;
        }

        self.flush(&mut open, &mut out);
        out
    }

    fn flush(&self, open: &mut Option<Partial>, out: &mut Vec<Transaction>) {
        if let Some(p) = open.take() {
            if let Some(txn) = p.into_transaction(&self.opts) {
                out.push(txn);
            }
        }
    }
}

/// Working state for the transaction currently being assembled.
#[derive(Debug, Default)]
struct Partial {
    name: Option<String>,
    amount: Option<RawAmount>,
    date: Option<RawDate>,
    credited: bool,
    failed: bool,
    emoji: String,
}

impl Partial {
    fn named(name: String) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    fn push_name(&mut self, more: &str) {
        match self.name.as_mut() {
            Some(name) => {
                name.push(' ');
                name.push_str(more);
            }
            None => self.name = Some(more.to_string()),
        }
    }

    /// Fold one contributing line's sign, failure and emoji markers in.
    /// Runs on the raw line, before "+" stripping.
    fn absorb(&mut self, raw_line: &str, patterns: &FieldPatterns, opts: &ParseOptions) {
        if patterns.credit_marked(raw_line, opts.credit_rule) {
            self.credited = true;
        }
        if extract::is_failed(raw_line) {
            self.failed = true;
        }
        if let Some(glyphs) = extract::emoji(raw_line) {
            self.emoji.push_str(&glyphs);
        }
    }

    /// Name present and a positive amount found.
    fn is_complete(&self) -> bool {
        self.name.is_some() && self.amount.as_ref().is_some_and(|a| a.value > 0.0)
    }

    fn into_transaction(self, opts: &ParseOptions) -> Option<Transaction> {
        let amount = self.amount.filter(|a| a.value > 0.0)?;
        let name = self.name.unwrap_or_else(|| UNKNOWN_NAME.to_string());

        // Misclassified monthly-summary remnants surface as a bare
        // month name; drop them.
        if extract::month_number(name.trim()).is_some() {
            return None;
        }

        let direction = if self.credited {
            Direction::Credited
        } else {
            Direction::Debited
        };
        let status = if self.failed {
            TransactionStatus::Failed
        } else if self.credited {
            TransactionStatus::Credited
        } else {
            TransactionStatus::Debited
        };

        let date = self
            .date
            .map(|d| normalize::iso_date(d.day, d.month, opts.year))
            .unwrap_or_else(|| normalize::UNKNOWN_DATE.to_string());

        let amount = match opts.amount_style {
            AmountStyle::Formatted => Amount::Formatted(amount.text),
            AmountStyle::Numeric => Amount::Numeric(amount.value),
        };

        let emoji = if self.emoji.is_empty() {
            None
        } else {
            Some(self.emoji)
        };
        let (category, description) = match &opts.annotation {
            Some(a) => (Some(a.category.clone()), Some(a.description.clone())),
            None => (None, None),
        };

        Some(Transaction {
            name,
            date,
            amount,
            direction,
            status,
            emoji,
            category,
            description,
        })
    }
}
