//! Field extractors: independent pattern matchers applied to a single
//! OCR line.
//!
//! All patterns compile once into a [`FieldPatterns`] value; regex
//! compilation is the only fallible step, everything after construction
//! is pure.

use anyhow::Result;
use regex::{Captures, Regex};

use crate::normalize;
use crate::types::{AmountPrecedence, CreditRule};

/// Currency symbol of the source format family.
pub const CURRENCY: char = '₹';

/// Month-name alternation, full names first so abbreviations never
/// shadow them inside one pattern.
const MONTH_ALT: &str = "january|february|march|april|may|june|july|august|september|october|\
                         november|december|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec";

/// Administrative tokens that appear between transaction blocks in the
/// source layout.
const HEADER_TOKENS: [&str; 3] = ["status", "payment method", "date"];

/// Unicode ranges scanned for emoji glyphs: emoticons, pictographs,
/// transport and map symbols, dingbats, flags and the related blocks
/// the source screenshots use for payment notes.
static EMOJI_RANGES: [(u32, u32); 12] = [
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F680, 0x1F6FF), // transport & map symbols
    (0x1F700, 0x1F77F), // alchemical symbols
    (0x1F780, 0x1F7FF), // geometric shapes extended
    (0x1F800, 0x1F8FF), // supplemental arrows
    (0x1F900, 0x1F9FF), // supplemental symbols & pictographs
    (0x1FA00, 0x1FA6F), // chess symbols
    (0x1FA70, 0x1FAFF), // symbols & pictographs extended-A
    (0x2600, 0x26FF),   // miscellaneous symbols
    (0x2700, 0x27BF),   // dingbats
    (0x1F1E6, 0x1F1FF), // regional indicators (flags)
];

/// Matched amount token plus its parsed value. `text` always carries
/// the currency symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAmount {
    pub text: String,
    pub value: f64,
}

/// Day and month as written on a line; resolved against the processing
/// year by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDate {
    pub day: u32,
    pub month: u32,
}

/// Compiled pattern set shared by the classifier and assembler.
#[derive(Debug)]
pub struct FieldPatterns {
    name_leading: Regex,
    name_anywhere: Regex,
    amount_symbol: Regex,
    amount_bare: Regex,
    date: Regex,
    date_line: Regex,
    year: Regex,
    bare_year: Regex,
    month_word: Regex,
    summary_bold: Regex,
    failure_word: Regex,
    plus_amount: Regex,
}

impl FieldPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // Optional single capital-letter token is discarded, then
            // a capitalized word followed by further words.
            name_leading: Regex::new(r"^(?:[A-Z]\s)?([A-Z][a-zA-Z]*(?:\s[A-Za-z]+)*)")?,
            name_anywhere: Regex::new(r"[A-Z][a-zA-Z]*(?:\s[A-Za-z]+)*")?,
            amount_symbol: Regex::new(r"₹(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,2})?")?,
            amount_bare: Regex::new(r"(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,2})?")?,
            date: Regex::new(&format!(r"(?i)\b(\d{{1,2}})\s+({MONTH_ALT})\b"))?,
            date_line: Regex::new(&format!(r"(?i)^\s*(\d{{1,2}})\s+({MONTH_ALT})\s*$"))?,
            year: Regex::new(r"\b20\d{2}\b")?,
            bare_year: Regex::new(r"^(?:19|20)\d{2}$")?,
            month_word: Regex::new(&format!(r"(?i)\b({MONTH_ALT})\b"))?,
            summary_bold: Regex::new(&format!(r"(?i)\*\*\s*({MONTH_ALT})\s*\*\*"))?,
            failure_word: Regex::new(r"(?i)failed")?,
            plus_amount: Regex::new(r"\+\s*₹?\d")?,
        })
    }

    /// Counterparty name: anchored primary pattern, then first
    /// capitalized run anywhere as fallback.
    pub fn name(&self, line: &str) -> Option<String> {
        if let Some(caps) = self.name_leading.captures(line) {
            return Some(caps[1].trim().to_string());
        }
        self.name_anywhere
            .find(line)
            .map(|m| m.as_str().trim().to_string())
    }

    /// Amount token on the line, if any. Under the canonical precedence
    /// a currency-prefixed token anywhere beats an earlier bare number.
    pub fn amount(&self, line: &str, precedence: AmountPrecedence) -> Option<RawAmount> {
        let token = match precedence {
            AmountPrecedence::CurrencySymbolFirst => self
                .amount_symbol
                .find(line)
                .or_else(|| self.amount_bare.find(line)),
            AmountPrecedence::BareNumberFirst => self.amount_bare.find(line),
        }?;
        let text = normalize::formatted_amount(token.as_str());
        let value = normalize::amount_value(&text);
        Some(RawAmount { text, value })
    }

    /// Day-month date anywhere on the line.
    pub fn date(&self, line: &str) -> Option<RawDate> {
        raw_date(self.date.captures(line)?)
    }

    /// A line that is exactly a day-month date.
    pub fn date_line(&self, line: &str) -> Option<RawDate> {
        raw_date(self.date_line.captures(line)?)
    }

    /// Administrative token or bare 4-digit year.
    pub fn is_header(&self, line: &str) -> bool {
        let t = line.trim();
        HEADER_TOKENS.iter().any(|h| t.eq_ignore_ascii_case(h)) || self.bare_year.is_match(t)
    }

    /// Month-total aggregate line: a 4-digit year together with a month
    /// name, or the bolded `**Month** + ₹amount` form.
    pub fn is_monthly_summary(&self, line: &str) -> bool {
        if self.year.is_match(line) && self.month_word.is_match(line) {
            return true;
        }
        self.summary_bold.is_match(line)
            && (self.amount_symbol.is_match(line) || self.amount_bare.is_match(line))
    }

    /// True when the line marks a credit under the given rule. Checked
    /// on the raw line, before "+" stripping.
    pub fn credit_marked(&self, line: &str, rule: CreditRule) -> bool {
        match rule {
            CreditRule::PlusAnywhere => line.contains('+'),
            CreditRule::PlusNextToAmount => self.plus_amount.is_match(line),
        }
    }

    /// Remove failure keywords so status text never reads as a name.
    pub fn strip_failure(&self, line: &str) -> String {
        self.failure_word.replace_all(line, "").into_owned()
    }
}

fn raw_date(caps: Captures) -> Option<RawDate> {
    let day = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    Some(RawDate { day, month })
}

/// Remove "+" markers before name/amount/date matching. The sign is
/// inspected separately on the raw line.
pub fn strip_plus(line: &str) -> String {
    line.replace('+', "")
}

/// Case-insensitive failure keyword anywhere in the line.
pub fn is_failed(line: &str) -> bool {
    line.to_lowercase().contains("failed")
}

/// A line that is nothing but the failure keyword.
pub fn is_failure_marker(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("failed")
}

/// Month number for a full or 3-letter month name.
pub fn month_number(token: &str) -> Option<u32> {
    let t = token.trim().to_lowercase();
    let n = match t.as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(n)
}

/// Every emoji glyph on the line, concatenated in encounter order.
pub fn emoji(line: &str) -> Option<String> {
    let glyphs: String = line.chars().filter(|&c| is_emoji(c)).collect();
    if glyphs.is_empty() { None } else { Some(glyphs) }
}

fn is_emoji(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> FieldPatterns {
        FieldPatterns::new().unwrap()
    }

    #[test]
    fn test_name_discards_single_leading_letter() {
        let p = patterns();
        assert_eq!(p.name("S Suresh Kumar").unwrap(), "Suresh Kumar");
        assert_eq!(p.name("Groceries Mart").unwrap(), "Groceries Mart");
    }

    #[test]
    fn test_name_fallback_matches_anywhere() {
        let p = patterns();
        assert_eq!(p.name("sent to Ramesh").unwrap(), "Ramesh");
        assert_eq!(p.name("₹500 To Landlord").unwrap(), "To Landlord");
        assert!(p.name("1234 ---").is_none());
    }

    #[test]
    fn test_name_stops_at_currency() {
        let p = patterns();
        assert_eq!(p.name("Mobile Recharge ₹299").unwrap(), "Mobile Recharge");
    }

    #[test]
    fn test_amount_currency_symbol_wins() {
        let p = patterns();
        let a = p
            .amount("Paid 2 items ₹500", AmountPrecedence::CurrencySymbolFirst)
            .unwrap();
        assert_eq!(a.text, "₹500");
        assert_eq!(a.value, 500.0);
    }

    #[test]
    fn test_amount_bare_first_legacy_rule() {
        let p = patterns();
        let a = p
            .amount("Paid 2 items ₹500", AmountPrecedence::BareNumberFirst)
            .unwrap();
        assert_eq!(a.text, "₹2");
        assert_eq!(a.value, 2.0);
    }

    #[test]
    fn test_amount_keeps_separators_and_fraction() {
        let p = patterns();
        let a = p
            .amount("₹1,234.50", AmountPrecedence::CurrencySymbolFirst)
            .unwrap();
        assert_eq!(a.text, "₹1,234.50");
        assert_eq!(a.value, 1234.50);
    }

    #[test]
    fn test_amount_prefixes_missing_symbol() {
        let p = patterns();
        let a = p
            .amount("5000", AmountPrecedence::CurrencySymbolFirst)
            .unwrap();
        assert_eq!(a.text, "₹5000");
        assert_eq!(a.value, 5000.0);
    }

    #[test]
    fn test_amount_absent() {
        let p = patterns();
        assert!(
            p.amount("no money here", AmountPrecedence::CurrencySymbolFirst)
                .is_none()
        );
    }

    #[test]
    fn test_date_full_and_abbreviated() {
        let p = patterns();
        assert_eq!(p.date("3 March").unwrap(), RawDate { day: 3, month: 3 });
        assert_eq!(p.date("on 21 dec late").unwrap(), RawDate { day: 21, month: 12 });
        assert!(p.date("March alone").is_none());
    }

    #[test]
    fn test_date_line_is_anchored() {
        let p = patterns();
        assert!(p.date_line("  1 April ").is_some());
        assert!(p.date_line("1 April ₹500").is_none());
    }

    #[test]
    fn test_invalid_calendar_day_still_matches() {
        // Calendar validation is the normalizer's job.
        let p = patterns();
        assert_eq!(p.date("31 February").unwrap(), RawDate { day: 31, month: 2 });
    }

    #[test]
    fn test_header_tokens_and_bare_year() {
        let p = patterns();
        assert!(p.is_header("Status"));
        assert!(p.is_header("payment method"));
        assert!(p.is_header("Date"));
        assert!(p.is_header("2024"));
        assert!(!p.is_header("Coffee Shop"));
    }

    #[test]
    fn test_monthly_summary_needs_year_and_month() {
        let p = patterns();
        assert!(p.is_monthly_summary("2025 April"));
        assert!(p.is_monthly_summary("March 2024 total"));
        assert!(!p.is_monthly_summary("April"));
        assert!(!p.is_monthly_summary("2025 Janitor"));
    }

    #[test]
    fn test_monthly_summary_bold_variant() {
        let p = patterns();
        assert!(p.is_monthly_summary("**April** + ₹5,000"));
        assert!(!p.is_monthly_summary("**April** notes"));
    }

    #[test]
    fn test_credit_marked_rules() {
        let p = patterns();
        assert!(p.credit_marked("+₹500", CreditRule::PlusAnywhere));
        assert!(p.credit_marked("+₹500", CreditRule::PlusNextToAmount));
        assert!(p.credit_marked("Ramesh + Sons ₹500", CreditRule::PlusAnywhere));
        assert!(!p.credit_marked("Ramesh + Sons ₹500", CreditRule::PlusNextToAmount));
        assert!(!p.credit_marked("Ramesh ₹500", CreditRule::PlusAnywhere));
    }

    #[test]
    fn test_failure_helpers() {
        assert!(is_failed("payment FAILED today"));
        assert!(is_failure_marker("  Failed "));
        assert!(!is_failure_marker("payment failed"));
    }

    #[test]
    fn test_emoji_concatenates_in_order() {
        assert_eq!(emoji("Pizza 🍕 party 🎉").unwrap(), "🍕🎉");
        assert!(emoji("no glyphs").is_none());
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("March"), Some(3));
        assert_eq!(month_number("sep"), Some(9));
        assert_eq!(month_number("MAY"), Some(5));
        assert_eq!(month_number("Smarch"), None);
    }
}
