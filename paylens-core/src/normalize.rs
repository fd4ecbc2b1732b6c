//! Canonical field conversions: day-month dates to ISO form, amount
//! strings to numbers and back to display form.
//!
//! Every function here is pure and total; invalid input yields the
//! documented sentinel instead of an error.

use chrono::NaiveDate;

use crate::extract::CURRENCY;

/// Placeholder title when no name pattern matched.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Placeholder when a date is absent or fails calendar validation.
pub const UNKNOWN_DATE: &str = "unknown";

/// Resolve a day and month against `year` as an ISO-8601 date string.
/// Combinations that fail calendar validation ("31 February") yield the
/// sentinel.
pub fn iso_date(day: u32, month: u32, year: i32) -> String {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Numeric value of an amount token; the currency symbol and thousands
/// separators are cosmetic. Unparseable input yields 0.0, which the
/// emission invariant then discards.
pub fn amount_value(token: &str) -> f64 {
    token
        .trim()
        .trim_start_matches(CURRENCY)
        .trim()
        .replace(',', "")
        .parse()
        .unwrap_or(0.0)
}

/// Display form of an amount token: currency symbol prepended when
/// missing, separators kept as matched.
pub fn formatted_amount(token: &str) -> String {
    let t = token.trim();
    if t.starts_with(CURRENCY) {
        t.to_string()
    } else {
        format!("{CURRENCY}{t}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date() {
        assert_eq!(iso_date(3, 3, 2025), "2025-03-03");
        assert_eq!(iso_date(1, 4, 2025), "2025-04-01");
    }

    #[test]
    fn test_invalid_calendar_combination_is_sentinel() {
        assert_eq!(iso_date(31, 2, 2025), "unknown");
        assert_eq!(iso_date(0, 1, 2025), "unknown");
    }

    #[test]
    fn test_amount_value_ignores_cosmetics() {
        assert_eq!(amount_value("₹1,234.50"), 1234.50);
        assert_eq!(amount_value("1,234.50"), 1234.50);
        assert_eq!(amount_value("₹45"), 45.0);
        assert_eq!(amount_value("garbage"), 0.0);
    }

    #[test]
    fn test_amount_round_trip_preserves_value() {
        // The separator is cosmetic: re-rendering keeps the value.
        let text = formatted_amount("1,234.50");
        assert_eq!(text, "₹1,234.50");
        assert_eq!(amount_value(&text), 1234.50);
    }

    #[test]
    fn test_formatted_amount_keeps_existing_symbol() {
        assert_eq!(formatted_amount("₹500"), "₹500");
        assert_eq!(formatted_amount(" 500 "), "₹500");
    }
}
