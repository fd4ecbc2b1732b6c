//! End-to-end parses of realistic OCR text blobs, both output shapes.

use paylens_core::{
    Amount, AmountPrecedence, Annotation, Direction, ParseOptions, Parser, Transaction,
    TransactionStatus, parse_transactions,
};

const YEAR: i32 = 2025;

fn parse(text: &str) -> Vec<Transaction> {
    parse_transactions(text, ParseOptions::new(YEAR)).unwrap()
}

#[test]
fn test_credited_three_line_block() {
    let txns = parse("Groceries Mart\n+₹1,250\n3 March");
    assert_eq!(txns.len(), 1);

    let t = &txns[0];
    assert_eq!(t.name, "Groceries Mart");
    assert_eq!(t.amount, Amount::Formatted("₹1,250".to_string()));
    assert_eq!(t.direction, Direction::Credited);
    assert_eq!(t.status, TransactionStatus::Credited);
    assert_eq!(t.date, "2025-03-03");
    assert_eq!(t.emoji, None);
}

#[test]
fn test_summary_skipped_then_failed_transaction() {
    let txns = parse("2025 April\nCoffee Shop\n₹45\nFailed");
    assert_eq!(txns.len(), 1);

    let t = &txns[0];
    assert_eq!(t.name, "Coffee Shop");
    assert_eq!(t.amount, Amount::Formatted("₹45".to_string()));
    assert_eq!(t.direction, Direction::Debited);
    assert_eq!(t.status, TransactionStatus::Failed);
}

#[test]
fn test_plus_and_failure_keyword_on_one_line() {
    let txns = parse("Refund Centre +₹200 Failed");
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].name, "Refund Centre");
    assert_eq!(txns[0].direction, Direction::Credited);
    assert_eq!(txns[0].status, TransactionStatus::Failed);
}

#[test]
fn test_name_date_amount_order() {
    let txns = parse("Landlord Rent\n1 April\n₹8,000");
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].name, "Landlord Rent");
    assert_eq!(txns[0].date, "2025-04-01");
    assert_eq!(txns[0].amount, Amount::Formatted("₹8,000".to_string()));
}

#[test]
fn test_invalid_calendar_date_resolves_to_sentinel() {
    let txns = parse("Ledger Co\n₹100\n31 February");
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].date, "unknown");
}

#[test]
fn test_month_name_lines_never_emit() {
    assert!(parse("2025 March").is_empty());
    assert!(parse("April").is_empty());
    assert!(parse("April ₹12,000").is_empty());
}

#[test]
fn test_full_history_screenshot() {
    let text = "Status\n\
                2025 April\n\
                S Suresh Kumar\n\
                +₹2,500\n\
                1 April\n\
                Pizza Palace 🍕\n\
                ₹649\n\
                30 March\n\
                Mobile Recharge ₹299 Failed\n\
                2025 March\n\
                Payment method";
    let txns = parse(text);
    assert_eq!(txns.len(), 3);

    assert_eq!(txns[0].name, "Suresh Kumar");
    assert_eq!(txns[0].direction, Direction::Credited);
    assert_eq!(txns[0].date, "2025-04-01");

    assert_eq!(txns[1].name, "Pizza Palace");
    assert_eq!(txns[1].emoji.as_deref(), Some("🍕"));
    assert_eq!(txns[1].date, "2025-03-30");
    assert_eq!(txns[1].status, TransactionStatus::Debited);

    assert_eq!(txns[2].name, "Mobile Recharge");
    assert_eq!(txns[2].status, TransactionStatus::Failed);
    assert_eq!(txns[2].date, "unknown");
}

#[test]
fn test_numeric_shape_strips_cosmetics() {
    let opts = ParseOptions::calendar(
        YEAR,
        Annotation {
            category: "Google Pay".to_string(),
            description: "payment successful".to_string(),
        },
    );
    let txns = parse_transactions("Groceries Mart\n+₹1,250\n3 March", opts).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].amount, Amount::Numeric(1250.0));
    assert_eq!(txns[0].category.as_deref(), Some("Google Pay"));
    assert_eq!(txns[0].description.as_deref(), Some("payment successful"));
}

#[test]
fn test_amount_normalization_is_idempotent() {
    // Same text through both shapes: the separator is cosmetic.
    let formatted = parse("Book Store ₹1,234.50");
    assert_eq!(formatted[0].amount, Amount::Formatted("₹1,234.50".to_string()));

    let numeric = parse_transactions(
        "Book Store ₹1,234.50",
        ParseOptions::calendar(
            YEAR,
            Annotation {
                category: "Google Pay".to_string(),
                description: "payment successful".to_string(),
            },
        ),
    )
    .unwrap();
    assert_eq!(numeric[0].amount, Amount::Numeric(1234.50));
}

#[test]
fn test_emoji_round_trips_through_json() {
    let txns = parse("Birthday Gift 🎁\n+₹2,000");
    assert_eq!(txns[0].emoji.as_deref(), Some("🎁"));

    let json = serde_json::to_string_pretty(&txns).unwrap();
    assert!(json.contains("🎁"), "emoji must be preserved verbatim: {json}");

    let plain = parse("Electric Bill ₹780");
    let json = serde_json::to_string(&plain).unwrap();
    assert!(!json.contains("emoji"), "absent emoji must omit the field: {json}");
}

#[test]
fn test_legacy_amount_precedence_mode() {
    let mut opts = ParseOptions::new(YEAR);
    opts.amount_precedence = AmountPrecedence::BareNumberFirst;
    let txns = Parser::new(opts).unwrap().parse("Paid To Vendor 2 ₹500");
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].amount, Amount::Formatted("₹2".to_string()));

    let canonical = parse("Paid To Vendor 2 ₹500");
    assert_eq!(canonical[0].amount, Amount::Formatted("₹500".to_string()));
}

#[test]
fn test_parse_is_stateless_across_calls() {
    let parser = Parser::new(ParseOptions::new(YEAR)).unwrap();
    let first = parser.parse("Coffee Shop ₹45");
    let second = parser.parse("Coffee Shop ₹45");
    assert_eq!(first, second);
}
