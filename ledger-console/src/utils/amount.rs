use rust_decimal::Decimal;
use std::str::FromStr;

pub const DEFAULT_CURRENCY: &str = "INR";

/// Smallest amount an operator may enter: 0.01.
pub fn minimum_amount() -> Decimal {
    Decimal::new(1, 2)
}

/// Parse an operator-entered amount. Anything unparseable or below 0.01 is rejected.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    Decimal::from_str(input.trim())
        .ok()
        .filter(|amount| *amount >= minimum_amount())
}

/// Trimmed, upper-cased, at most three characters; blank falls back to INR.
pub fn normalize_currency(input: Option<&str>) -> String {
    let code: String = input
        .unwrap_or_default()
        .trim()
        .to_uppercase()
        .chars()
        .take(3)
        .collect();
    if code.is_empty() {
        DEFAULT_CURRENCY.to_string()
    } else {
        code
    }
}
