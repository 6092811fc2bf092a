//! Minor-unit money handling for the ZAR wallet.
//!
//! Amounts entered by the user arrive as raw strings and are parsed here;
//! everything downstream carries cents as `i64` so ledger arithmetic is exact.

/// Currency minor units (ZAR cents).
pub type Cents = i64;

/// Parses raw user input ("250", "249.99") into cents.
/// Returns `None` for non-numeric or non-finite input.
pub fn parse_amount(input: &str) -> Option<Cents> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value * 100.0).round() as Cents)
}

/// Renders cents as a display string, e.g. `R 1,250.00`.
pub fn format_rands(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let rands = (abs / 100).to_string();
    let minor = abs % 100;

    let mut grouped = String::with_capacity(rands.len() + rands.len() / 3);
    for (i, ch) in rands.chars().enumerate() {
        if i > 0 && (rands.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("R {sign}{grouped}.{minor:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional_amounts() {
        assert_eq!(parse_amount("250"), Some(25_000));
        assert_eq!(parse_amount("249.99"), Some(24_999));
        assert_eq!(parse_amount("  50.00 "), Some(5_000));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("12x"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_parse_keeps_sign() {
        assert_eq!(parse_amount("-10"), Some(-1_000));
        assert_eq!(parse_amount("0"), Some(0));
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_rands(125_000), "R 1,250.00");
        assert_eq!(format_rands(5_000), "R 50.00");
        assert_eq!(format_rands(123_456_789), "R 1,234,567.89");
        assert_eq!(format_rands(0), "R 0.00");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_rands(-25_050), "R -250.50");
    }
}
