//! Presentation formatters
//!
//! All formatters accept anything [`NumberLike`] and never surface NaN: a
//! value that does not read as a finite number is shown as its documented
//! zero form instead.

use chrono::DateTime;
use serde_json::Value;

use crate::models::SpotBalance;
use crate::value;

/// A value that may or may not read as a finite number.
pub trait NumberLike {
    fn as_number(&self) -> Option<f64>;
}

impl NumberLike for f64 {
    fn as_number(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

macro_rules! number_like_int {
    ($($t:ty),*) => {
        $(impl NumberLike for $t {
            fn as_number(&self) -> Option<f64> {
                Some(*self as f64)
            }
        })*
    };
}

number_like_int!(i32, i64, u32, u64, usize);

impl NumberLike for str {
    fn as_number(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

impl NumberLike for String {
    fn as_number(&self) -> Option<f64> {
        self.as_str().as_number()
    }
}

impl NumberLike for Value {
    fn as_number(&self) -> Option<f64> {
        value::number(self)
    }
}

impl<T: NumberLike> NumberLike for Option<T> {
    fn as_number(&self) -> Option<f64> {
        self.as_ref().and_then(NumberLike::as_number)
    }
}

impl<T: NumberLike + ?Sized> NumberLike for &T {
    fn as_number(&self) -> Option<f64> {
        (**self).as_number()
    }
}

// =============================================================================
// Numbers
// =============================================================================

/// Insert `,` every three digits of an unsigned integer string.
fn group_digits(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Split a rounded magnitude into sign and grouped digits.
///
/// Values that round to zero lose their sign, so `-0.001` never shows as
/// `-0.00`.
fn grouped_fixed(n: f64, decimals: usize) -> (bool, String) {
    let fixed = format!("{:.*}", decimals, n.abs());
    let negative = n < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let grouped = match fixed.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", group_digits(int_part), frac),
        None => group_digits(&fixed),
    };
    (negative, grouped)
}

/// Grouped number with exactly `decimals` fraction digits, or `0`.
pub fn format_number(value: impl NumberLike, decimals: usize) -> String {
    match value.as_number() {
        Some(n) => {
            let (negative, digits) = grouped_fixed(n, decimals);
            if negative {
                format!("-{}", digits)
            } else {
                digits
            }
        }
        None => "0".to_string(),
    }
}

/// Grouped number with at most `max_decimals` fraction digits; trailing
/// zeros are dropped.
pub fn format_compact(value: impl NumberLike, max_decimals: usize) -> String {
    let formatted = format_number(value.as_number().unwrap_or(0.0), max_decimals);
    if !formatted.contains('.') {
        return formatted;
    }
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub const USD_DECIMALS: usize = 2;

/// `$1,234.50`; non-numeric input renders as `$0.00`.
pub fn format_usd(value: impl NumberLike) -> String {
    format_usd_decimals(value, USD_DECIMALS)
}

/// Currency formatting with caller-chosen precision. Non-numeric input
/// always renders as `$0.00`.
pub fn format_usd_decimals(value: impl NumberLike, decimals: usize) -> String {
    match value.as_number() {
        Some(n) => {
            let (negative, digits) = grouped_fixed(n, decimals);
            if negative {
                format!("-${}", digits)
            } else {
                format!("${}", digits)
            }
        }
        None => "$0.00".to_string(),
    }
}

/// Signed percentage: `+1.23%`, `-3.46%`. Zero is `+`; non-numeric input is
/// `0%`.
pub fn format_percent(value: impl NumberLike, decimals: usize) -> String {
    match value.as_number() {
        Some(n) => {
            let sign = if n >= 0.0 { '+' } else { '-' };
            format!("{}{:.*}%", sign, decimals, n.abs())
        }
        None => "0%".to_string(),
    }
}

pub fn calculate_24h_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

// =============================================================================
// Addresses
// =============================================================================

/// `0x1234...5678`. Input that is already no longer than the shortened form
/// is returned as-is (trimmed).
pub fn format_address(address: &str, left: usize, right: usize) -> String {
    let a = address.trim();
    let chars: Vec<char> = a.chars().collect();
    if chars.len() <= left + right + 3 {
        return a.to_string();
    }
    let head: String = chars[..left].iter().collect();
    let tail: String = chars[chars.len() - right..].iter().collect();
    format!("{}...{}", head, tail)
}

/// [`format_address`] with the dashboard's usual 6/4 split.
pub fn short_address(address: &str) -> String {
    format_address(address, 6, 4)
}

// =============================================================================
// PnL classes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnlClass {
    Positive,
    Negative,
    Neutral,
}

impl PnlClass {
    pub fn css_class(&self) -> &'static str {
        match self {
            PnlClass::Positive => "text-success",
            PnlClass::Negative => "text-danger",
            PnlClass::Neutral => "text-muted",
        }
    }
}

/// Zero counts as positive; only non-numeric input is neutral.
pub fn pnl_class(value: impl NumberLike) -> PnlClass {
    match value.as_number() {
        Some(n) if n >= 0.0 => PnlClass::Positive,
        Some(_) => PnlClass::Negative,
        None => PnlClass::Neutral,
    }
}

// =============================================================================
// Time
// =============================================================================

/// `YYYY-MM-DD` (UTC) from unix seconds.
pub fn format_date(timestamp_sec: i64) -> String {
    DateTime::from_timestamp(timestamp_sec, 0)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// `YYYY-MM-DD HH:MM:SS UTC` from unix seconds.
pub fn format_datetime(timestamp_sec: i64) -> String {
    timestamp_sec
        .checked_mul(1000)
        .map(|ms| format_timestamp_millis(Some(ms)))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Like [`format_datetime`] from milliseconds; missing or zero is `N/A`.
pub fn format_timestamp_millis(millis: Option<i64>) -> String {
    millis
        .filter(|ms| *ms != 0)
        .and_then(DateTime::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

// =============================================================================
// Balances
// =============================================================================

pub fn filter_non_zero_balances(balances: &[SpotBalance]) -> Vec<SpotBalance> {
    balances.iter().filter(|b| !b.is_zero()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd("not-a-number"), "$0.00");
        assert_eq!(format_usd("1000000"), "$1,000,000.00");
        assert_eq!(format_usd(-42.125_1), "-$42.13");
        assert_eq!(format_usd(-0.001), "$0.00");
        assert_eq!(format_usd(0), "$0.00");
        assert_eq!(format_usd(f64::NAN), "$0.00");
        assert_eq!(format_usd(&json!("99.999")), "$100.00");
        assert_eq!(format_usd(None::<f64>), "$0.00");
        assert_eq!(format_usd_decimals(1234.5678, 4), "$1,234.5678");
        assert_eq!(format_usd_decimals(999.4, 0), "$999");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(0.5, 4), "0.5000");
        assert_eq!(format_number(-1500, 0), "-1,500");
        assert_eq!(format_number("abc", 2), "0");
        assert_eq!(format_number(123, 0), "123");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(1234.567, 2), "1,234.57");
        assert_eq!(format_compact(1000000.0, 2), "1,000,000");
        assert_eq!(format_compact(1.5, 2), "1.5");
        assert_eq!(format_compact(-0.001, 2), "0");
        assert_eq!(format_compact("x", 2), "0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(-3.456, 2), "-3.46%");
        assert_eq!(format_percent(0, 2), "+0.00%");
        assert_eq!(format_percent("12.3", 1), "+12.3%");
        assert_eq!(format_percent("nope", 2), "0%");
    }

    #[test]
    fn test_format_address() {
        assert_eq!(
            format_address("0x1234567890abcdef1234567890abcdef12345678", 6, 4),
            "0x1234...5678"
        );
        assert_eq!(format_address("0x12345678901", 6, 4), "0x12345678901");
        assert_eq!(format_address("0x123456789012", 6, 4), "0x1234...9012");
        assert_eq!(format_address("   ", 6, 4), "");
        assert_eq!(short_address(" 0xabcdefabcdefabcdefabcdefabcdefabcdefabcd "), "0xabcd...abcd");
    }

    #[test]
    fn test_pnl_class() {
        assert_eq!(pnl_class(10.0), PnlClass::Positive);
        assert_eq!(pnl_class(0), PnlClass::Positive);
        assert_eq!(pnl_class("-0.5"), PnlClass::Negative);
        assert_eq!(pnl_class("n/a"), PnlClass::Neutral);
        assert_eq!(PnlClass::Negative.css_class(), "text-danger");
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_date(1_700_000_000), "2023-11-14");
        assert_eq!(format_datetime(1_700_000_000), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_timestamp_millis(Some(1_700_000_000_000)), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_timestamp_millis(None), "N/A");
        assert_eq!(format_timestamp_millis(Some(0)), "N/A");
    }

    #[test]
    fn test_24h_change() {
        assert_eq!(calculate_24h_change(110.0, 100.0), 10.0);
        assert_eq!(calculate_24h_change(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_filter_non_zero_balances() {
        let balances = vec![
            SpotBalance { token: "USDC".into(), total: 0.0, hold: 0.0 },
            SpotBalance { token: "HYPE".into(), total: 0.0, hold: 1.0 },
            SpotBalance { token: "PURR".into(), total: 3.0, hold: 0.0 },
        ];
        let kept: Vec<_> = filter_non_zero_balances(&balances)
            .into_iter()
            .map(|b| b.token)
            .collect();
        assert_eq!(kept, vec!["HYPE", "PURR"]);
    }
}
