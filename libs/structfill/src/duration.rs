//! Duration literals: `300ms`, `1.5h`, `2h45m`, `-0s`, `0`.

use std::time::Duration;

use crate::error::ConvertError;

const UNITS: &[(&str, u64)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000), // U+00B5 micro sign
    ("μs", 1_000), // U+03BC greek mu
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 60 * 60 * 1_000_000_000),
];

fn error(input: &str, reason: &str) -> ConvertError {
    ConvertError::parse("duration", input, reason)
}

/// Parse a sequence of decimal numbers, each with optional fraction and a
/// unit suffix, and a leading sign.
pub fn parse_duration(input: &str) -> Result<Duration, ConvertError> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(error(input, "empty duration"));
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = leading_int(rest).ok_or_else(|| error(input, "overflow"))?;
        let has_whole = after_whole.len() != rest.len();
        rest = after_whole;

        let mut fraction = (0u64, 1.0f64);
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (digits, scale, after_fraction) = leading_fraction(after_dot);
            has_fraction = after_fraction.len() != after_dot.len();
            fraction = (digits, scale);
            rest = after_fraction;
        }
        if !has_whole && !has_fraction {
            return Err(error(input, "expected a number"));
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(error(input, "missing unit"));
        }
        let (unit, after_unit) = rest.split_at(unit_len);
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, nanos)| *nanos)
            .ok_or_else(|| error(input, &format!("unknown unit {unit:?}")))?;
        rest = after_unit;

        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| error(input, "overflow"))?;
        let (digits, divisor) = fraction;
        if digits > 0 {
            let extra = (digits as f64 * (scale as f64 / divisor)) as u64;
            nanos = nanos
                .checked_add(extra)
                .ok_or_else(|| error(input, "overflow"))?;
        }
        total = total
            .checked_add(nanos)
            .ok_or_else(|| error(input, "overflow"))?;
    }

    if negative && total != 0 {
        return Err(ConvertError::out_of_range(input, "Duration"));
    }
    Ok(Duration::from_nanos(total))
}

/// Leading decimal digits; `None` on overflow.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    for digit in s[..end].bytes() {
        value = value.checked_mul(10)?.checked_add(u64::from(digit - b'0'))?;
    }
    Some((value, &s[end..]))
}

/// Leading fraction digits as `(digits, 10^n)`. Digits past `u64` precision
/// are consumed but ignored.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    let mut scale = 1.0;
    let mut overflowed = false;
    for digit in s[..end].bytes() {
        if overflowed {
            continue;
        }
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit - b'0')))
        {
            Some(next) => {
                value = next;
                scale *= 10.0;
            }
            None => overflowed = true,
        }
    }
    (value, scale, &s[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_units() {
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("250us").unwrap(), Duration::from_micros(250));
        assert_eq!(parse_duration("7µs").unwrap(), Duration::from_micros(7));
        assert_eq!(parse_duration("7μs").unwrap(), Duration::from_micros(7));
        assert_eq!(parse_duration("12ns").unwrap(), Duration::from_nanos(12));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("+3m").unwrap(), Duration::from_secs(180));
    }

    #[test]
    fn compound_and_fractional() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("2h45m10.5s").unwrap(), Duration::from_millis(9_910_500));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1.s").unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn zero_forms() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn malformed_literals() {
        for input in ["", "-", "s", "1", "10", "1x", ".s", "1.2.3s", "3 s", "99999999999999999999h"] {
            assert!(parse_duration(input).is_err(), "{input:?} should not parse");
        }
    }

    #[test]
    fn negative_durations_are_out_of_range() {
        let err = parse_duration("-1s").unwrap_err();
        assert_eq!(err, ConvertError::out_of_range("-1s", "Duration"));
    }
}
