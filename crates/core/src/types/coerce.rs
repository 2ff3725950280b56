//! Lenient numeric parsing for values read back from storage or user input.
//!
//! Persisted carts and form submissions carry prices and quantities as loosely
//! typed text. These helpers read the longest numeric prefix of a string and
//! ignore whatever follows, so `"12.5 USD"` parses as `12.5` and `"3 items"`
//! as `3`. Input without a leading number yields `None`; callers pick the
//! fallback.

use rust_decimal::Decimal;

/// Exponents beyond this push every representable value to overflow or zero.
const MAX_EXPONENT_STEPS: u32 = 64;

/// Parse the leading integer of `input`.
///
/// Leading whitespace is skipped and an optional sign is honored. Digits
/// stop at the first non-digit, so `"2.9"` parses as `2`. Values too large
/// for `i64` saturate.
///
/// ```
/// use shopcart_core::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix("42"), Some(42));
/// assert_eq!(parse_int_prefix("  -3 left"), Some(-3));
/// assert_eq!(parse_int_prefix("2.9"), Some(2));
/// assert_eq!(parse_int_prefix("abc"), None);
/// ```
#[must_use]
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let (negative, rest) = split_sign(input.trim_start());
    let digits = rest.get(..count_digits(rest.as_bytes(), 0))?;
    if digits.is_empty() {
        return None;
    }

    // Only ASCII digits remain, so the parse can fail on overflow alone.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the leading decimal number of `input`.
///
/// Accepts an optional sign, an integer part, a fractional part, and a
/// trailing exponent (`"1.5e2"`). Either the integer or the fractional part
/// must contain a digit. Returns `None` when there is no leading number or
/// the value does not fit in a [`Decimal`].
///
/// ```
/// use rust_decimal::Decimal;
/// use shopcart_core::parse_float_prefix;
///
/// assert_eq!(parse_float_prefix("120"), Some(Decimal::from(120)));
/// assert_eq!(parse_float_prefix("12.50abc"), Some(Decimal::new(1250, 2)));
/// assert_eq!(parse_float_prefix("free"), None);
/// ```
#[must_use]
pub fn parse_float_prefix(input: &str) -> Option<Decimal> {
    let (negative, rest) = split_sign(input.trim_start());
    let bytes = rest.as_bytes();

    let int_len = count_digits(bytes, 0);
    let mut end = int_len;
    let mut frac_len = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_len = count_digits(bytes, end + 1);
        end += 1 + frac_len;
    }
    if int_len == 0 && frac_len == 0 {
        return None;
    }

    let int_part = rest.get(..int_len)?;
    let mut normalized = String::with_capacity(end + 2);
    if negative {
        normalized.push('-');
    }
    normalized.push_str(if int_part.is_empty() { "0" } else { int_part });
    if frac_len > 0 {
        normalized.push('.');
        normalized.push_str(rest.get(int_len + 1..end)?);
    }

    let mantissa = normalized.parse::<Decimal>().ok()?;
    match parse_exponent(rest, end) {
        Some(exponent) => scale_by_power_of_ten(mantissa, exponent),
        None => Some(mantissa),
    }
}

/// Strip an optional leading `+` or `-`.
fn split_sign(s: &str) -> (bool, &str) {
    s.strip_prefix('-').map_or_else(
        || (false, s.strip_prefix('+').unwrap_or(s)),
        |rest| (true, rest),
    )
}

/// Count consecutive ASCII digits starting at `start`.
fn count_digits(bytes: &[u8], start: usize) -> usize {
    bytes
        .get(start..)
        .map_or(0, |tail| tail.iter().take_while(|b| b.is_ascii_digit()).count())
}

/// Read an `e`/`E` exponent at `pos`, if one with at least one digit is there.
fn parse_exponent(s: &str, pos: usize) -> Option<i64> {
    let bytes = s.as_bytes();
    if !matches!(bytes.get(pos), Some(b'e' | b'E')) {
        return None;
    }
    let (negative, rest) = split_sign(s.get(pos + 1..)?);
    let digits = rest.get(..count_digits(rest.as_bytes(), 0))?;
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn scale_by_power_of_ten(mut value: Decimal, exponent: i64) -> Option<Decimal> {
    let steps = u32::try_from(exponent.unsigned_abs())
        .unwrap_or(u32::MAX)
        .min(MAX_EXPONENT_STEPS);
    for _ in 0..steps {
        value = if exponent > 0 {
            value.checked_mul(Decimal::TEN)?
        } else {
            value.checked_div(Decimal::TEN)?
        };
    }
    Some(value)
}
