//! Decimal-string arithmetic for native (base-unit) amounts.
//!
//! Amounts stay decimal strings from the parser all the way into spend
//! requests; nothing here ever round-trips through a float. Dividends may be
//! arbitrarily long, only the denomination multiplier is bounded (it has to
//! fit the long-division remainder).

use thiserror::Error;

/// Fractional digits produced when converting native amounts to display
/// units.
pub const DIVIDE_PRECISION: usize = 18;

/// Largest accepted denomination multiplier, 10^30. Keeps the long-division
/// accumulator within u128.
const MAX_MULTIPLIER: u128 = 10u128.pow(30);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount '{0}' is not a base-unit decimal integer")]
    NotDecimal(String),
    #[error("amount '{0}' has more precision than the denomination allows")]
    TooPrecise(String),
    #[error("invalid denomination multiplier '{0}'")]
    InvalidMultiplier(String),
}

/// Check that `s` is a valid native amount: a non-empty string of ASCII
/// digits (a non-negative base-unit integer).
pub fn validate_native(s: &str) -> Result<(), AmountError> {
    if s.is_empty() {
        return Err(AmountError::Empty);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::NotDecimal(s.to_string()));
    }
    Ok(())
}

/// True if `s` is a valid native amount strictly greater than zero.
/// Anything malformed counts as not positive.
pub fn is_positive(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && s.bytes().any(|b| b != b'0')
}

/// Number of decimal places a denomination multiplier implies: the count of
/// trailing zeros ("1000000" -> 6). Malformed or all-zero multipliers map to
/// zero places.
pub fn decimal_places(multiplier: &str) -> u32 {
    let m = multiplier.trim();
    if m.is_empty() || !m.bytes().all(|b| b.is_ascii_digit()) || m.bytes().all(|b| b == b'0') {
        return 0;
    }
    m.bytes().rev().take_while(|&b| b == b'0').count() as u32
}

fn parse_multiplier(multiplier: &str) -> Result<u128, AmountError> {
    let m = multiplier.trim();
    if m.is_empty() || !m.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidMultiplier(multiplier.to_string()));
    }
    match m.parse::<u128>() {
        Ok(v) if v > 0 && v <= MAX_MULTIPLIER => Ok(v),
        _ => Err(AmountError::InvalidMultiplier(multiplier.to_string())),
    }
}

/// Divide a native amount by a denomination multiplier, producing a display
/// amount with up to [`DIVIDE_PRECISION`] fractional digits, trailing zeros
/// trimmed.
///
/// Long division digit by digit, so the dividend can be longer than any
/// machine integer. The remainder is always `< multiplier`, which is why the
/// multiplier is bounded at 10^30.
pub fn native_to_display(native: &str, multiplier: &str) -> Result<String, AmountError> {
    validate_native(native)?;
    let divisor = parse_multiplier(multiplier)?;

    let mut quotient = String::with_capacity(native.len());
    let mut rem: u128 = 0;
    for b in native.bytes() {
        let acc = rem * 10 + u128::from(b - b'0');
        quotient.push(char::from(b'0' + (acc / divisor) as u8));
        rem = acc % divisor;
    }
    let int_part = quotient.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    let mut frac = String::new();
    for _ in 0..DIVIDE_PRECISION {
        if rem == 0 {
            break;
        }
        rem *= 10;
        frac.push(char::from(b'0' + (rem / divisor) as u8));
        rem %= divisor;
    }
    let frac = frac.trim_end_matches('0');

    if frac.is_empty() {
        Ok(int_part.to_string())
    } else {
        Ok(format!("{int_part}.{frac}"))
    }
}

/// Scale a display amount ("0.015") to native units using a power-of-ten
/// multiplier. Rejects amounts with more fractional digits than the
/// denomination can represent rather than rounding them.
pub fn display_to_native(display: &str, multiplier: &str) -> Result<String, AmountError> {
    let shift = power_of_ten_exponent(multiplier)?;
    let s = display.trim();
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::Empty);
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(AmountError::NotDecimal(display.to_string()));
    }
    if frac_part.len() > shift {
        return Err(AmountError::TooPrecise(display.to_string()));
    }

    let mut native = String::with_capacity(int_part.len() + shift);
    native.push_str(int_part);
    native.push_str(frac_part);
    for _ in frac_part.len()..shift {
        native.push('0');
    }
    let trimmed = native.trim_start_matches('0');
    if trimmed.is_empty() {
        Ok("0".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// True if the multiplier is "1" followed only by zeros.
pub fn is_power_of_ten(multiplier: &str) -> bool {
    power_of_ten_exponent(multiplier).is_ok()
}

/// Exponent of a power-of-ten multiplier: "1" followed only by zeros.
fn power_of_ten_exponent(multiplier: &str) -> Result<usize, AmountError> {
    let m = multiplier.trim();
    let mut bytes = m.bytes();
    match bytes.next() {
        Some(b'1') if bytes.all(|b| b == b'0') => Ok(m.len() - 1),
        _ => Err(AmountError::InvalidMultiplier(multiplier.to_string())),
    }
}
