//! Token amount codec
//!
//! Converts between user-entered decimal text and smallest-unit integers.
//! All arithmetic is exact `U256`; formatted strings are never fed back
//! into comparisons, so a balance check can never be off by a rounding
//! epsilon near the boundary.

use crate::error::ValidationError;
use alloy::primitives::U256;

/// Fraction digits used for balance display
const DISPLAY_DECIMALS: usize = 4;

/// 10^decimals as a U256
fn scale_factor(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals as u64))
}

/// Parse a user-entered decimal string into smallest units.
///
/// Accepts plain decimal notation only (`"1"`, `"0.5"`, `".5"`). The value
/// must be positive and carry at most `decimals` fractional digits.
pub fn parse_amount(text: &str, decimals: u8) -> Result<U256, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::AmountNotPositive);
    }

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (text, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ValidationError::AmountMalformed);
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::AmountMalformed);
    }
    if frac_part.len() > decimals as usize {
        return Err(ValidationError::TooManyDecimals { max: decimals });
    }

    let int_value = if int_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(int_part, 10).map_err(|_| ValidationError::AmountMalformed)?
    };

    let frac_value = if frac_part.is_empty() {
        U256::ZERO
    } else {
        let digits =
            U256::from_str_radix(frac_part, 10).map_err(|_| ValidationError::AmountMalformed)?;
        digits * scale_factor(decimals - frac_part.len() as u8)
    };

    let value = int_value
        .checked_mul(scale_factor(decimals))
        .and_then(|v| v.checked_add(frac_value))
        .ok_or(ValidationError::AmountMalformed)?;

    if value.is_zero() {
        return Err(ValidationError::AmountNotPositive);
    }
    Ok(value)
}

/// Format smallest units as a minimal exact decimal string.
///
/// `format_amount(parse_amount(s, d), d)` reproduces `s` for any canonical
/// input with at most `d` fractional digits.
pub fn format_amount(value: U256, decimals: u8) -> String {
    let scale = scale_factor(decimals);
    let whole = value / scale;
    let frac = value % scale;

    if frac.is_zero() {
        return whole.to_string();
    }

    let mut frac_digits = pad_fraction(frac, decimals);
    while frac_digits.ends_with('0') {
        frac_digits.pop();
    }
    format!("{}.{}", whole, frac_digits)
}

/// Format smallest units for balance display: fixed four fraction digits,
/// truncated. Display only; never compare against this.
pub fn format_amount_display(value: U256, decimals: u8) -> String {
    let shown = DISPLAY_DECIMALS.min(decimals as usize);
    let scale = scale_factor(decimals);
    let whole = value / scale;

    if shown == 0 {
        return whole.to_string();
    }

    let frac = value % scale;
    let frac_digits = pad_fraction(frac, decimals);
    format!("{}.{}", whole, &frac_digits[..shown])
}

/// Render a fractional remainder with leading zeros up to `decimals` digits
fn pad_fraction(frac: U256, decimals: u8) -> String {
    let digits = frac.to_string();
    let mut padded = String::with_capacity(decimals as usize);
    for _ in digits.len()..decimals as usize {
        padded.push('0');
    }
    padded.push_str(&digits);
    padded
}

/// Largest spendable amount given a balance and a gas reserve.
///
/// Pass `U256::ZERO` as the reserve for non-native tokens; native assets
/// keep a configured reserve back for gas. Saturates at zero.
pub fn max_spendable(balance: U256, gas_reserve: U256) -> U256 {
    balance.saturating_sub(gas_reserve)
}
