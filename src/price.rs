//! Conversion between human-readable decimal amounts and base units
//!
//! Amounts arrive as decimal strings in the chain's primary currency ("1.5")
//! and are placed into instruction arguments and trade-state seeds as integer
//! base units (1_500_000_000). Parsing is exact integer arithmetic; digits
//! beyond the ninth decimal place round half up.

use crate::constants::{BASE_UNITS_PER_TOKEN, BASE_UNIT_DECIMALS};
use crate::tx_builder::errors::{RewardCenterError, RewardCenterResult};

/// Convert a decimal amount string to base units
pub fn to_base_units(amount: &str) -> RewardCenterResult<u64> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(RewardCenterError::invalid_amount(amount, "amount is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(RewardCenterError::invalid_amount(
            amount,
            "negative amounts are not allowed",
        ));
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(RewardCenterError::invalid_amount(amount, "no digits"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RewardCenterError::invalid_amount(amount, "not a decimal number"));
    }

    let overflow = || RewardCenterError::invalid_amount(amount, "amount exceeds u64 base units");

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .map_err(|_| overflow())?
            .checked_mul(BASE_UNITS_PER_TOKEN)
            .ok_or_else(overflow)?
    };

    let decimals = BASE_UNIT_DECIMALS as usize;
    let (kept, rest) = fraction.split_at(fraction.len().min(decimals));
    let mut fraction_units = 0u64;
    for digit in kept.bytes() {
        fraction_units = fraction_units * 10 + u64::from(digit - b'0');
    }
    fraction_units *= 10u64.pow((decimals - kept.len()) as u32);
    if rest.as_bytes().first().is_some_and(|d| *d >= b'5') {
        fraction_units += 1;
    }

    whole_units.checked_add(fraction_units).ok_or_else(overflow)
}

/// Render base units as a decimal string without trailing zeros
pub fn from_base_units(units: u64) -> String {
    let whole = units / BASE_UNITS_PER_TOKEN;
    let fraction = units % BASE_UNITS_PER_TOKEN;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", fraction, width = BASE_UNIT_DECIMALS as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
