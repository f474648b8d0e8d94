//! Fixed-point token amounts.
//!
//! The contract works on integers scaled by `10^decimals`. User input and
//! display values are plain decimal strings ("2.5", "0.0").

use crate::consts::cli_consts::TOKEN_DECIMALS;
use ethers::types::U256;
use ethers::utils::{self, ConversionError};
use thiserror::Error;

/// Decimal digits of `U256::MAX`, minus one so any shorter number fits.
const MAX_DIGITS: usize = 77;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount is negative: {0}")]
    Negative(String),

    #[error("amount is not a decimal number: {0}")]
    Invalid(String),

    #[error("amount has more than {decimals} fractional digits: {input}")]
    TooPrecise { input: String, decimals: u32 },

    #[error("amount does not fit in 256 bits: {0}")]
    Overflow(String),

    #[error("amount must be greater than zero")]
    NotPositive,

    #[error("unit conversion failed: {0}")]
    Conversion(String),
}

impl From<ConversionError> for AmountError {
    fn from(e: ConversionError) -> Self {
        AmountError::Conversion(e.to_string())
    }
}

/// Converts a decimal string into its fixed-point integer representation.
///
/// Accepts `"12"`, `"12.5"`, `".5"` and `"12."`. Signs, exponents and
/// separators are rejected, and so is precision beyond `decimals`.
pub fn parse_units(input: &str, decimals: u32) -> Result<U256, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative(trimmed.to_string()));
    }

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(AmountError::Invalid(trimmed.to_string()));
    }
    // ethers truncates extra fractional digits; a typed amount must be exact.
    if fraction.len() > decimals as usize {
        return Err(AmountError::TooPrecise {
            input: trimmed.to_string(),
            decimals,
        });
    }
    let significant = whole.trim_start_matches('0').len();
    if significant + decimals as usize > MAX_DIGITS {
        return Err(AmountError::Overflow(trimmed.to_string()));
    }

    Ok(utils::parse_units(trimmed, decimals)?.into())
}

/// Formats a fixed-point integer as a decimal string with trailing zeros
/// trimmed, always keeping one fractional digit (`0` -> `"0.0"`).
pub fn format_units(value: U256, decimals: u32) -> Result<String, AmountError> {
    let formatted = utils::format_units(value, decimals)?;
    let Some((whole, fraction)) = formatted.split_once('.') else {
        return Ok(format!("{}.0", formatted));
    };
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        Ok(format!("{}.0", whole))
    } else {
        Ok(format!("{}.{}", whole, fraction))
    }
}

/// Parses a user-entered token amount and requires it to be strictly positive.
pub fn parse_positive_amount(input: &str) -> Result<U256, AmountError> {
    let units = parse_units(input, TOKEN_DECIMALS)?;
    if units.is_zero() {
        return Err(AmountError::NotPositive);
    }
    Ok(units)
}
