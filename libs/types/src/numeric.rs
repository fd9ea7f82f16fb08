//! Token amount conversions
//!
//! Balances are stored as raw `u64` base units. A mint's `decimals` defines how
//! many of those units make one whole token; conversion to and from the
//! human-readable form goes through rust_decimal so no precision is lost.

use rust_decimal::Decimal;
use thiserror::Error;

/// Largest scale rust_decimal can represent
pub const MAX_DECIMALS: u8 = 28;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Unsupported decimals: {0} (max 28)")]
    UnsupportedDecimals(u8),

    #[error("Amount must not be negative: {0}")]
    Negative(Decimal),

    #[error("Amount {amount} has more than {decimals} fractional digits")]
    ExcessPrecision { amount: Decimal, decimals: u8 },

    #[error("Amount {0} does not fit in base units")]
    Overflow(Decimal),
}

/// Convert raw base units into whole tokens.
///
/// `to_ui_amount(1_500_000, 6)` is `1.5`.
pub fn to_ui_amount(raw: u64, decimals: u8) -> Result<Decimal, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    Ok(Decimal::from_i128_with_scale(raw as i128, decimals as u32))
}

/// Convert whole tokens into raw base units.
///
/// Rejects negative values and values with finer precision than the mint
/// supports rather than rounding.
pub fn from_ui_amount(amount: Decimal, decimals: u8) -> Result<u64, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative(amount));
    }

    let mut scaled = amount.normalize();
    if scaled.scale() > decimals as u32 {
        return Err(AmountError::ExcessPrecision { amount, decimals });
    }

    scaled.rescale(decimals as u32);
    if scaled.scale() != decimals as u32 {
        return Err(AmountError::Overflow(amount));
    }

    u64::try_from(scaled.mantissa()).map_err(|_| AmountError::Overflow(amount))
}
