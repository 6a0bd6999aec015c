//! Conversion between decimal major units and integer minor units
//!
//! The engine only does integer arithmetic. Amounts entered as decimals
//! (`155.00`) are quantized here, and rejected if they carry more precision
//! than the currency's minor unit.

use crate::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Largest supported minor-unit scale
pub const MAX_SCALE: u32 = 9;

/// Default scale (cents)
pub const DEFAULT_SCALE: u32 = 2;

fn check_scale(scale: u32) -> Result<()> {
    if scale > MAX_SCALE {
        return Err(Error::invalid(format!(
            "unsupported minor unit scale {} (max {})",
            scale, MAX_SCALE
        )));
    }
    Ok(())
}

/// Convert a major-unit amount to minor units at `scale` decimal places
///
/// Fails when the amount has a fractional minor unit or does not fit in `i64`.
pub fn to_minor_units(amount: Decimal, scale: u32) -> Result<i64> {
    check_scale(scale)?;

    let factor = Decimal::from(10i64.pow(scale));
    let scaled = amount
        .checked_mul(factor)
        .ok_or_else(|| Error::invalid(format!("amount {} overflows", amount)))?;

    if !scaled.fract().is_zero() {
        return Err(Error::invalid(format!(
            "amount {} is not a whole number of minor units at scale {}",
            amount, scale
        )));
    }

    scaled
        .to_i64()
        .ok_or_else(|| Error::invalid(format!("amount {} out of range", amount)))
}

/// Convert minor units back to a major-unit decimal for display
pub fn from_minor_units(units: i64, scale: u32) -> Result<Decimal> {
    check_scale(scale)?;
    Ok(Decimal::new(units, scale))
}
