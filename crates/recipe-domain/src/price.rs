//! Recipe price constraints.

use rust_decimal::Decimal;

/// Total number of digits a price may carry.
pub const PRICE_MAX_DIGITS: u32 = 5;
/// Number of digits after the decimal point.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Reasons a price is rejected by [`validate_price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("Ensure that there are no more than 5 digits in total.")]
    TooManyDigits,
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooManyDecimalPlaces,
    #[error("Ensure that there are no more than 3 digits before the decimal point.")]
    TooManyWholeDigits,
    #[error("Ensure this value is greater than or equal to 0.")]
    Negative,
}

/// Validate a price against `decimal(5, 2)` and rescale it to two places.
pub fn validate_price(price: Decimal) -> Result<Decimal, PriceError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(PriceError::Negative);
    }
    let normalized = price.normalize();
    let scale = normalized.scale();
    if scale > PRICE_DECIMAL_PLACES {
        return Err(PriceError::TooManyDecimalPlaces);
    }
    let whole_digits = digit_count(normalized.trunc().normalize().mantissa().unsigned_abs());
    let max_whole = PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES;
    if whole_digits + scale > PRICE_MAX_DIGITS {
        return Err(PriceError::TooManyDigits);
    }
    if whole_digits > max_whole {
        return Err(PriceError::TooManyWholeDigits);
    }
    let mut rescaled = normalized;
    rescaled.rescale(PRICE_DECIMAL_PLACES);
    Ok(rescaled)
}

fn digit_count(n: u128) -> u32 {
    if n == 0 { 0 } else { n.ilog10() + 1 }
}
