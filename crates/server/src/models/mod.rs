//! Domain models and validated request payloads.

pub mod cart;
pub mod order;
pub mod product;

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validate a monetary amount: strictly positive, at most two decimal places.
///
/// Money is carried as `rust_decimal::Decimal` end to end and serialized as
/// an exact decimal string, never a binary float.
pub(crate) fn validate_money(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("money_not_positive"));
    }
    if amount.scale() > 2 {
        return Err(ValidationError::new("money_too_precise"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_validate_money_accepts_two_decimal_places() {
        assert!(validate_money(&Decimal::new(1999, 2)).is_ok()); // 19.99
        assert!(validate_money(&Decimal::new(5, 0)).is_ok()); // 5
    }

    #[test]
    fn test_validate_money_rejects_zero_and_negative() {
        assert!(validate_money(&Decimal::ZERO).is_err());
        assert!(validate_money(&Decimal::new(-100, 2)).is_err());
    }

    #[test]
    fn test_validate_money_rejects_sub_cent_precision() {
        assert!(validate_money(&Decimal::new(19_999, 3)).is_err()); // 19.999
    }
}
