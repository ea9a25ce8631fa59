//! Bounds for quantities and money. Every such column is `DECIMAL(16, 4)`, so a
//! value must fit twelve integer digits and four fractional ones before it is
//! written, and products are computed with checked arithmetic.

use crate::{entities::inventory_item::ItemCategory, errors::ServiceError};
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits the columns keep
pub const SCALE: u32 = 4;

/// Exclusive magnitude bound, 10^12
fn limit() -> Decimal {
    Decimal::from(1_000_000_000_000i64)
}

fn fits_column(field: &str, value: Decimal) -> Result<Decimal, ServiceError> {
    if value.normalize().scale() > SCALE {
        return Err(ServiceError::ValidationError(format!(
            "{} allows at most {} decimal places",
            field, SCALE
        )));
    }
    if value.abs() >= limit() {
        return Err(ServiceError::ValidationError(format!(
            "{} must be less than {}",
            field, limit()
        )));
    }
    Ok(value)
}

/// A stock quantity moving in or out: strictly positive and storable.
pub fn positive_quantity(field: &str, value: Decimal) -> Result<Decimal, ServiceError> {
    if value <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "{} must be greater than zero",
            field
        )));
    }
    fits_column(field, value)
}

/// A signed correction, as used by stock adjustments.
pub fn non_zero_quantity(field: &str, value: Decimal) -> Result<Decimal, ServiceError> {
    if value.is_zero() {
        return Err(ServiceError::ValidationError(format!(
            "{} must be non-zero",
            field
        )));
    }
    fits_column(field, value)
}

/// Prices, wages, thresholds and opening balances.
pub fn non_negative_amount(field: &str, value: Decimal) -> Result<Decimal, ServiceError> {
    if value < Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "{} cannot be negative",
            field
        )));
    }
    fits_column(field, value)
}

/// Chickens are counted, never weighed.
pub fn whole_if_counted(
    category: ItemCategory,
    field: &str,
    value: Decimal,
) -> Result<Decimal, ServiceError> {
    if category == ItemCategory::Chicken && !value.fract().is_zero() {
        return Err(ServiceError::ValidationError(format!(
            "{} of chickens must be a whole number of birds",
            field
        )));
    }
    Ok(value)
}

/// `quantity * rate`, rounded to the column scale. Fails instead of panicking
/// when the product overflows, and rejects totals the columns cannot hold.
pub fn line_total(quantity: Decimal, rate: Decimal) -> Result<Decimal, ServiceError> {
    let too_large =
        || ServiceError::ValidationError(format!("total amount must be less than {}", limit()));
    let total = quantity
        .checked_mul(rate)
        .ok_or_else(too_large)?
        .round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    if total.abs() >= limit() {
        return Err(too_large());
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0.0001))]
    #[case(dec!(2.5000000))]
    #[case(dec!(999999999999.9999))]
    fn storable_quantities_pass(#[case] value: Decimal) {
        assert_eq!(positive_quantity("quantity", value).unwrap(), value);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-1))]
    #[case(dec!(0.00001))]
    #[case(dec!(1000000000000))]
    #[case(dec!(70000000000000000000))]
    fn unstorable_quantities_are_rejected(#[case] value: Decimal) {
        assert_matches!(
            positive_quantity("quantity", value),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn adjustments_may_be_negative_but_not_zero() {
        assert_eq!(
            non_zero_quantity("delta", dec!(-12.5)).unwrap(),
            dec!(-12.5)
        );
        assert_matches!(
            non_zero_quantity("delta", Decimal::ZERO),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn amounts_allow_zero_only_from_above() {
        assert!(non_negative_amount("unit_price", Decimal::ZERO).is_ok());
        assert_matches!(
            non_negative_amount("unit_price", dec!(-0.5)),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn only_chickens_must_be_whole() {
        let birds = |qty| whole_if_counted(ItemCategory::Chicken, "quantity", qty);
        let feed = |qty| whole_if_counted(ItemCategory::Feed, "quantity", qty);
        assert!(birds(dec!(2.5)).is_err());
        assert!(birds(dec!(-3)).is_ok());
        assert!(feed(dec!(2.5)).is_ok());
    }

    #[test]
    fn line_total_rounds_to_column_scale() {
        assert_eq!(line_total(dec!(12), dec!(850)).unwrap(), dec!(10200));
        assert_eq!(
            line_total(dec!(0.3333), dec!(0.3333)).unwrap(),
            dec!(0.1111)
        );
        assert_eq!(line_total(dec!(10.5), dec!(450)).unwrap(), dec!(4725));
    }

    #[test]
    fn overflowing_totals_are_rejected_instead_of_panicking() {
        assert_matches!(
            line_total(Decimal::MAX, dec!(2)),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            line_total(dec!(999999999999), dec!(31)),
            Err(ServiceError::ValidationError(_))
        );
    }
}
