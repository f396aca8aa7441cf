//! Plain decimal rendering for government portal uploads.

use rust_decimal::Decimal;

use super::error::{PajakError, Result};

/// Render an amount with two decimal places, `.` as separator and no
/// grouping or currency symbol (e.g. `1000000.00`).
pub fn plain_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{rounded:.2}")
}

/// Effective tariff in percent (`tax / base * 100`), rounded to two places.
///
/// Returns zero when the base is zero.
pub fn derived_rate(base_amount: Decimal, tax_amount: Decimal) -> Result<Decimal> {
    if base_amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    percent_of(tax_amount, base_amount).ok_or_else(|| out_of_range("rate"))
}

/// `amount * 100 / divisor` rounded to two places, `None` on overflow.
pub(crate) fn percent_of(amount: Decimal, divisor: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(divisor)
        .map(|v| v.round_dp(2))
}

/// `a + b`, failing with a validation error naming `field` on overflow.
pub(crate) fn add(a: Decimal, b: Decimal, field: &str) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| out_of_range(field))
}

/// `a - b`, failing with a validation error naming `field` on overflow.
pub(crate) fn sub(a: Decimal, b: Decimal, field: &str) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(|| out_of_range(field))
}

pub(crate) fn out_of_range(field: &str) -> PajakError {
    PajakError::Validation(format!("{field}: amount outside the supported decimal range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn plain_amount_has_no_grouping() {
        assert_eq!(plain_amount(dec!(1000000)), "1000000.00");
        assert_eq!(plain_amount(dec!(24.5)), "24.50");
        assert_eq!(plain_amount(dec!(-400000)), "-400000.00");
    }

    #[test]
    fn plain_amount_rounds_and_normalizes_zero() {
        assert_eq!(plain_amount(dec!(123.456)), "123.46");
        assert_eq!(plain_amount(dec!(-0.001)), "0.00");
    }

    #[test]
    fn derived_rate_basic() {
        assert_eq!(derived_rate(dec!(5000000), dec!(100000)).unwrap(), dec!(2));
        assert_eq!(derived_rate(dec!(0), dec!(10)).unwrap(), dec!(0));
    }

    #[test]
    fn derived_rate_overflow_is_an_error() {
        let err = derived_rate(Decimal::ONE, Decimal::MAX / dec!(2)).unwrap_err();
        assert!(matches!(err, PajakError::Validation(ref m) if m.starts_with("rate:")));
    }

    #[test]
    fn checked_sums() {
        assert_eq!(add(dec!(1.5), dec!(2), "x").unwrap(), dec!(3.5));
        assert!(add(Decimal::MAX, Decimal::ONE, "x").is_err());
        assert!(sub(Decimal::MIN, Decimal::ONE, "x").is_err());
    }
}
