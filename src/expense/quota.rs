//! The monthly expense quota rule.

use rust_decimal::Decimal;

use crate::Error;

/// Check that adding `amount` to a monthly total of `current_total` stays
/// within `quota`.
///
/// Reaching the quota exactly is allowed.
///
/// # Errors
/// Returns [Error::QuotaExceeded] if the new total would be greater than `quota`,
/// or if the sum overflows.
pub fn check_quota(quota: Decimal, current_total: Decimal, amount: Decimal) -> Result<(), Error> {
    let exceeded = Error::QuotaExceeded {
        quota,
        current_total,
        attempted: amount,
    };

    match current_total.checked_add(amount) {
        Some(new_total) if new_total <= quota => Ok(()),
        _ => Err(exceeded),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::Error;

    use super::check_quota;

    #[test]
    fn total_reaching_quota_exactly_is_allowed() {
        assert_eq!(check_quota(dec!(1000.00), dec!(950.00), dec!(50.00)), Ok(()));
    }

    #[test]
    fn total_over_quota_is_rejected() {
        let result = check_quota(dec!(1000.00), dec!(950.00), dec!(50.01));

        assert_eq!(
            result,
            Err(Error::QuotaExceeded {
                quota: dec!(1000.00),
                current_total: dec!(950.00),
                attempted: dec!(50.01),
            })
        );
    }

    #[test]
    fn error_message_uses_two_decimal_places() {
        let error = check_quota(dec!(1000), dec!(950), dec!(50.01)).unwrap_err();

        assert_eq!(
            error.to_string(),
            "the monthly quota of 1000.00 would be exceeded: current total 950.00, \
            attempted to add 50.01"
        );
    }

    #[test]
    fn overflow_is_rejected() {
        assert!(check_quota(Decimal::MAX, Decimal::MAX, Decimal::MAX).is_err());
    }
}
