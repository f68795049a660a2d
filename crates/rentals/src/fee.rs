//! Rental pricing.
//!
//! The unit of pricing is the rental *day*: partial days round up, and every
//! rental bills at least one day. Duration resolution is whole seconds.

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Number of days to bill for a rental spanning `date_out..returned_at`.
///
/// A return before `date_out` (clock skew between writers) clamps to one day
/// rather than erroring.
pub fn billable_days(date_out: DateTime<Utc>, returned_at: DateTime<Utc>) -> u64 {
    let elapsed = (returned_at - date_out).num_seconds();
    if elapsed <= 0 {
        return 1;
    }

    let days = (elapsed + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    days as u64
}

/// Fee for a rental: billable days times the daily rate.
///
/// The product stays inside `u64`: rates are capped at construction
/// (`Movie::MAX_DAILY_RATE`) and chrono's representable range bounds the
/// billable days.
pub fn rental_fee(date_out: DateTime<Utc>, returned_at: DateTime<Utc>, daily_rate: u64) -> u64 {
    billable_days(date_out, returned_at) * daily_rate
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn date_out() -> DateTime<Utc> {
        "2024-03-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn exactly_seven_days_bills_seven() {
        let out = date_out();
        assert_eq!(billable_days(out, out + Duration::days(7)), 7);
        assert_eq!(rental_fee(out, out + Duration::days(7), 2), 14);
    }

    #[test]
    fn a_few_hours_still_bill_one_day() {
        let out = date_out();
        assert_eq!(billable_days(out, out + Duration::hours(3)), 1);
    }

    #[test]
    fn same_instant_bills_one_day() {
        let out = date_out();
        assert_eq!(billable_days(out, out), 1);
    }

    #[test]
    fn one_second_into_a_new_day_bills_that_day() {
        let out = date_out();
        let returned = out + Duration::days(2) + Duration::seconds(1);
        assert_eq!(billable_days(out, returned), 3);
    }

    #[test]
    fn return_before_checkout_clamps_to_one_day() {
        let out = date_out();
        assert_eq!(billable_days(out, out - Duration::days(1)), 1);
    }

    #[test]
    fn fee_scales_with_the_daily_rate() {
        let out = date_out();
        let returned = out + Duration::days(4);
        assert_eq!(rental_fee(out, returned, 0), 0);
        assert_eq!(rental_fee(out, returned, 3), 12);
    }

    #[test]
    fn fee_is_exact_at_the_rate_cap() {
        use reelhouse_catalog::Movie;

        // A century-long rental at the maximum rate still prices exactly.
        let out = date_out();
        let returned = out + Duration::days(36_500);
        assert_eq!(
            rental_fee(out, returned, Movie::MAX_DAILY_RATE),
            36_500 * Movie::MAX_DAILY_RATE
        );
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: billable days is the ceiling of elapsed seconds over
            /// a day, never less than one.
            #[test]
            fn days_are_a_ceiling_over_elapsed_seconds(secs in 0i64..(400 * SECONDS_PER_DAY)) {
                let out = date_out();
                let returned = out + Duration::seconds(secs);
                let days = billable_days(out, returned) as i64;

                prop_assert!(days >= 1);
                prop_assert!(days * SECONDS_PER_DAY >= secs);
                if secs > SECONDS_PER_DAY {
                    prop_assert!((days - 1) * SECONDS_PER_DAY < secs);
                }
            }

            /// Property: billing is monotone in the return time.
            #[test]
            fn later_returns_never_bill_less(
                secs_a in 0i64..(400 * SECONDS_PER_DAY),
                extra in 0i64..(10 * SECONDS_PER_DAY),
            ) {
                let out = date_out();
                let early = out + Duration::seconds(secs_a);
                let late = early + Duration::seconds(extra);

                prop_assert!(billable_days(out, late) >= billable_days(out, early));
            }
        }
    }
}
