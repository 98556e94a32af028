//! `surtido-pricing` — pure tax/total computation.
//!
//! The one place line and order money is derived. Intermediate sums keep
//! full decimal precision; rounding to cents happens once, at the final
//! order aggregation. Nothing here errors: callers reject negative input
//! before it reaches these functions.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const CENTS: u32 = 2;

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero)
}

/// Monetary breakdown of a single line, full precision.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub surcharge: Decimal,
    pub total: Decimal,
}

impl LineTotals {
    pub const ZERO: LineTotals = LineTotals {
        subtotal: Decimal::ZERO,
        tax: Decimal::ZERO,
        surcharge: Decimal::ZERO,
        total: Decimal::ZERO,
    };

    /// Display form: each field rounded to cents.
    pub fn rounded(&self) -> LineTotals {
        LineTotals {
            subtotal: to_cents(self.subtotal),
            tax: to_cents(self.tax),
            surcharge: to_cents(self.surcharge),
            total: to_cents(self.total),
        }
    }
}

/// Monetary breakdown of a whole order, rounded to cents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub surcharge: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    pub const ZERO: OrderTotals = OrderTotals {
        subtotal: Decimal::ZERO,
        tax: Decimal::ZERO,
        surcharge: Decimal::ZERO,
        total: Decimal::ZERO,
    };
}

/// Compute one line's money from quantity, tax-exclusive unit price and
/// percentage rates. Full precision; no rounding.
pub fn compute_line(
    quantity: i64,
    unit_price: Decimal,
    tax_rate: Decimal,
    surcharge_rate: Decimal,
) -> LineTotals {
    let subtotal = Decimal::from(quantity) * unit_price;
    let tax = subtotal * tax_rate / Decimal::ONE_HUNDRED;
    let surcharge = subtotal * surcharge_rate / Decimal::ONE_HUNDRED;
    LineTotals {
        subtotal,
        tax,
        surcharge,
        total: subtotal + tax + surcharge,
    }
}

/// Sum line totals into order totals.
///
/// Sums run at full precision; each aggregate field is rounded to cents
/// here and only here.
pub fn compute_order<I>(lines: I) -> OrderTotals
where
    I: IntoIterator<Item = LineTotals>,
{
    let mut subtotal = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    let mut surcharge = Decimal::ZERO;
    let mut total = Decimal::ZERO;

    for line in lines {
        subtotal += line.subtotal;
        tax += line.tax;
        surcharge += line.surcharge;
        total += line.total;
    }

    OrderTotals {
        subtotal: to_cents(subtotal),
        tax: to_cents(tax),
        surcharge: to_cents(surcharge),
        total: to_cents(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn line_breakdown_matches_the_dashboard_example() {
        // 10 units at 10.00, 4 % tax, 0.5 % surcharge.
        let line = compute_line(10, d("10.00"), d("4"), d("0.5"));
        assert_eq!(line.subtotal, d("100.00"));
        assert_eq!(line.tax, d("4.000"));
        assert_eq!(line.surcharge, d("0.5000"));
        assert_eq!(line.total, d("104.5000"));

        let rounded = line.rounded();
        assert_eq!(rounded.tax, d("4.00"));
        assert_eq!(rounded.surcharge, d("0.50"));
        assert_eq!(rounded.total, d("104.50"));
    }

    #[test]
    fn zero_quantity_line_is_all_zero() {
        let line = compute_line(0, d("3.75"), d("21"), d("5.2"));
        assert_eq!(line, LineTotals::ZERO.rounded());
    }

    #[test]
    fn order_totals_sum_lines_then_round_once() {
        // Three lines whose tax is 0.333... each; summed before rounding.
        let lines = vec![compute_line(1, d("3.333"), d("10"), d("0")); 3];
        let order = compute_order(lines);
        assert_eq!(order.subtotal, d("10.00"));
        // 3 * 0.3333 = 0.9999 -> 1.00; rounding each line first would give 0.99.
        assert_eq!(order.tax, d("1.00"));
        assert_eq!(order.surcharge, d("0.00"));
        assert_eq!(order.total, d("11.00"));
    }

    #[test]
    fn empty_order_is_zero() {
        let order = compute_order(std::iter::empty());
        assert_eq!(order, OrderTotals::ZERO);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn cents(value: i64) -> Decimal {
            Decimal::new(value, 2)
        }

        proptest! {
            /// total = subtotal + tax + surcharge, exactly, pre-rounding.
            #[test]
            fn line_total_is_the_sum_of_its_parts(
                quantity in 0i64..10_000,
                price_cents in 0i64..1_000_000,
                tax_bp in 0i64..3_000,
                surcharge_bp in 0i64..1_000,
            ) {
                let line = compute_line(
                    quantity,
                    cents(price_cents),
                    Decimal::new(tax_bp, 2),
                    Decimal::new(surcharge_bp, 2),
                );
                prop_assert_eq!(line.total, line.subtotal + line.tax + line.surcharge);
            }

            /// After rounding, the identity still holds within one cent.
            #[test]
            fn rounded_order_total_is_within_one_cent_of_its_parts(
                quantities in proptest::collection::vec(0i64..500, 1..12),
                price_cents in 1i64..100_000,
                tax_bp in 0i64..3_000,
                surcharge_bp in 0i64..1_000,
            ) {
                let lines: Vec<LineTotals> = quantities
                    .iter()
                    .map(|&q| compute_line(
                        q,
                        cents(price_cents),
                        Decimal::new(tax_bp, 2),
                        Decimal::new(surcharge_bp, 2),
                    ))
                    .collect();
                let order = compute_order(lines);
                let drift = (order.total - (order.subtotal + order.tax + order.surcharge)).abs();
                prop_assert!(drift <= Decimal::new(1, 2), "drift {drift} exceeds one cent");
            }

            /// Aggregation is insensitive to line order.
            #[test]
            fn order_totals_are_permutation_invariant(
                quantities in proptest::collection::vec(0i64..500, 2..8),
                price_cents in 1i64..100_000,
            ) {
                let lines: Vec<LineTotals> = quantities
                    .iter()
                    .map(|&q| compute_line(q, cents(price_cents), Decimal::new(2100, 2), Decimal::new(520, 2)))
                    .collect();
                let mut reversed = lines.clone();
                reversed.reverse();
                prop_assert_eq!(compute_order(lines), compute_order(reversed));
            }
        }
    }
}
