//! Tests for inspection sale pricing
//!
//! Covers:
//! - Discount floor (payable amount never goes negative)
//! - Discount clamp (a negative discount never raises the price)
//! - Determinism (bit-identical output on repeated evaluation)

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{compute_discount, compute_subtotal, compute_total, LineItem};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn item(unit_price: &str, quantity: i32) -> LineItem {
    LineItem {
        product_id: Some(Uuid::from_u128(0x1000)),
        label: "Domestic refill".to_string(),
        unit_price: dec(unit_price),
        quantity,
    }
}

// =============================================================================
// Subtotal
// =============================================================================

mod subtotal {
    use super::*;

    #[test]
    fn empty_sale_is_zero() {
        assert_eq!(compute_subtotal(&[]), Decimal::ZERO);
    }

    #[test]
    fn sums_line_items() {
        let items = vec![item("850", 1), item("425.50", 2)];
        assert_eq!(compute_subtotal(&items), dec("1701.00"));
    }

    #[test]
    fn zero_quantity_means_not_sold() {
        // a catalog item left at quantity 0 contributes nothing
        let items = vec![item("850", 1), item("1200", 0)];
        assert_eq!(compute_subtotal(&items), dec("850"));
    }

    #[test]
    fn negative_quantity_contributes_zero() {
        let items = vec![item("850", -2)];
        assert_eq!(compute_subtotal(&items), Decimal::ZERO);
    }

    #[test]
    fn ad_hoc_items_count_like_catalog_items() {
        let items = vec![LineItem {
            product_id: None,
            label: "Hotplate upsell".to_string(),
            unit_price: dec("1500"),
            quantity: 1,
        }];
        assert_eq!(compute_subtotal(&items), dec("1500"));
    }
}

// =============================================================================
// Discounts and total
// =============================================================================

mod totals {
    use super::*;

    #[test]
    fn hotplate_and_other_discount_stack() {
        // 850 sale, 450 hotplate exchange, 100 goodwill
        let items = vec![item("850", 1)];
        let breakdown = compute_total(&items, true, dec("450"), dec("100"));

        assert_eq!(breakdown.subtotal, dec("850"));
        assert_eq!(breakdown.hotplate_component, dec("450"));
        assert_eq!(breakdown.other_component, dec("100"));
        assert_eq!(breakdown.total_discount, dec("550"));
        assert_eq!(breakdown.total, dec("300"));
    }

    #[test]
    fn excess_discount_floors_at_zero() {
        // raw total would be 850 - 1450 = -600
        let items = vec![item("850", 1)];
        let breakdown = compute_total(&items, true, dec("450"), dec("1000"));

        assert_eq!(breakdown.total_discount, dec("1450"));
        assert_eq!(breakdown.total, Decimal::ZERO);
    }

    #[test]
    fn no_flags_no_discount() {
        let items = vec![item("850", 1)];
        let breakdown = compute_total(&items, false, dec("450"), dec("0"));

        assert_eq!(breakdown.hotplate_component, Decimal::ZERO);
        assert_eq!(breakdown.total_discount, Decimal::ZERO);
        assert_eq!(breakdown.total, dec("850"));
    }

    #[test]
    fn empty_sale_with_no_discounts() {
        let breakdown = compute_total(&[], false, dec("450"), dec("0"));

        assert_eq!(breakdown.subtotal, Decimal::ZERO);
        assert_eq!(breakdown.total_discount, Decimal::ZERO);
        assert_eq!(breakdown.total, Decimal::ZERO);
    }

    #[test]
    fn negative_discount_clamped() {
        let items = vec![item("850", 1)];
        let clamped = compute_total(&items, false, dec("450"), dec("-50"));
        let zeroed = compute_total(&items, false, dec("450"), dec("0"));

        assert_eq!(clamped, zeroed);
        assert_eq!(clamped.total, dec("850"));
    }

    #[test]
    fn compute_discount_matches_breakdown() {
        assert_eq!(compute_discount(true, dec("450"), dec("100")), dec("550"));
        assert_eq!(compute_discount(false, dec("450"), dec("100")), dec("100"));
        assert_eq!(compute_discount(false, dec("450"), dec("-100")), Decimal::ZERO);
    }

    #[test]
    fn repeated_evaluation_is_bit_identical() {
        let items = vec![item("850", 1), item("33.33", 3), item("425.50", 2)];
        let first = compute_total(&items, true, dec("450"), dec("123.45"));

        for _ in 0..1000 {
            let again = compute_total(&items, true, dec("450"), dec("123.45"));
            assert_eq!(again, first);
        }
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

mod property_tests {
    use super::*;

    /// Strategy for unit prices with at most 2 fractional digits
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=200000).prop_map(|n| Decimal::new(n, 2)) // 0.00 to 2000.00
    }

    fn discount_strategy() -> impl Strategy<Value = Decimal> {
        (-100000i64..=100000).prop_map(|n| Decimal::new(n, 2))
    }

    fn items_strategy() -> impl Strategy<Value = Vec<LineItem>> {
        prop::collection::vec((price_strategy(), -3i32..=10), 0..8).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(unit_price, quantity)| LineItem {
                    product_id: None,
                    label: "item".to_string(),
                    unit_price,
                    quantity,
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Discount floor: the payable amount is never negative, and is zero
        /// exactly when the discount covers the subtotal
        #[test]
        fn prop_discount_floor(
            items in items_strategy(),
            hotplate in any::<bool>(),
            rate in price_strategy(),
            other in discount_strategy()
        ) {
            let breakdown = compute_total(&items, hotplate, rate, other);

            prop_assert!(breakdown.total >= Decimal::ZERO);
            if breakdown.total_discount >= breakdown.subtotal {
                prop_assert_eq!(breakdown.total, Decimal::ZERO);
            } else {
                prop_assert_eq!(breakdown.total, breakdown.subtotal - breakdown.total_discount);
            }
        }

        /// Discount clamp: any negative free-form discount behaves as zero
        #[test]
        fn prop_negative_discount_equals_zero(
            items in items_strategy(),
            hotplate in any::<bool>(),
            rate in price_strategy(),
            magnitude in 1i64..=100000
        ) {
            let negative = Decimal::new(-magnitude, 2);
            let clamped = compute_total(&items, hotplate, rate, negative);
            let zeroed = compute_total(&items, hotplate, rate, Decimal::ZERO);

            prop_assert_eq!(clamped, zeroed);
        }

        /// Subtotal ignores non-positive quantities and sums the rest
        #[test]
        fn prop_subtotal_sums_sold_items(items in items_strategy()) {
            let expected: Decimal = items
                .iter()
                .filter(|i| i.quantity > 0)
                .map(|i| i.unit_price * Decimal::from(i.quantity))
                .sum();

            prop_assert_eq!(compute_subtotal(&items), expected);
            prop_assert!(compute_subtotal(&items) >= Decimal::ZERO);
        }

        /// The breakdown components always reconcile
        #[test]
        fn prop_breakdown_reconciles(
            items in items_strategy(),
            hotplate in any::<bool>(),
            rate in price_strategy(),
            other in discount_strategy()
        ) {
            let breakdown = compute_total(&items, hotplate, rate, other);

            prop_assert_eq!(
                breakdown.total_discount,
                breakdown.hotplate_component + breakdown.other_component
            );
            prop_assert_eq!(
                breakdown.total_discount,
                compute_discount(hotplate, rate, other)
            );
            prop_assert!(breakdown.other_component >= Decimal::ZERO);
            if !hotplate {
                prop_assert_eq!(breakdown.hotplate_component, Decimal::ZERO);
            }
        }

        /// Determinism: evaluation order and repetition change nothing
        #[test]
        fn prop_repeated_evaluation_identical(
            items in items_strategy(),
            hotplate in any::<bool>(),
            rate in price_strategy(),
            other in discount_strategy()
        ) {
            let first = compute_total(&items, hotplate, rate, other);
            for _ in 0..10 {
                prop_assert_eq!(compute_total(&items, hotplate, rate, other), first.clone());
            }
        }
    }
}
