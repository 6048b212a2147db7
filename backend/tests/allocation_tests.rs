//! Tests for stock allocation across delivery agents
//!
//! Covers:
//! - Allocation conservation (allocated sum never exceeds total stock)
//! - Self-replacement neutrality (an agent's own claim is netted out)
//! - Boundary rejection (available succeeds, available + 1 fails)

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    available_for_agent, existing_for_agent, propose_allocation, total_allocated, Allocation,
    Product, StockError,
};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Deterministic agent ids so scenarios read naturally
fn agent(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn product(total_stock: i32) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::from_u128(0x1000),
        distributor_id: Uuid::from_u128(0x2000),
        name: "Domestic cylinder 14.2kg".to_string(),
        total_stock,
        selling_price: dec("850"),
        min_price: dec("800"),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn alloc(product: &Product, agent_id: Uuid, quantity: i32) -> Allocation {
    Allocation {
        product_id: product.id,
        agent_id,
        quantity,
        price: dec("850"),
        min_price: dec("800"),
    }
}

// =============================================================================
// Availability computation
// =============================================================================

mod availability {
    use super::*;

    #[test]
    fn empty_snapshot_exposes_full_stock() {
        let p = product(10);
        assert_eq!(total_allocated(p.id, &[]), 0);
        assert_eq!(available_for_agent(&p, &[], agent(1)), 10);
    }

    #[test]
    fn own_claim_is_netted_out() {
        // total 10; X holds 4, Y holds 3
        let p = product(10);
        let allocations = vec![alloc(&p, agent(1), 4), alloc(&p, agent(2), 3)];

        // X's own 4 are replaceable, only Y's 3 count against X
        assert_eq!(available_for_agent(&p, &allocations, agent(1)), 7);
        // Y symmetric
        assert_eq!(available_for_agent(&p, &allocations, agent(2)), 6);
        // a third agent sees both claims as used
        assert_eq!(available_for_agent(&p, &allocations, agent(3)), 3);
    }

    #[test]
    fn other_products_do_not_count() {
        let p = product(10);
        let mut foreign = alloc(&p, agent(2), 9);
        foreign.product_id = Uuid::from_u128(0x9999);
        let allocations = vec![alloc(&p, agent(2), 3), foreign];

        assert_eq!(total_allocated(p.id, &allocations), 3);
        assert_eq!(available_for_agent(&p, &allocations, agent(1)), 7);
    }

    #[test]
    fn over_allocated_store_reads_negative() {
        // a pre-existing bug in the store must be visible, not masked
        let p = product(5);
        let allocations = vec![alloc(&p, agent(1), 4), alloc(&p, agent(2), 4)];

        assert_eq!(available_for_agent(&p, &allocations, agent(3)), -3);
    }
}

// =============================================================================
// Proposal validation
// =============================================================================

mod proposal {
    use super::*;

    #[test]
    fn quantity_checked_first() {
        let p = product(10);
        // both quantity and price invalid; quantity wins
        assert_eq!(
            propose_allocation(&p, &[], agent(1), 0, dec("-1"), dec("-1")),
            Err(StockError::InvalidQuantity)
        );
        assert_eq!(
            propose_allocation(&p, &[], agent(1), -5, dec("850"), dec("800")),
            Err(StockError::InvalidQuantity)
        );
    }

    #[test]
    fn non_positive_prices_rejected() {
        let p = product(10);
        assert_eq!(
            propose_allocation(&p, &[], agent(1), 1, dec("0"), dec("800")),
            Err(StockError::InvalidPrice)
        );
        assert_eq!(
            propose_allocation(&p, &[], agent(1), 1, dec("850"), dec("0")),
            Err(StockError::InvalidPrice)
        );
    }

    #[test]
    fn floor_above_price_rejected() {
        let p = product(10);
        assert_eq!(
            propose_allocation(&p, &[], agent(1), 1, dec("850"), dec("900")),
            Err(StockError::PriceBelowMinimum)
        );
    }

    #[test]
    fn floor_equal_to_price_accepted() {
        let p = product(10);
        assert!(propose_allocation(&p, &[], agent(1), 1, dec("850"), dec("850")).is_ok());
    }

    #[test]
    fn growing_own_allocation_within_headroom() {
        // total 10; X holds 4, Y holds 3; X may grow to 7 but not 8
        let p = product(10);
        let allocations = vec![alloc(&p, agent(1), 4), alloc(&p, agent(2), 3)];

        let grown =
            propose_allocation(&p, &allocations, agent(1), 7, dec("850"), dec("800")).unwrap();
        assert_eq!(grown.quantity, 7);

        assert_eq!(
            propose_allocation(&p, &allocations, agent(1), 8, dec("850"), dec("800")),
            Err(StockError::InsufficientStock {
                requested: 8,
                available: 7
            })
        );
    }

    #[test]
    fn new_agent_sees_remaining_pool() {
        // total 10 with 7 already out; Z gets at most 3
        let p = product(10);
        let allocations = vec![alloc(&p, agent(1), 4), alloc(&p, agent(2), 3)];

        assert_eq!(
            propose_allocation(&p, &allocations, agent(3), 4, dec("850"), dec("800")),
            Err(StockError::InsufficientStock {
                requested: 4,
                available: 3
            })
        );
        assert!(propose_allocation(&p, &allocations, agent(3), 3, dec("850"), dec("800")).is_ok());
    }

    #[test]
    fn zero_stock_rejects_any_request() {
        let p = product(0);
        assert_eq!(
            propose_allocation(&p, &[], agent(1), 1, dec("850"), dec("800")),
            Err(StockError::InsufficientStock {
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn identical_inputs_yield_identical_records() {
        let p = product(10);
        let allocations = vec![alloc(&p, agent(2), 3)];

        let first =
            propose_allocation(&p, &allocations, agent(1), 5, dec("850"), dec("800")).unwrap();
        let second =
            propose_allocation(&p, &allocations, agent(1), 5, dec("850"), dec("800")).unwrap();

        assert_eq!(first.product_id, second.product_id);
        assert_eq!(first.agent_id, second.agent_id);
        assert_eq!(first.quantity, second.quantity);
        assert_eq!(first.price, second.price);
        assert_eq!(first.min_price, second.min_price);
    }

    #[test]
    fn snapshot_price_kept_on_record() {
        let p = product(10);
        let record =
            propose_allocation(&p, &[], agent(1), 2, dec("825.50"), dec("799.99")).unwrap();
        assert_eq!(record.price, dec("825.50"));
        assert_eq!(record.min_price, dec("799.99"));
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

mod property_tests {
    use super::*;

    /// Strategy for a small pool of competing agents
    fn agent_strategy() -> impl Strategy<Value = Uuid> {
        (1u128..=5).prop_map(agent)
    }

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (80000i64..=100000).prop_map(|n| Decimal::new(n, 2)) // 800.00 to 1000.00
    }

    /// Apply a replace-not-append assignment to the snapshot
    fn apply(allocations: &mut Vec<Allocation>, accepted: Allocation) {
        allocations.retain(|a| {
            !(a.product_id == accepted.product_id && a.agent_id == accepted.agent_id)
        });
        allocations.push(accepted);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Conservation: any sequence of accepted proposals keeps the
        /// allocated sum within total stock
        #[test]
        fn prop_allocation_conservation(
            total_stock in 0i32..=50,
            requests in prop::collection::vec((agent_strategy(), 1i32..=60), 1..30)
        ) {
            let p = product(total_stock);
            let mut allocations: Vec<Allocation> = Vec::new();

            for (agent_id, quantity) in requests {
                if let Ok(accepted) =
                    propose_allocation(&p, &allocations, agent_id, quantity, dec("850"), dec("800"))
                {
                    apply(&mut allocations, accepted);
                }
                prop_assert!(total_allocated(p.id, &allocations) <= total_stock);
            }
        }

        /// Self-replacement neutrality: headroom plus the agent's own claim
        /// equals stock minus everyone else's claims
        #[test]
        fn prop_self_replacement_neutrality(
            total_stock in 0i32..=50,
            own in 0i32..=20,
            others in prop::collection::vec((2u128..=5, 1i32..=20), 0..4)
        ) {
            let p = product(total_stock);
            let mut allocations: Vec<Allocation> = others
                .iter()
                .map(|&(n, q)| alloc(&p, agent(n), q))
                .collect();
            let allocated_by_others: i32 = allocations.iter().map(|a| a.quantity).sum();
            if own > 0 {
                allocations.push(alloc(&p, agent(1), own));
            }

            let available = available_for_agent(&p, &allocations, agent(1));
            prop_assert_eq!(available, total_stock - allocated_by_others);

            // dropping the agent's own row changes nothing
            let without_own: Vec<Allocation> = allocations
                .iter()
                .filter(|a| a.agent_id != agent(1))
                .cloned()
                .collect();
            prop_assert_eq!(available_for_agent(&p, &without_own, agent(1)), available);
        }

        /// Boundary: a request of exactly `available` succeeds and
        /// `available + 1` fails with the availability figure echoed back
        #[test]
        fn prop_boundary_rejection(
            total_stock in 1i32..=50,
            others in prop::collection::vec((2u128..=5, 1i32..=20), 0..4),
            price in price_strategy()
        ) {
            let p = product(total_stock);
            let mut allocations: Vec<Allocation> = Vec::new();
            for (n, q) in others {
                if let Ok(accepted) = propose_allocation(&p, &allocations, agent(n), q, price, price) {
                    allocations.retain(|a| a.agent_id != accepted.agent_id);
                    allocations.push(accepted);
                }
            }

            let available = available_for_agent(&p, &allocations, agent(1));

            if available > 0 {
                let at_limit =
                    propose_allocation(&p, &allocations, agent(1), available, price, price);
                prop_assert!(at_limit.is_ok());
            }

            let over_limit =
                propose_allocation(&p, &allocations, agent(1), available.max(0) + 1, price, price);
            prop_assert_eq!(
                over_limit,
                Err(StockError::InsufficientStock {
                    requested: available.max(0) + 1,
                    available,
                })
            );
        }

        /// existing_for_agent reads back exactly what the snapshot holds
        #[test]
        fn prop_existing_matches_snapshot(
            quantities in prop::collection::vec(1i32..=20, 1..5)
        ) {
            let p = product(100);
            let allocations: Vec<Allocation> = quantities
                .iter()
                .enumerate()
                .map(|(i, &q)| alloc(&p, agent(i as u128 + 1), q))
                .collect();

            for (i, &q) in quantities.iter().enumerate() {
                prop_assert_eq!(existing_for_agent(p.id, &allocations, agent(i as u128 + 1)), q);
            }
            prop_assert_eq!(existing_for_agent(p.id, &allocations, agent(99)), 0);
        }
    }
}
