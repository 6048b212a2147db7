//! Tests for inspection records and the safety checklist
//!
//! The submission flow itself needs a database; these cover the pure pieces
//! it is built from: checklist evaluation, line arithmetic and the stored
//! breakdown staying consistent with recomputation.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    compute_total, validate_photo_url, ChecklistAnswers, Inspection, LineItem,
};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

mod checklist {
    use super::*;

    fn all_passed() -> ChecklistAnswers {
        ChecklistAnswers {
            regulator_hose_ok: true,
            cylinder_upright: true,
            cylinder_undamaged: true,
            seal_intact: true,
            kitchen_ventilated: true,
            test_date_valid: true,
            consumer_briefed: true,
            remarks: None,
        }
    }

    #[test]
    fn default_is_all_unchecked() {
        let checklist = ChecklistAnswers::default();
        assert_eq!(checklist.passed_count(), 0);
        assert!(!checklist.is_compliant());
    }

    #[test]
    fn full_pass_is_compliant() {
        assert_eq!(all_passed().passed_count(), 7);
        assert!(all_passed().is_compliant());
    }

    #[test]
    fn one_failure_breaks_compliance() {
        let mut checklist = all_passed();
        checklist.seal_intact = false;
        assert_eq!(checklist.passed_count(), 6);
        assert!(!checklist.is_compliant());
    }

    #[test]
    fn remarks_do_not_affect_compliance() {
        let mut checklist = all_passed();
        checklist.remarks = Some("hose due for replacement next visit".to_string());
        assert!(checklist.is_compliant());
    }

    #[test]
    fn checklist_round_trips_through_json() {
        // the backend stores answers as JSONB
        let mut checklist = all_passed();
        checklist.kitchen_ventilated = false;

        let json = serde_json::to_value(&checklist).unwrap();
        let back: ChecklistAnswers = serde_json::from_value(json).unwrap();
        assert_eq!(back.passed_count(), 6);
        assert_eq!(back.kitchen_ventilated, false);
    }
}

mod line_items {
    use super::*;

    #[test]
    fn subtotal_multiplies_price_and_quantity() {
        let item = LineItem {
            product_id: Some(Uuid::from_u128(1)),
            label: "Domestic refill".to_string(),
            unit_price: dec("425.50"),
            quantity: 2,
        };
        assert_eq!(item.subtotal(), dec("851.00"));
    }

    #[test]
    fn unsold_item_has_zero_subtotal() {
        let item = LineItem {
            product_id: Some(Uuid::from_u128(1)),
            label: "Spare regulator".to_string(),
            unit_price: dec("180"),
            quantity: 0,
        };
        assert_eq!(item.subtotal(), Decimal::ZERO);
    }
}

mod stored_breakdown {
    use super::*;

    /// An inspection stored by the backend must reproduce the breakdown the
    /// pricer computed at submission time
    #[test]
    fn stored_amounts_match_recomputation() {
        let line_items = vec![
            LineItem {
                product_id: Some(Uuid::from_u128(1)),
                label: "Domestic refill".to_string(),
                unit_price: dec("850"),
                quantity: 1,
            },
            LineItem {
                product_id: None,
                label: "Suraksha hose".to_string(),
                unit_price: dec("190"),
                quantity: 1,
            },
        ];
        let computed = compute_total(&line_items, true, dec("450"), dec("100"));

        let now = Utc::now();
        let inspection = Inspection {
            id: Uuid::from_u128(0xA),
            distributor_id: Uuid::from_u128(0xB),
            agent_id: Uuid::from_u128(0xC),
            consumer_name: "R. Sharma".to_string(),
            consumer_phone: Some("9812345678".to_string()),
            address: None,
            checklist: ChecklistAnswers::default(),
            kitchen_photo_urls: vec!["https://cdn.example.com/kitchen/1.jpg".to_string()],
            line_items,
            hotplate_exchange: true,
            other_discount: dec("100"),
            subtotal_amount: computed.subtotal,
            total_discount: computed.total_discount,
            total_amount: computed.total,
            inspected_at: now,
            created_at: now,
        };

        assert_eq!(inspection.breakdown(), computed);
    }

    #[test]
    fn photo_references_must_be_uploaded_urls() {
        assert!(validate_photo_url("https://cdn.example.com/kitchen/1.jpg").is_ok());
        assert!(validate_photo_url("file:///sdcard/kitchen.jpg").is_err());
    }
}
