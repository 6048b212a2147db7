//! WebAssembly module for the LPG Safety Inspection Platform
//!
//! Provides client-side computation for:
//! - Allocation headroom preview on the assignment screen
//! - Inspection total preview before submission
//! - Offline data validation
//!
//! The backend recomputes everything server-side; these exports only keep
//! the screens responsive while offline.

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Allocation headroom for one agent, own claim netted out
///
/// Negative headroom (a stored over-allocation) is shown as zero capacity.
#[wasm_bindgen]
pub fn available_quantity(total_stock: i32, total_allocated: i32, existing_for_agent: i32) -> i32 {
    let allocated_by_others = total_allocated - existing_for_agent;
    (total_stock - allocated_by_others).max(0)
}

/// Validate a proposed assignment before it is sent to the backend
///
/// Returns an error message, or `None` when the proposal would pass.
#[wasm_bindgen]
pub fn check_allocation(
    quantity: i32,
    price: &str,
    min_price: &str,
    available: i32,
) -> Option<String> {
    if quantity <= 0 {
        return Some("Quantity must be positive".to_string());
    }
    let price: Decimal = match price.parse() {
        Ok(p) => p,
        Err(_) => return Some("Invalid price".to_string()),
    };
    let min_price: Decimal = match min_price.parse() {
        Ok(p) => p,
        Err(_) => return Some("Invalid minimum price".to_string()),
    };
    if price <= Decimal::ZERO || min_price <= Decimal::ZERO {
        return Some("Prices must be positive".to_string());
    }
    if min_price > price {
        return Some("Minimum price cannot exceed the selling price".to_string());
    }
    if quantity > available {
        return Some(format!(
            "Only {} units available, cannot assign {}",
            available, quantity
        ));
    }
    None
}

/// Compute the inspection price breakdown shown on the sale screen
///
/// Takes the line items as JSON and returns the breakdown as JSON.
#[wasm_bindgen]
pub fn compute_inspection_total(
    line_items_json: &str,
    hotplate_exchange: bool,
    hotplate_exchange_rate: &str,
    other_discount: &str,
) -> Result<String, JsValue> {
    let line_items: Vec<LineItem> = serde_json::from_str(line_items_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid line items JSON: {}", e)))?;
    let rate: Decimal = hotplate_exchange_rate
        .parse()
        .map_err(|_| JsValue::from_str("Invalid hotplate exchange rate"))?;
    let discount: Decimal = other_discount
        .parse()
        .map_err(|_| JsValue::from_str("Invalid discount"))?;

    let breakdown = compute_total(&line_items, hotplate_exchange, rate, discount);
    serde_json::to_string(&breakdown)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Whether every safety check of a visit passed
#[wasm_bindgen]
pub fn checklist_compliant(checklist_json: &str) -> Result<bool, JsValue> {
    let checklist: ChecklistAnswers = serde_json::from_str(checklist_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid checklist JSON: {}", e)))?;
    Ok(checklist.is_compliant())
}

/// Validate an Indian mobile number entered on a form
#[wasm_bindgen]
pub fn is_valid_phone(phone: &str) -> bool {
    validate_indian_phone(phone).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_quantity() {
        // total 10, others hold 3, agent holds 4 of the 7 allocated
        assert_eq!(available_quantity(10, 7, 4), 7);
        // new agent competing for the same pool
        assert_eq!(available_quantity(10, 7, 0), 3);
        // over-allocated store reads as zero capacity
        assert_eq!(available_quantity(5, 9, 0), 0);
    }

    #[test]
    fn test_check_allocation() {
        assert!(check_allocation(3, "850", "800", 5).is_none());
        assert!(check_allocation(0, "850", "800", 5).is_some());
        assert!(check_allocation(3, "850", "900", 5).is_some());
        assert!(check_allocation(6, "850", "800", 5).is_some());
    }

    #[test]
    fn test_compute_inspection_total() {
        let items = r#"[{"product_id":null,"label":"Domestic refill","unit_price":"850","quantity":1}]"#;
        let json = compute_inspection_total(items, true, "450", "100").unwrap();
        assert!(json.contains("\"total\":\"300\""));
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("9812345678"));
        assert!(!is_valid_phone("12345"));
    }
}
