//! Inspection sale pricing
//!
//! Computes the payable amount of a field visit from its sold line items and
//! discount inputs. All monetary arithmetic uses [`Decimal`], so repeated
//! evaluation of the same inputs is bit-identical and no floating-point
//! drift can creep into receipts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One priced, quantified entry within an inspection's sale
///
/// Catalog products carry their `product_id`; ad-hoc charges (for example a
/// hotplate exchange upsell) carry only a label. A `quantity` of zero means
/// "not sold this visit" and is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: Option<Uuid>,
    pub label: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl LineItem {
    /// The line's contribution to the subtotal; zero for unsold items
    pub fn subtotal(&self) -> Decimal {
        if self.quantity <= 0 {
            Decimal::ZERO
        } else {
            self.unit_price * Decimal::from(self.quantity)
        }
    }
}

/// Full price breakdown of an inspection sale
///
/// Every intermediate figure is kept so receipts and audit views can show
/// the arithmetic, not just the final amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub hotplate_component: Decimal,
    pub other_component: Decimal,
    pub total_discount: Decimal,
    pub total: Decimal,
}

/// Sum of line subtotals; items with non-positive quantity contribute zero
pub fn compute_subtotal(line_items: &[LineItem]) -> Decimal {
    line_items.iter().map(LineItem::subtotal).sum()
}

/// Total discount from the hotplate-exchange flag and the free-form discount
///
/// A negative `other_discount` is clamped to zero: a discount can never
/// increase the price.
pub fn compute_discount(
    hotplate_exchange: bool,
    hotplate_exchange_rate: Decimal,
    other_discount: Decimal,
) -> Decimal {
    let hotplate = if hotplate_exchange {
        hotplate_exchange_rate
    } else {
        Decimal::ZERO
    };
    hotplate + other_discount.max(Decimal::ZERO)
}

/// Compute the full breakdown for an inspection sale
///
/// The payable total is floored at zero: a discount larger than the subtotal
/// is silently absorbed rather than producing a negative amount or an error.
pub fn compute_total(
    line_items: &[LineItem],
    hotplate_exchange: bool,
    hotplate_exchange_rate: Decimal,
    other_discount: Decimal,
) -> PriceBreakdown {
    let subtotal = compute_subtotal(line_items);
    let hotplate_component = if hotplate_exchange {
        hotplate_exchange_rate
    } else {
        Decimal::ZERO
    };
    let other_component = other_discount.max(Decimal::ZERO);
    let total_discount = hotplate_component + other_component;
    let total = (subtotal - total_discount).max(Decimal::ZERO);

    PriceBreakdown {
        subtotal,
        hotplate_component,
        other_component,
        total_discount,
        total,
    }
}
