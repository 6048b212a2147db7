//! Inspection visit models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ChecklistAnswers, LineItem, PriceBreakdown};

/// One field visit: safety checklist plus any products sold during it
///
/// The stored amounts are derived values recomputed from the line items and
/// discount inputs at submission time; an inspection is immutable once
/// finalized. Later corrections are a new computation over new inputs, not a
/// delta update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub id: Uuid,
    pub distributor_id: Uuid,
    pub agent_id: Uuid,
    pub consumer_name: String,
    pub consumer_phone: Option<String>,
    pub address: Option<String>,
    pub checklist: ChecklistAnswers,
    /// URLs of already-uploaded kitchen photos (capture UI lives client-side)
    pub kitchen_photo_urls: Vec<String>,
    pub line_items: Vec<LineItem>,
    pub hotplate_exchange: bool,
    pub other_discount: Decimal,
    pub subtotal_amount: Decimal,
    pub total_discount: Decimal,
    pub total_amount: Decimal,
    pub inspected_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Inspection {
    /// The breakdown persisted at submission time
    pub fn breakdown(&self) -> PriceBreakdown {
        let hotplate_component = self.total_discount - self.other_component();
        PriceBreakdown {
            subtotal: self.subtotal_amount,
            hotplate_component,
            other_component: self.other_component(),
            total_discount: self.total_discount,
            total: self.total_amount,
        }
    }

    fn other_component(&self) -> Decimal {
        self.other_discount.max(Decimal::ZERO)
    }
}

/// Input for submitting an inspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitInspectionInput {
    pub agent_id: Uuid,
    pub consumer_name: String,
    pub consumer_phone: Option<String>,
    pub address: Option<String>,
    pub checklist: ChecklistAnswers,
    pub kitchen_photo_urls: Vec<String>,
    pub line_items: Vec<LineItem>,
    pub hotplate_exchange: bool,
    pub other_discount: Decimal,
    pub inspected_at: Option<DateTime<Utc>>,
}
