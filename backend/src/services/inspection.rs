//! Inspection submission service
//!
//! A field visit arrives as checklist answers, photo references and sold
//! line items. The server recomputes the price breakdown itself (client
//! totals are preview only), verifies the agent actually carries the stock
//! being sold, and deducts sold quantities from the agent's allocation and
//! the product pool in the same transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    compute_total, validate_name, validate_photo_url, validate_unit_price, ChecklistAnswers,
    DateRange, Inspection, LineItem, PaginatedResponse, Pagination, PriceBreakdown, StockError,
    SubmitInspectionInput,
};

/// Inspection service for recording field visits
#[derive(Clone)]
pub struct InspectionService {
    db: PgPool,
}

/// Database row for an inspection
#[derive(Debug, sqlx::FromRow)]
struct InspectionRow {
    id: Uuid,
    distributor_id: Uuid,
    agent_id: Uuid,
    consumer_name: String,
    consumer_phone: Option<String>,
    address: Option<String>,
    checklist: serde_json::Value,
    kitchen_photo_urls: serde_json::Value,
    hotplate_exchange: bool,
    other_discount: Decimal,
    subtotal_amount: Decimal,
    total_discount: Decimal,
    total_amount: Decimal,
    inspected_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

/// Database row for a line item
#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    product_id: Option<Uuid>,
    label: String,
    unit_price: Decimal,
    quantity: i32,
}

impl From<LineItemRow> for LineItem {
    fn from(row: LineItemRow) -> Self {
        LineItem {
            product_id: row.product_id,
            label: row.label,
            unit_price: row.unit_price,
            quantity: row.quantity,
        }
    }
}

/// Finalized inspection with its price breakdown
#[derive(Debug, Serialize)]
pub struct InspectionResponse {
    #[serde(flatten)]
    pub inspection: Inspection,
    pub breakdown: PriceBreakdown,
}

/// List entry for inspection history screens
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct InspectionSummary {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub agent_name: String,
    pub consumer_name: String,
    pub total_amount: Decimal,
    pub units_sold: i64,
    pub inspected_at: DateTime<Utc>,
}

/// Filter for listing inspections
#[derive(Debug, Deserialize)]
pub struct InspectionFilter {
    pub agent_id: Option<Uuid>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl InspectionFilter {
    fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(default.page),
            per_page: self.per_page.unwrap_or(default.per_page).clamp(1, 100),
        }
    }
}

impl InspectionService {
    /// Create a new InspectionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Finalize and record a field visit
    pub async fn submit(
        &self,
        distributor_id: Uuid,
        input: SubmitInspectionInput,
    ) -> AppResult<InspectionResponse> {
        validate_name(&input.consumer_name).map_err(|msg| AppError::Validation {
            field: "consumer_name".to_string(),
            message: msg.to_string(),
        })?;
        for url in &input.kitchen_photo_urls {
            validate_photo_url(url).map_err(|msg| AppError::Validation {
                field: "kitchen_photo_urls".to_string(),
                message: msg.to_string(),
            })?;
        }
        for item in &input.line_items {
            validate_unit_price(item.unit_price).map_err(|msg| AppError::Validation {
                field: "line_items".to_string(),
                message: msg.to_string(),
            })?;
        }

        let mut tx = self.db.begin().await?;

        let distributor: Option<(String, Decimal)> = sqlx::query_as(
            "SELECT status, hotplate_exchange_rate FROM distributors WHERE id = $1",
        )
        .bind(distributor_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (status, hotplate_exchange_rate) =
            distributor.ok_or_else(|| AppError::NotFound("Distributor".to_string()))?;
        if status != "approved" {
            return Err(AppError::InvalidStateTransition(
                "Distributor account is not approved".to_string(),
            ));
        }

        let agent_active: Option<bool> = sqlx::query_scalar(
            "SELECT is_active FROM delivery_agents WHERE id = $1 AND distributor_id = $2",
        )
        .bind(input.agent_id)
        .bind(distributor_id)
        .fetch_optional(&mut *tx)
        .await?;

        match agent_active {
            None => return Err(AppError::NotFound("Delivery agent".to_string())),
            Some(false) => {
                return Err(AppError::Conflict(
                    "Inactive agents cannot submit inspections".to_string(),
                ))
            }
            Some(true) => {}
        }

        // Aggregate sold quantities per catalog product. BTreeMap iteration
        // gives a stable product lock order shared with AllocationService.
        let mut sold: BTreeMap<Uuid, i32> = BTreeMap::new();
        for item in &input.line_items {
            if let Some(product_id) = item.product_id {
                if item.quantity > 0 {
                    *sold.entry(product_id).or_insert(0) += item.quantity;
                }
            }
        }

        for (&product_id, &quantity) in &sold {
            self.deduct_stock(&mut tx, distributor_id, input.agent_id, product_id, quantity)
                .await?;

            // The allocation's price floor applies to every line of this product
            let min_price: Decimal = sqlx::query_scalar(
                "SELECT min_price FROM allocations WHERE product_id = $1 AND agent_id = $2",
            )
            .bind(product_id)
            .bind(input.agent_id)
            .fetch_one(&mut *tx)
            .await?;

            for item in &input.line_items {
                if item.product_id == Some(product_id)
                    && item.quantity > 0
                    && item.unit_price < min_price
                {
                    return Err(AppError::ValidationError(format!(
                        "Unit price {} is below the allocated minimum {} for '{}'",
                        item.unit_price, min_price, item.label
                    )));
                }
            }
        }

        // The server-side breakdown is the authoritative total
        let breakdown = compute_total(
            &input.line_items,
            input.hotplate_exchange,
            hotplate_exchange_rate,
            input.other_discount,
        );

        let checklist_json = serde_json::to_value(&input.checklist)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let photos_json = serde_json::to_value(&input.kitchen_photo_urls)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let inspected_at = input.inspected_at.unwrap_or_else(Utc::now);

        let row = sqlx::query_as::<_, InspectionRow>(
            r#"
            INSERT INTO inspections (
                distributor_id, agent_id, consumer_name, consumer_phone, address,
                checklist, kitchen_photo_urls, hotplate_exchange, other_discount,
                subtotal_amount, total_discount, total_amount, inspected_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, distributor_id, agent_id, consumer_name, consumer_phone, address,
                      checklist, kitchen_photo_urls, hotplate_exchange, other_discount,
                      subtotal_amount, total_discount, total_amount, inspected_at, created_at
            "#,
        )
        .bind(distributor_id)
        .bind(input.agent_id)
        .bind(&input.consumer_name)
        .bind(&input.consumer_phone)
        .bind(&input.address)
        .bind(&checklist_json)
        .bind(&photos_json)
        .bind(input.hotplate_exchange)
        .bind(input.other_discount)
        .bind(breakdown.subtotal)
        .bind(breakdown.total_discount)
        .bind(breakdown.total)
        .bind(inspected_at)
        .fetch_one(&mut *tx)
        .await?;

        for item in &input.line_items {
            sqlx::query(
                r#"
                INSERT INTO inspection_line_items (inspection_id, product_id, label, unit_price, quantity, line_subtotal)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(row.id)
            .bind(item.product_id)
            .bind(&item.label)
            .bind(item.unit_price)
            .bind(item.quantity)
            .bind(item.subtotal())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            inspection_id = %row.id,
            agent_id = %input.agent_id,
            total = %breakdown.total,
            "inspection recorded"
        );

        let inspection = into_inspection(row, input.line_items)?;
        Ok(InspectionResponse {
            inspection,
            breakdown,
        })
    }

    /// Get a finalized inspection with its line items
    pub async fn get(&self, distributor_id: Uuid, inspection_id: Uuid) -> AppResult<Inspection> {
        let row = sqlx::query_as::<_, InspectionRow>(
            r#"
            SELECT id, distributor_id, agent_id, consumer_name, consumer_phone, address,
                   checklist, kitchen_photo_urls, hotplate_exchange, other_discount,
                   subtotal_amount, total_discount, total_amount, inspected_at, created_at
            FROM inspections
            WHERE id = $1 AND distributor_id = $2
            "#,
        )
        .bind(inspection_id)
        .bind(distributor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inspection".to_string()))?;

        let items = sqlx::query_as::<_, LineItemRow>(
            r#"
            SELECT product_id, label, unit_price, quantity
            FROM inspection_line_items
            WHERE inspection_id = $1
            ORDER BY id
            "#,
        )
        .bind(inspection_id)
        .fetch_all(&self.db)
        .await?;

        into_inspection(row, items.into_iter().map(Into::into).collect())
    }

    /// List inspections for history and report screens, newest first
    pub async fn list(
        &self,
        distributor_id: Uuid,
        filter: InspectionFilter,
    ) -> AppResult<PaginatedResponse<InspectionSummary>> {
        let range = DateRange::from_bounds(filter.start_date, filter.end_date);
        let pagination = filter.pagination();

        let total_items: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM inspections
            WHERE distributor_id = $1
              AND ($2::uuid IS NULL OR agent_id = $2)
              AND inspected_at::date BETWEEN $3 AND $4
            "#,
        )
        .bind(distributor_id)
        .bind(filter.agent_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.db)
        .await?;

        let summaries = sqlx::query_as::<_, InspectionSummary>(
            r#"
            SELECT i.id, i.agent_id, d.name AS agent_name, i.consumer_name, i.total_amount,
                   COALESCE(li.units, 0) AS units_sold, i.inspected_at
            FROM inspections i
            JOIN delivery_agents d ON d.id = i.agent_id
            LEFT JOIN (
                SELECT inspection_id, SUM(quantity)::BIGINT AS units
                FROM inspection_line_items
                WHERE quantity > 0
                GROUP BY inspection_id
            ) li ON li.inspection_id = i.id
            WHERE i.distributor_id = $1
              AND ($2::uuid IS NULL OR i.agent_id = $2)
              AND i.inspected_at::date BETWEEN $3 AND $4
            ORDER BY i.inspected_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(distributor_id)
        .bind(filter.agent_id)
        .bind(range.start)
        .bind(range.end)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: summaries,
            pagination: pagination.meta(total_items.max(0) as u64),
        })
    }

    /// Deduct a sale from the agent's allocation and the product pool
    async fn deduct_stock(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        distributor_id: Uuid,
        agent_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<()> {
        // Same per-product lock as the assignment path
        let product: Option<(String, i32)> = sqlx::query_as(
            "SELECT name, total_stock FROM products WHERE id = $1 AND distributor_id = $2 FOR UPDATE",
        )
        .bind(product_id)
        .bind(distributor_id)
        .fetch_optional(&mut **tx)
        .await?;

        let (_, total_stock) =
            product.ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let held: Option<i32> = sqlx::query_scalar(
            "SELECT quantity FROM allocations WHERE product_id = $1 AND agent_id = $2",
        )
        .bind(product_id)
        .bind(agent_id)
        .fetch_optional(&mut **tx)
        .await?;

        let held = held.unwrap_or(0);
        if quantity > held {
            return Err(AppError::Stock(StockError::InsufficientStock {
                requested: quantity,
                available: held,
            }));
        }

        // Guards the total_stock >= 0 constraint against a corrupt allocation row
        if quantity > total_stock {
            return Err(AppError::Conflict(
                "Sold quantity exceeds the distributor's recorded stock".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE allocations SET quantity = quantity - $3, updated_at = NOW() WHERE product_id = $1 AND agent_id = $2",
        )
        .bind(product_id)
        .bind(agent_id)
        .bind(quantity)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "UPDATE products SET total_stock = total_stock - $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(product_id)
        .bind(quantity)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

/// Assemble the domain inspection from its row and line items
fn into_inspection(row: InspectionRow, line_items: Vec<LineItem>) -> AppResult<Inspection> {
    let checklist: ChecklistAnswers = serde_json::from_value(row.checklist)
        .map_err(|e| AppError::Internal(format!("corrupt checklist payload: {}", e)))?;
    let kitchen_photo_urls: Vec<String> = serde_json::from_value(row.kitchen_photo_urls)
        .map_err(|e| AppError::Internal(format!("corrupt photo payload: {}", e)))?;

    Ok(Inspection {
        id: row.id,
        distributor_id: row.distributor_id,
        agent_id: row.agent_id,
        consumer_name: row.consumer_name,
        consumer_phone: row.consumer_phone,
        address: row.address,
        checklist,
        kitchen_photo_urls,
        line_items,
        hotplate_exchange: row.hotplate_exchange,
        other_discount: row.other_discount,
        subtotal_amount: row.subtotal_amount,
        total_discount: row.total_discount,
        total_amount: row.total_amount,
        inspected_at: row.inspected_at,
        created_at: row.created_at,
    })
}
