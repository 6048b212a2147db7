//! Reporting service for admin analytics
//! Provides daily sales, agent performance and product movement summaries

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::DateRange;

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// Daily sales report entry
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DailySalesReport {
    pub day: NaiveDate,
    pub inspection_count: i64,
    pub units_sold: i64,
    pub gross_sales: Decimal,
    pub total_discount: Decimal,
    pub net_sales: Decimal,
}

/// Per-agent performance entry
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AgentPerformanceReport {
    pub agent_id: Uuid,
    pub agent_name: String,
    pub inspection_count: i64,
    pub units_sold: i64,
    pub net_sales: Decimal,
}

/// Per-product sales entry
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProductSalesReport {
    pub product_id: Uuid,
    pub product_name: String,
    pub units_sold: i64,
    pub revenue: Decimal,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub inspections_today: i64,
    pub inspections_last_30_days: i64,
    pub units_sold_last_30_days: i64,
    pub revenue_last_30_days: Decimal,
    pub active_agents: i64,
    pub products_out_of_stock: i64,
}

/// Report filter parameters
#[derive(Debug, Deserialize)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub agent_id: Option<Uuid>,
}

impl ReportFilter {
    fn range(&self) -> DateRange {
        DateRange::from_bounds(self.start_date, self.end_date)
    }
}

impl ReportService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Daily totals across the distributor's inspections
    pub async fn get_daily_sales(
        &self,
        distributor_id: Uuid,
        filter: &ReportFilter,
    ) -> AppResult<Vec<DailySalesReport>> {
        let range = filter.range();

        let reports = sqlx::query_as::<_, DailySalesReport>(
            r#"
            SELECT
                i.inspected_at::date AS day,
                COUNT(*) AS inspection_count,
                COALESCE(SUM(li.units), 0)::BIGINT AS units_sold,
                COALESCE(SUM(i.subtotal_amount), 0) AS gross_sales,
                COALESCE(SUM(i.total_discount), 0) AS total_discount,
                COALESCE(SUM(i.total_amount), 0) AS net_sales
            FROM inspections i
            LEFT JOIN (
                SELECT inspection_id, SUM(quantity)::BIGINT AS units
                FROM inspection_line_items
                WHERE quantity > 0
                GROUP BY inspection_id
            ) li ON li.inspection_id = i.id
            WHERE i.distributor_id = $1
              AND ($2::uuid IS NULL OR i.agent_id = $2)
              AND i.inspected_at::date BETWEEN $3 AND $4
            GROUP BY i.inspected_at::date
            ORDER BY day DESC
            "#,
        )
        .bind(distributor_id)
        .bind(filter.agent_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(reports)
    }

    /// Totals per delivery agent
    pub async fn get_agent_performance(
        &self,
        distributor_id: Uuid,
        filter: &ReportFilter,
    ) -> AppResult<Vec<AgentPerformanceReport>> {
        let range = filter.range();

        let reports = sqlx::query_as::<_, AgentPerformanceReport>(
            r#"
            SELECT
                d.id AS agent_id,
                d.name AS agent_name,
                COUNT(i.id) AS inspection_count,
                COALESCE(SUM(li.units), 0)::BIGINT AS units_sold,
                COALESCE(SUM(i.total_amount), 0) AS net_sales
            FROM delivery_agents d
            LEFT JOIN inspections i ON i.agent_id = d.id
                AND i.inspected_at::date BETWEEN $2 AND $3
            LEFT JOIN (
                SELECT inspection_id, SUM(quantity)::BIGINT AS units
                FROM inspection_line_items
                WHERE quantity > 0
                GROUP BY inspection_id
            ) li ON li.inspection_id = i.id
            WHERE d.distributor_id = $1
            GROUP BY d.id, d.name
            ORDER BY net_sales DESC
            "#,
        )
        .bind(distributor_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(reports)
    }

    /// Units and revenue per catalog product
    pub async fn get_product_sales(
        &self,
        distributor_id: Uuid,
        filter: &ReportFilter,
    ) -> AppResult<Vec<ProductSalesReport>> {
        let range = filter.range();

        let reports = sqlx::query_as::<_, ProductSalesReport>(
            r#"
            SELECT
                p.id AS product_id,
                p.name AS product_name,
                COALESCE(SUM(li.quantity) FILTER (WHERE li.quantity > 0), 0)::BIGINT AS units_sold,
                COALESCE(SUM(li.line_subtotal), 0) AS revenue
            FROM products p
            LEFT JOIN inspection_line_items li ON li.product_id = p.id
            LEFT JOIN inspections i ON i.id = li.inspection_id
                AND i.inspected_at::date BETWEEN $2 AND $3
                AND ($4::uuid IS NULL OR i.agent_id = $4)
            WHERE p.distributor_id = $1
            GROUP BY p.id, p.name
            ORDER BY units_sold DESC
            "#,
        )
        .bind(distributor_id)
        .bind(range.start)
        .bind(range.end)
        .bind(filter.agent_id)
        .fetch_all(&self.db)
        .await?;

        Ok(reports)
    }

    /// Get dashboard metrics
    pub async fn get_dashboard_metrics(&self, distributor_id: Uuid) -> AppResult<DashboardMetrics> {
        let inspections_today: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM inspections
            WHERE distributor_id = $1 AND inspected_at::date = CURRENT_DATE
            "#,
        )
        .bind(distributor_id)
        .fetch_one(&self.db)
        .await?;

        let inspections_last_30_days: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM inspections
            WHERE distributor_id = $1
              AND inspected_at >= CURRENT_DATE - INTERVAL '30 days'
            "#,
        )
        .bind(distributor_id)
        .fetch_one(&self.db)
        .await?;

        let units_sold_last_30_days: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(li.quantity) FILTER (WHERE li.quantity > 0), 0)::BIGINT
            FROM inspection_line_items li
            JOIN inspections i ON i.id = li.inspection_id
            WHERE i.distributor_id = $1
              AND i.inspected_at >= CURRENT_DATE - INTERVAL '30 days'
            "#,
        )
        .bind(distributor_id)
        .fetch_one(&self.db)
        .await?;

        let revenue_last_30_days: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_amount), 0) FROM inspections
            WHERE distributor_id = $1
              AND inspected_at >= CURRENT_DATE - INTERVAL '30 days'
            "#,
        )
        .bind(distributor_id)
        .fetch_one(&self.db)
        .await?;

        let active_agents: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM delivery_agents WHERE distributor_id = $1 AND is_active",
        )
        .bind(distributor_id)
        .fetch_one(&self.db)
        .await?;

        let products_out_of_stock: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE distributor_id = $1 AND is_active AND total_stock = 0",
        )
        .bind(distributor_id)
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            inspections_today,
            inspections_last_30_days,
            units_sold_last_30_days,
            revenue_last_30_days,
            active_agents,
            products_out_of_stock,
        })
    }
}
