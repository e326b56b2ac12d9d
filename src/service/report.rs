use crate::db::{export, queries};
use sqlx::PgPool;

/// Builds the CSV downloads served by the inventory endpoints
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bulk-upload template; needs no catalog data
    pub fn template_csv() -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        export::inventory_template()
    }

    /// Inventory report for one company/branch
    pub async fn inventory_report_csv(
        &self,
        company_id: i64,
        branch_id: i64,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let rows = queries::list_report_rows(&self.pool, company_id, branch_id).await?;
        tracing::info!(
            "Reporte de inventario: empresa {}, sucursal {}, {} productos",
            company_id,
            branch_id,
            rows.len()
        );
        export::inventory_report(&rows)
    }
}
