use crate::db::queries;
use crate::models::{NewMovement, NewProduct, ParsedLineItem, Unit};
use crate::pricing::PricingPolicy;
use serde::Serialize;
use sqlx::PgPool;

/// Identity of an intake run: company, branch and acting user
#[derive(Debug, Clone, Copy)]
pub struct IntakeContext {
    pub company_id: i64,
    pub branch_id: i64,
    pub user_id: Option<i64>,
}

/// What reconciliation did with one line item
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Created { product_id: i64 },
    Updated { product_id: i64, stock_after: f64 },
}

/// Reconciles extracted line items against the catalog and the movement
/// ledger, one item at a time.
pub struct StockReconciler {
    pool: PgPool,
    policy: PricingPolicy,
}

impl StockReconciler {
    pub fn new(pool: PgPool, policy: PricingPolicy) -> Self {
        Self { pool, policy }
    }

    /// Create-or-increment one line item, keyed by product code within the
    /// company and branch.
    ///
    /// Both writes run in a single transaction, with the product write
    /// strictly before the ledger append; a failed product update therefore
    /// never leaves a ledger row behind, and the ledger can never trail a
    /// committed stock change.
    pub async fn reconcile_item(
        &self,
        ctx: &IntakeContext,
        item: &ParsedLineItem,
        reference: &str,
    ) -> Result<ReconcileOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let code = reconcile_code(item);
        let mut tx = self.pool.begin().await?;

        let existing = queries::get_product(&mut *tx, &code, ctx.company_id, ctx.branch_id).await?;
        let outcome = match existing {
            None => {
                let product = plan_new_product(&code, item, ctx, &self.policy);
                let product_id = queries::insert_product(&mut *tx, &product).await?;
                let movement = NewMovement::entrada(
                    product_id,
                    ctx.branch_id,
                    0.0,
                    item.quantity,
                    reference,
                    ctx.user_id,
                );
                queries::insert_movement(&mut *tx, &movement).await?;
                ReconcileOutcome::Created { product_id }
            }
            Some(product) => {
                // stock position comes from the ledger, not the product row
                let stock_before = queries::latest_movement(&mut *tx, product.id)
                    .await?
                    .map(|m| m.stock_after)
                    .unwrap_or(0.0);
                let movement = NewMovement::entrada(
                    product.id,
                    ctx.branch_id,
                    stock_before,
                    item.quantity,
                    reference,
                    ctx.user_id,
                );
                queries::update_product_stock(&mut *tx, product.id, movement.stock_after).await?;
                queries::insert_movement(&mut *tx, &movement).await?;
                ReconcileOutcome::Updated {
                    product_id: product.id,
                    stock_after: movement.stock_after,
                }
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }
}

/// Reconciliation key: the item code, or the item name for formats that
/// cannot produce one (plain CSV rows, unlabeled PDF lines).
pub fn reconcile_code(item: &ParsedLineItem) -> String {
    item.code.clone().unwrap_or_else(|| item.name.clone())
}

/// Catalog row for a first-seen item. Price is derived from the
/// tax-inclusive cost exactly once, here; later intakes never reprice.
fn plan_new_product(
    code: &str,
    item: &ParsedLineItem,
    ctx: &IntakeContext,
    policy: &PricingPolicy,
) -> NewProduct {
    NewProduct {
        code: code.to_string(),
        name: item.name.clone(),
        description: item.description.clone(),
        cost_tax_inclusive: item.tax_inclusive_cost,
        price: policy.sale_price(item.tax_inclusive_cost),
        stock_on_hand: item.quantity,
        unit: Unit::Un,
        company_id: ctx.company_id,
        branch_id: ctx.branch_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> IntakeContext {
        IntakeContext {
            company_id: 1,
            branch_id: 2,
            user_id: Some(3),
        }
    }

    fn item(code: Option<&str>, quantity: f64, base_cost: i64) -> ParsedLineItem {
        ParsedLineItem::new(
            code.map(str::to_string),
            "Harina 25kg",
            "Harina 25kg",
            quantity,
            base_cost,
            &PricingPolicy::default(),
        )
    }

    #[test]
    fn new_products_start_at_the_incoming_quantity_with_margin_price() {
        let line = item(Some("HAR-25"), 4.0, 15500);
        let product = plan_new_product("HAR-25", &line, &context(), &PricingPolicy::default());
        assert_eq!(product.stock_on_hand, 4.0);
        assert_eq!(product.cost_tax_inclusive, 18445);
        // round(18445 * 1.3)
        assert_eq!(product.price, 23979);
        assert_eq!(product.company_id, 1);
        assert_eq!(product.branch_id, 2);
    }

    #[test]
    fn items_without_a_code_reconcile_by_name() {
        assert_eq!(reconcile_code(&item(None, 1.0, 100)), "Harina 25kg");
        assert_eq!(reconcile_code(&item(Some("HAR-25"), 1.0, 100)), "HAR-25");
    }

    #[test]
    fn incoming_stock_lands_on_top_of_the_last_ledger_position() {
        let mv = NewMovement::entrada(7, 2, 10.0, 5.0, "factura-77", Some(3));
        assert_eq!(mv.stock_before, 10.0);
        assert_eq!(mv.stock_after, 15.0);
    }

    #[test]
    fn reimporting_the_same_document_double_counts() {
        // No dedup by folio or document hash: a second import of the same
        // file starts from the stock the first one left behind.
        let first = NewMovement::entrada(7, 2, 0.0, 5.0, "factura-77", None);
        let second = NewMovement::entrada(7, 2, first.stock_after, 5.0, "factura-77", None);
        assert_eq!(second.stock_after, 10.0);
    }
}
