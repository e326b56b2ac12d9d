use crate::models::{InventoryMovement, NewMovement, NewProduct, Product, ReportRow};
use chrono::Utc;
use sqlx::{PgExecutor, PgPool};

/// Look up a catalog product by code within a company and branch
pub async fn get_product<'e>(
    executor: impl PgExecutor<'e>,
    code: &str,
    company_id: i64,
    branch_id: i64,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        SELECT id, codigo AS code, nombre AS name, descripcion AS description,
               costo AS cost_tax_inclusive, precio AS price, stock AS stock_on_hand,
               unidad AS unit, activo AS active,
               empresa_id AS company_id, sucursal_id AS branch_id
        FROM productos
        WHERE codigo = $1 AND empresa_id = $2 AND sucursal_id = $3
        "#,
    )
    .bind(code)
    .bind(company_id)
    .bind(branch_id)
    .fetch_optional(executor)
    .await
}

/// Insert a new catalog product, returning its id
pub async fn insert_product<'e>(
    executor: impl PgExecutor<'e>,
    product: &NewProduct,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO productos
            (codigo, nombre, descripcion, costo, precio, stock, unidad, activo,
             empresa_id, sucursal_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, true, $8, $9)
        RETURNING id
        "#,
    )
    .bind(&product.code)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.cost_tax_inclusive)
    .bind(product.price)
    .bind(product.stock_on_hand)
    .bind(product.unit)
    .bind(product.company_id)
    .bind(product.branch_id)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Set a product's stock on hand. Fails with `RowNotFound` when the product
/// is gone, so the caller never writes a ledger row for a missing product.
pub async fn update_product_stock<'e>(
    executor: impl PgExecutor<'e>,
    product_id: i64,
    stock_on_hand: f64,
) -> Result<(), sqlx::Error> {
    let result = sqlx::query("UPDATE productos SET stock = $2 WHERE id = $1")
        .bind(product_id)
        .bind(stock_on_hand)
        .execute(executor)
        .await?;
    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

/// Most recent ledger entry for a product, by timestamp descending
pub async fn latest_movement<'e>(
    executor: impl PgExecutor<'e>,
    product_id: i64,
) -> Result<Option<InventoryMovement>, sqlx::Error> {
    sqlx::query_as::<_, InventoryMovement>(
        r#"
        SELECT id, producto_id AS product_id, sucursal_id AS branch_id,
               tipo AS movement_type, cantidad AS quantity,
               stock_anterior AS stock_before, stock_nuevo AS stock_after,
               referencia AS reference, fecha AS "timestamp", usuario_id AS user_id
        FROM inventario
        WHERE producto_id = $1
        ORDER BY fecha DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(product_id)
    .fetch_optional(executor)
    .await
}

/// Append a ledger entry, returning its id
pub async fn insert_movement<'e>(
    executor: impl PgExecutor<'e>,
    movement: &NewMovement,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO inventario
            (producto_id, sucursal_id, tipo, cantidad, stock_anterior,
             stock_nuevo, referencia, fecha, usuario_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(movement.product_id)
    .bind(movement.branch_id)
    .bind(movement.movement_type)
    .bind(movement.quantity)
    .bind(movement.stock_before)
    .bind(movement.stock_after)
    .bind(&movement.reference)
    .bind(Utc::now())
    .bind(movement.user_id)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Rows for the inventory CSV report of one branch, ordered by product name
pub async fn list_report_rows(
    pool: &PgPool,
    company_id: i64,
    branch_id: i64,
) -> Result<Vec<ReportRow>, sqlx::Error> {
    sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT p.nombre AS name, p.stock AS stock_on_hand, c.nombre AS category,
               p.codigo AS code, p.costo AS cost_tax_inclusive, p.precio AS price,
               p.activo AS active
        FROM productos p
        LEFT JOIN categorias c ON c.id = p.categoria_id
        WHERE p.empresa_id = $1 AND p.sucursal_id = $2
        ORDER BY p.nombre ASC
        "#,
    )
    .bind(company_id)
    .bind(branch_id)
    .fetch_all(pool)
    .await
}

/// Delete a product and then its ledger rows.
///
/// Two sequential statements, not a transaction: if the second delete fails
/// the movements are orphaned until `purge_orphan_movements` sweeps them.
pub async fn delete_product(pool: &PgPool, product_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM productos WHERE id = $1")
        .bind(product_id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM inventario WHERE producto_id = $1")
        .bind(product_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove ledger rows whose product no longer exists. Returns how many rows
/// were swept.
pub async fn purge_orphan_movements(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM inventario i
        WHERE NOT EXISTS (SELECT 1 FROM productos p WHERE p.id = i.producto_id)
        "#,
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
