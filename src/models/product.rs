use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sale unit for a catalog product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "unidad_producto", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    Un,
    Kg,
}

/// Catalog row (table `productos`)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    /// Unit cost with IVA, whole pesos
    pub cost_tax_inclusive: i64,
    /// Sale price, whole pesos
    pub price: i64,
    pub stock_on_hand: f64,
    pub unit: Unit,
    pub active: bool,
    pub company_id: i64,
    pub branch_id: i64,
}

/// Insert payload for `productos`
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub description: String,
    pub cost_tax_inclusive: i64,
    pub price: i64,
    pub stock_on_hand: f64,
    pub unit: Unit,
    pub company_id: i64,
    pub branch_id: i64,
}

/// One line of the inventory CSV report (`productos` joined to `categorias`)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub stock_on_hand: f64,
    pub category: Option<String>,
    pub code: String,
    pub cost_tax_inclusive: i64,
    pub price: i64,
    pub active: bool,
}
