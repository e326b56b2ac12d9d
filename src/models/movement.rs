use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Direction of a stock movement (table column `tipo`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tipo_movimiento", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Entrada,
    Salida,
}

/// Append-only ledger entry (table `inventario`).
///
/// Invariant for entrada movements: `stock_after = stock_before + quantity`,
/// and the most recent movement's `stock_after` equals the product's current
/// `stock_on_hand`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub id: i64,
    pub product_id: i64,
    pub branch_id: i64,
    pub movement_type: MovementType,
    pub quantity: f64,
    pub stock_before: f64,
    pub stock_after: f64,
    pub reference: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<i64>,
}

/// Insert payload for `inventario`
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: i64,
    pub branch_id: i64,
    pub movement_type: MovementType,
    pub quantity: f64,
    pub stock_before: f64,
    pub stock_after: f64,
    pub reference: String,
    pub user_id: Option<i64>,
}

impl NewMovement {
    /// Entrada movement for an incoming quantity on top of a known ledger
    /// position. Keeps the stock arithmetic in one place.
    pub fn entrada(
        product_id: i64,
        branch_id: i64,
        stock_before: f64,
        quantity: f64,
        reference: impl Into<String>,
        user_id: Option<i64>,
    ) -> Self {
        Self {
            product_id,
            branch_id,
            movement_type: MovementType::Entrada,
            quantity,
            stock_before,
            stock_after: stock_before + quantity,
            reference: reference.into(),
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrada_movement_adds_quantity_to_previous_stock() {
        let mv = NewMovement::entrada(7, 1, 10.0, 5.0, "guia-123", Some(42));
        assert_eq!(mv.stock_before, 10.0);
        assert_eq!(mv.stock_after, 15.0);
        assert!(matches!(mv.movement_type, MovementType::Entrada));
    }

    #[test]
    fn entrada_from_empty_ledger_starts_at_zero() {
        let mv = NewMovement::entrada(7, 1, 0.0, 3.5, "carga inicial", None);
        assert_eq!(mv.stock_before, 0.0);
        assert_eq!(mv.stock_after, 3.5);
    }
}
