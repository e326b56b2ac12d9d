use serde::{Deserialize, Serialize};

/// Cost and pricing rules applied during intake.
///
/// IVA and margin are explicit parameters so a different tax jurisdiction or
/// margin policy can be substituted without touching extraction logic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Value-added tax rate applied on top of the base cost (Chilean IVA: 0.19)
    pub iva_rate: f64,
    /// Multiplier from tax-inclusive cost to sale price at product creation
    pub margin_multiplier: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            iva_rate: 0.19,
            margin_multiplier: 1.3,
        }
    }
}

impl PricingPolicy {
    /// Tax-inclusive cost, rounded to the nearest whole peso.
    ///
    /// Applied uniformly across all document formats at extraction time.
    pub fn tax_inclusive(&self, base_cost: i64) -> i64 {
        (base_cost as f64 * (1.0 + self.iva_rate)).round() as i64
    }

    /// Sale price derived from a tax-inclusive cost. Used only when a product
    /// is first created; later intakes never reprice.
    pub fn sale_price(&self, cost_tax_inclusive: i64) -> i64 {
        (cost_tax_inclusive as f64 * self.margin_multiplier).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_inclusive_rounds_to_nearest_peso() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.tax_inclusive(0), 0);
        assert_eq!(policy.tax_inclusive(100), 119);
        assert_eq!(policy.tax_inclusive(1000), 1190);
        // 42 * 1.19 = 49.98 -> 50
        assert_eq!(policy.tax_inclusive(42), 50);
        // 21 * 1.19 = 24.99 -> 25
        assert_eq!(policy.tax_inclusive(21), 25);
    }

    #[test]
    fn sale_price_uses_margin_multiplier() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.sale_price(1000), 1300);
        // 119 * 1.3 = 154.7 -> 155
        assert_eq!(policy.sale_price(119), 155);
    }

    #[test]
    fn alternate_jurisdiction_is_a_parameter_change() {
        let policy = PricingPolicy {
            iva_rate: 0.21,
            margin_multiplier: 1.5,
        };
        assert_eq!(policy.tax_inclusive(100), 121);
        assert_eq!(policy.sale_price(100), 150);
    }
}
