use crate::parser::DocumentFormat;
use crate::pricing::PricingPolicy;
use serde::{Deserialize, Serialize};

/// One product line extracted from a supplier document.
///
/// Transient: exists only for the duration of an upload session and is never
/// persisted directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedLineItem {
    pub code: Option<String>,
    pub name: String,
    pub description: String,
    pub quantity: f64,
    /// Unit cost before IVA, in whole pesos
    pub base_cost: i64,
    /// Unit cost with IVA applied, in whole pesos
    pub tax_inclusive_cost: i64,
}

impl ParsedLineItem {
    /// Build a line item, applying the tax policy to the base cost.
    pub fn new(
        code: Option<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        quantity: f64,
        base_cost: i64,
        policy: &PricingPolicy,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            description: description.into(),
            quantity,
            base_cost,
            tax_inclusive_cost: policy.tax_inclusive(base_cost),
        }
    }
}

/// Tagged extraction result.
///
/// `Empty` marks the deliberate "nothing extracted" policy paths (unknown
/// format, missing PDF block markers, every row filtered out) so callers can
/// tell them apart from a parse failure, which travels as `ParseError`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Extraction {
    Items(Vec<ParsedLineItem>),
    Empty,
}

impl Extraction {
    pub fn from_items(items: Vec<ParsedLineItem>) -> Self {
        if items.is_empty() {
            Extraction::Empty
        } else {
            Extraction::Items(items)
        }
    }

    pub fn into_items(self) -> Vec<ParsedLineItem> {
        match self {
            Extraction::Items(items) => items,
            Extraction::Empty => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Extraction::Empty)
    }
}

/// A named supplier file plus everything extracted from it. Ephemeral: lives
/// only inside an upload session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierDocument {
    pub file_name: String,
    pub format: Option<DocumentFormat>,
    /// Supplier legal name, when the document carries one (PDF only)
    pub proveedor: Option<String>,
    /// Document grand total in whole pesos (PDF only)
    pub costo_total: Option<i64>,
    pub items: Vec<ParsedLineItem>,
}

impl SupplierDocument {
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }
}
