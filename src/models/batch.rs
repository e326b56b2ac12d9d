use crate::models::{ParsedLineItem, SupplierDocument};
use crate::pricing::PricingPolicy;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One file submitted for intake. `content` carries text formats (XML, CSV,
/// pre-extracted PDF text); `content_base64` carries spreadsheet binaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub content: Option<String>,
    pub content_base64: Option<String>,
}

/// User-entered correction for a line item, keyed by item name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemOverride {
    pub quantity: Option<f64>,
    pub base_cost: Option<i64>,
}

/// Several supplier documents loaded in one upload session.
///
/// Documents can be removed individually; each removal recomputes the
/// aggregate line-item list and drops overrides whose item name no longer
/// appears in any remaining document.
#[derive(Debug, Default)]
pub struct DocumentBatch {
    documents: Vec<SupplierDocument>,
    overrides: IndexMap<String, ItemOverride>,
}

impl DocumentBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, document: SupplierDocument) {
        self.documents.push(document);
    }

    /// Remove a document by file name. Returns whether anything was removed.
    pub fn remove_document(&mut self, file_name: &str) -> bool {
        let before = self.documents.len();
        self.documents.retain(|doc| doc.file_name != file_name);
        let removed = self.documents.len() != before;
        if removed {
            self.prune_overrides();
        }
        removed
    }

    /// Record a correction for an item name. Overrides for names not present
    /// in any loaded document are ignored.
    pub fn set_override(&mut self, item_name: &str, correction: ItemOverride) {
        if self.contains_item(item_name) {
            self.overrides.insert(item_name.to_string(), correction);
        }
    }

    pub fn documents(&self) -> &[SupplierDocument] {
        &self.documents
    }

    pub fn overrides(&self) -> &IndexMap<String, ItemOverride> {
        &self.overrides
    }

    /// Aggregate line-item list across all loaded documents, in load order,
    /// with user corrections applied. Overridden base costs are re-normalized
    /// through the tax policy.
    pub fn merged_items(&self, policy: &PricingPolicy) -> Vec<ParsedLineItem> {
        self.documents
            .iter()
            .flat_map(|doc| doc.items.iter())
            .map(|item| self.apply_override(item, policy))
            .collect()
    }

    fn apply_override(&self, item: &ParsedLineItem, policy: &PricingPolicy) -> ParsedLineItem {
        let mut merged = item.clone();
        if let Some(correction) = self.overrides.get(&item.name) {
            if let Some(quantity) = correction.quantity {
                merged.quantity = quantity;
            }
            if let Some(base_cost) = correction.base_cost {
                merged.base_cost = base_cost;
                merged.tax_inclusive_cost = policy.tax_inclusive(base_cost);
            }
        }
        merged
    }

    fn contains_item(&self, item_name: &str) -> bool {
        self.documents
            .iter()
            .any(|doc| doc.item_names().any(|name| name == item_name))
    }

    fn prune_overrides(&mut self) {
        let mut kept: Vec<String> = Vec::new();
        for name in self.overrides.keys() {
            if self.contains_item(name) {
                kept.push(name.clone());
            }
        }
        self.overrides.retain(|name, _| kept.iter().any(|k| k == name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(file_name: &str, item_names: &[&str]) -> SupplierDocument {
        let policy = PricingPolicy::default();
        SupplierDocument {
            file_name: file_name.to_string(),
            format: None,
            proveedor: None,
            costo_total: None,
            items: item_names
                .iter()
                .map(|name| ParsedLineItem::new(None, *name, *name, 2.0, 100, &policy))
                .collect(),
        }
    }

    #[test]
    fn removing_a_document_recomputes_the_aggregate() {
        let policy = PricingPolicy::default();
        let mut batch = DocumentBatch::new();
        batch.add_document(document("a.csv", &["Harina", "Azucar"]));
        batch.add_document(document("b.csv", &["Aceite"]));
        assert_eq!(batch.merged_items(&policy).len(), 3);

        assert!(batch.remove_document("a.csv"));
        let remaining = batch.merged_items(&policy);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Aceite");

        assert!(!batch.remove_document("a.csv"));
    }

    #[test]
    fn overrides_are_pruned_with_their_document() {
        let policy = PricingPolicy::default();
        let mut batch = DocumentBatch::new();
        batch.add_document(document("a.csv", &["Harina"]));
        batch.add_document(document("b.csv", &["Aceite"]));
        batch.set_override(
            "Harina",
            ItemOverride {
                quantity: Some(9.0),
                base_cost: None,
            },
        );
        batch.set_override(
            "Aceite",
            ItemOverride {
                quantity: None,
                base_cost: Some(500),
            },
        );
        assert_eq!(batch.overrides().len(), 2);

        batch.remove_document("a.csv");
        assert_eq!(batch.overrides().len(), 1);
        assert!(batch.overrides().contains_key("Aceite"));
    }

    #[test]
    fn merged_items_apply_quantity_and_cost_corrections() {
        let policy = PricingPolicy::default();
        let mut batch = DocumentBatch::new();
        batch.add_document(document("a.csv", &["Harina"]));
        batch.set_override(
            "Harina",
            ItemOverride {
                quantity: Some(5.0),
                base_cost: Some(200),
            },
        );

        let items = batch.merged_items(&policy);
        assert_eq!(items[0].quantity, 5.0);
        assert_eq!(items[0].base_cost, 200);
        assert_eq!(items[0].tax_inclusive_cost, 238);
    }

    #[test]
    fn overrides_for_unknown_items_are_ignored() {
        let mut batch = DocumentBatch::new();
        batch.add_document(document("a.csv", &["Harina"]));
        batch.set_override("Fantasma", ItemOverride::default());
        assert!(batch.overrides().is_empty());
    }
}
