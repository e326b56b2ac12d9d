pub mod batch;
pub mod line_item;
pub mod movement;
pub mod product;

pub use batch::{DocumentBatch, DocumentUpload, ItemOverride};
pub use line_item::{Extraction, ParsedLineItem, SupplierDocument};
pub use movement::{InventoryMovement, MovementType, NewMovement};
pub use product::{NewProduct, Product, ReportRow, Unit};
