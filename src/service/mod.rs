pub mod intake;
pub mod reconciler;
pub mod report;

pub use intake::IntakeService;
pub use reconciler::{IntakeContext, StockReconciler};
pub use report::ReportService;
