pub mod export;
pub mod pool;
pub mod queries;

pub use export::{inventory_report, inventory_template};
pub use pool::create_pool;
pub use queries::*;
