pub mod health;
pub mod journal;

pub use health::health_handler;
pub use journal::{analyze_handler, entries_handler, insights_handler};
