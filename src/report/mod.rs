pub mod handlers;
pub mod models;
mod reconcile;
pub mod service;

pub use handlers::{budget_comparison, financial_report, spending_summary};
pub use reconcile::reconcile;
