pub mod generator;
pub mod handlers;
pub mod service;

pub use handlers::generate_mock_data;
