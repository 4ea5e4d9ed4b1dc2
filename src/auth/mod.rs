pub mod handlers;
mod jwt;
pub mod models;
mod password;
mod service;

pub use handlers::{login, profile, register};

pub use jwt::{create_access_token, decode_token};
