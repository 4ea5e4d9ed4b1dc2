pub mod advisor;
pub mod auth;
pub mod budget;
pub mod config;
pub mod dates;
pub mod errors;
pub mod extractors;
pub mod health;
pub mod openapi;
pub mod pagination;
pub mod report;
pub mod routes;
pub mod seed;
pub mod transaction;
