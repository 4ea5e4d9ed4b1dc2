pub mod client;
pub mod handlers;
pub mod models;
mod prompts;
pub mod repair;
pub mod service;

pub use client::{GeminiClient, TextGenerator};
pub use handlers::{
    ai_insights, credit_score, detect_anomalies, financial_goals, investment_recommendations,
};
