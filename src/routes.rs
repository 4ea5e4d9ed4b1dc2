use actix_web::web;

use crate::errors::{json_error_handler, path_error_handler, query_error_handler};
use crate::{advisor, auth, budget, health, report, seed, transaction};

/// Extractor error handlers and every route except register/login.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(health::health_check)
        .service(auth::profile)
        // Transactions
        .service(transaction::list_transactions)
        .service(transaction::create_transaction)
        .service(transaction::get_transaction)
        .service(transaction::update_transaction)
        .service(transaction::delete_transaction)
        // Budgets
        .service(budget::list_budgets)
        .service(budget::create_budget)
        .service(budget::update_budget)
        .service(budget::delete_budget)
        // Reports
        .service(report::spending_summary)
        .service(report::budget_comparison)
        .service(report::financial_report)
        // Advice
        .service(advisor::ai_insights)
        .service(advisor::detect_anomalies)
        .service(advisor::credit_score)
        .service(advisor::financial_goals)
        .service(advisor::investment_recommendations)
        // Seed
        .service(seed::generate_mock_data);
}

/// Credential endpoints; `main` wraps these in the rate limiter.
pub fn configure_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register).service(auth::login);
}
