use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::advisor::models::{
    Anomaly, AnomalyReport, CreditScoreAdvice, FinancialGoals, InsightsResponse,
    InsightsSnapshot, InvestmentPlan, RiskLevel,
};
use crate::auth::models::{AuthResponse, LoginDto, RegisterDto, UserResponseDto};
use crate::budget::models::{BudgetDto, BudgetPeriod, BudgetResponse};
use crate::dates::PeriodEcho;
use crate::errors::ErrorResponse;
use crate::health::HealthResponse;
use crate::report::models::{
    BudgetComparison, BudgetComparisonResponse, CategoryTotal, FinancialReport, MonthPeriod,
    SpendingGroup,
};
use crate::transaction::models::{
    MessageResponse, PaginatedTransactionResponse, TransactionDto, TransactionResponse,
    TransactionType,
};

/// Security scheme modifier for Bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from /auth/login or /auth/register"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FinSight API",
        version = "0.1.0",
        description = "Personal finance tracking with budget reports and AI-generated advice",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Transactions", description = "Income and expense records"),
        (name = "Budgets", description = "Per-category spending limits"),
        (name = "Reports", description = "Aggregates over transactions and budgets"),
        (name = "Advice", description = "Generative-model advice built from aggregates"),
        (name = "Seed", description = "Demo data generation")
    ),
    paths(
        crate::health::health_check,
        // Auth
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::profile,
        // Transactions
        crate::transaction::handlers::list_transactions,
        crate::transaction::handlers::get_transaction,
        crate::transaction::handlers::create_transaction,
        crate::transaction::handlers::update_transaction,
        crate::transaction::handlers::delete_transaction,
        // Budgets
        crate::budget::handlers::list_budgets,
        crate::budget::handlers::create_budget,
        crate::budget::handlers::update_budget,
        crate::budget::handlers::delete_budget,
        // Reports
        crate::report::handlers::spending_summary,
        crate::report::handlers::budget_comparison,
        crate::report::handlers::financial_report,
        // Advice
        crate::advisor::handlers::ai_insights,
        crate::advisor::handlers::detect_anomalies,
        crate::advisor::handlers::credit_score,
        crate::advisor::handlers::financial_goals,
        crate::advisor::handlers::investment_recommendations,
        // Seed
        crate::seed::handlers::generate_mock_data,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            HealthResponse,
            // Auth
            RegisterDto,
            LoginDto,
            UserResponseDto,
            AuthResponse,
            // Transactions
            TransactionType,
            TransactionDto,
            TransactionResponse,
            PaginatedTransactionResponse,
            // Budgets
            BudgetPeriod,
            BudgetDto,
            BudgetResponse,
            // Reports
            PeriodEcho,
            SpendingGroup,
            CategoryTotal,
            BudgetComparison,
            MonthPeriod,
            BudgetComparisonResponse,
            FinancialReport,
            // Advice
            InsightsSnapshot,
            InsightsResponse,
            RiskLevel,
            Anomaly,
            AnomalyReport,
            CreditScoreAdvice,
            FinancialGoals,
            InvestmentPlan,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/register",
            "/transactions/{id}",
            "/budget-comparison",
            "/detect-anomalies",
            "/generate-mock-data",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
