use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::dates::{DateRange, PeriodEcho};
use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::models::{
    BudgetComparisonResponse, DateRangeQuery, FinancialReport, MonthPeriod, MonthYearQuery,
    SpendingGroup,
};
use super::service::ReportService;

/// GET /spending-summary - Totals per category and type
#[utoipa::path(
    get,
    path = "/spending-summary",
    tag = "Reports",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Grouped totals, largest first", body = Vec<SpendingGroup>),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/spending-summary")]
pub async fn spending_summary(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    let range = DateRange::optional(query.start_date.as_deref(), query.end_date.as_deref())?;

    let summary =
        ReportService::spending_summary(pool.get_ref(), auth.user_id, range.as_ref()).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// GET /budget-comparison - Budgets against actual spending for one month
#[utoipa::path(
    get,
    path = "/budget-comparison",
    tag = "Reports",
    params(MonthYearQuery),
    responses(
        (status = 200, description = "One row per budgeted or spent category", body = BudgetComparisonResponse),
        (status = 400, description = "Missing or out-of-range month/year", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/budget-comparison")]
pub async fn budget_comparison(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<MonthYearQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let (Some(month), Some(year)) = (query.month, query.year) else {
        return Err(AppError::Validation(
            "Month and year are required query parameters".to_string(),
        ));
    };

    let range = DateRange::month(year, month)?;
    let comparison =
        ReportService::budget_vs_actual(pool.get_ref(), auth.user_id, &range).await?;

    Ok(HttpResponse::Ok().json(BudgetComparisonResponse {
        period: MonthPeriod { month, year },
        comparison,
    }))
}

/// GET /financial-report - Income, expenses and savings over a date range
#[utoipa::path(
    get,
    path = "/financial-report",
    tag = "Reports",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Report for the requested period", body = FinancialReport),
        (status = 400, description = "Missing or invalid date range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/financial-report")]
pub async fn financial_report(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let range = DateRange::required(query.start_date.as_deref(), query.end_date.as_deref())?;

    // Echo the period exactly as the caller wrote it.
    let period = PeriodEcho {
        start_date: query.start_date.unwrap_or_default(),
        end_date: query.end_date.unwrap_or_default(),
    };

    let report =
        ReportService::financial_report(pool.get_ref(), auth.user_id, &range, period).await?;

    Ok(HttpResponse::Ok().json(report))
}
