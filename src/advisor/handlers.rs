use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::client::GeminiClient;
use super::models::{
    Advice, AdviceRequest, AnomalyQuery, AnomalyReport, CreditScoreAdvice, FinancialGoals,
    InsightsResponse, InvestmentPlan,
};
use super::service::AdvisorService;

/// GET /ai-insights - Free-text advice on this month's finances
#[utoipa::path(
    get,
    path = "/ai-insights",
    tag = "Advice",
    responses(
        (status = 200, description = "Monthly summary and model advice", body = InsightsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Model call failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/ai-insights")]
pub async fn ai_insights(
    pool: web::Data<PgPool>,
    gemini: web::Data<GeminiClient>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let snapshot =
        AdvisorService::insights_snapshot(pool.get_ref(), auth.user_id, Utc::now()).await?;

    let request = AdviceRequest::Insights(snapshot.clone());
    let ai_advice = match AdvisorService::advise(gemini.get_ref(), &request).await? {
        Advice::Insights(text) => text,
        other => return Err(unexpected(other)),
    };

    Ok(HttpResponse::Ok().json(InsightsResponse {
        financial_summary: snapshot,
        ai_advice,
    }))
}

/// GET /detect-anomalies - Flag unusual recent transactions
#[utoipa::path(
    get,
    path = "/detect-anomalies",
    tag = "Advice",
    params(AnomalyQuery),
    responses(
        (status = 200, description = "Anomalies found by the model", body = AnomalyReport),
        (status = 400, description = "Invalid lookbackDays", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No transactions in the lookback window", body = ErrorResponse),
        (status = 500, description = "Model call failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/detect-anomalies")]
pub async fn detect_anomalies(
    pool: web::Data<PgPool>,
    gemini: web::Data<GeminiClient>,
    auth: AuthenticatedUser,
    query: web::Query<AnomalyQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let lines =
        AdvisorService::recent_transactions(pool.get_ref(), auth.user_id, query.days(), Utc::now())
            .await?;
    if lines.is_empty() {
        return Err(AppError::NotFound(
            "No transactions found for the specified period.".to_string(),
        ));
    }

    let anomalies =
        match AdvisorService::advise(gemini.get_ref(), &AdviceRequest::Anomalies(lines)).await? {
            Advice::Anomalies(list) => list,
            other => return Err(unexpected(other)),
        };

    Ok(HttpResponse::Ok().json(AnomalyReport {
        anomalies,
        message: "Fraud and anomaly detection completed.".to_string(),
    }))
}

/// GET /credit-score - Model-estimated credit score
#[utoipa::path(
    get,
    path = "/credit-score",
    tag = "Advice",
    responses(
        (status = 200, description = "Score, assessment, factors and recommendations", body = CreditScoreAdvice),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Model call failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/credit-score")]
pub async fn credit_score(
    pool: web::Data<PgPool>,
    gemini: web::Data<GeminiClient>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let snapshot = AdvisorService::credit_snapshot(pool.get_ref(), auth.user_id).await?;

    let advice =
        AdvisorService::advise(gemini.get_ref(), &AdviceRequest::CreditScore(snapshot)).await?;

    Ok(HttpResponse::Ok().json(advice))
}

/// GET /financial-goals - Short, medium and long term goals
#[utoipa::path(
    get,
    path = "/financial-goals",
    tag = "Advice",
    responses(
        (status = 200, description = "Suggested goals", body = FinancialGoals),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Model call failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/financial-goals")]
pub async fn financial_goals(
    pool: web::Data<PgPool>,
    gemini: web::Data<GeminiClient>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let snapshot =
        AdvisorService::goals_snapshot(pool.get_ref(), gemini.get_ref(), auth.user_id).await?;

    let advice = AdvisorService::advise(gemini.get_ref(), &AdviceRequest::Goals(snapshot)).await?;

    Ok(HttpResponse::Ok().json(advice))
}

/// GET /investment-recommendations - Portfolio suggestions
#[utoipa::path(
    get,
    path = "/investment-recommendations",
    tag = "Advice",
    responses(
        (status = 200, description = "Investment plan", body = InvestmentPlan),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Model call failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/investment-recommendations")]
pub async fn investment_recommendations(
    pool: web::Data<PgPool>,
    gemini: web::Data<GeminiClient>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let snapshot =
        AdvisorService::investment_snapshot(pool.get_ref(), gemini.get_ref(), auth.user_id)
            .await?;

    let advice =
        AdvisorService::advise(gemini.get_ref(), &AdviceRequest::Investments(snapshot)).await?;

    Ok(HttpResponse::Ok().json(advice))
}

fn unexpected(advice: Advice) -> AppError {
    AppError::Internal(format!("Unexpected advice kind {:?}", advice.kind()))
}
