use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;
use crate::transaction::models::MessageResponse;

use super::models::{BudgetDto, BudgetIdPath, BudgetResponse};
use super::service::BudgetService;

/// GET /budgets - List the caller's budgets
#[utoipa::path(
    get,
    path = "/budgets",
    tag = "Budgets",
    responses(
        (status = 200, description = "List of budgets", body = Vec<BudgetResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/budgets")]
pub async fn list_budgets(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let budgets = BudgetService::list_budgets(pool.get_ref(), auth.user_id).await?;

    let response: Vec<BudgetResponse> = budgets.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// POST /budgets - Create a budget
#[utoipa::path(
    post,
    path = "/budgets",
    tag = "Budgets",
    request_body = BudgetDto,
    responses(
        (status = 201, description = "Budget created", body = BudgetResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/budgets")]
pub async fn create_budget(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<BudgetDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let budget = BudgetService::create_budget(pool.get_ref(), auth.user_id, &body).await?;

    Ok(HttpResponse::Created().json(BudgetResponse::from(budget)))
}

/// PUT /budgets/{id} - Replace a budget
#[utoipa::path(
    put,
    path = "/budgets/{id}",
    tag = "Budgets",
    params(BudgetIdPath),
    request_body = BudgetDto,
    responses(
        (status = 200, description = "Budget updated", body = BudgetResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/budgets/{id}")]
pub async fn update_budget(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<BudgetIdPath>,
    body: web::Json<BudgetDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let budget =
        BudgetService::update_budget(pool.get_ref(), auth.user_id, path.id, &body).await?;

    Ok(HttpResponse::Ok().json(BudgetResponse::from(budget)))
}

/// DELETE /budgets/{id} - Delete a budget
#[utoipa::path(
    delete,
    path = "/budgets/{id}",
    tag = "Budgets",
    params(BudgetIdPath),
    responses(
        (status = 200, description = "Budget deleted", body = MessageResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/budgets/{id}")]
pub async fn delete_budget(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<BudgetIdPath>,
) -> Result<HttpResponse, AppError> {
    BudgetService::delete_budget(pool.get_ref(), auth.user_id, path.id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Budget deleted successfully")))
}
