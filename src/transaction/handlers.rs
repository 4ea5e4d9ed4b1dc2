use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::models::{
    MessageResponse, PaginatedTransactionResponse, TransactionDto, TransactionFilters,
    TransactionIdPath, TransactionListQuery, TransactionResponse,
};
use super::service::TransactionService;

/// GET /transactions - Page through the caller's transactions
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Transactions",
    params(TransactionListQuery),
    responses(
        (status = 200, description = "Paginated list of transactions", body = PaginatedTransactionResponse),
        (status = 400, description = "Invalid filters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions")]
pub async fn list_transactions(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<TransactionListQuery>,
) -> Result<HttpResponse, AppError> {
    let filters = TransactionFilters::try_from(&query.into_inner())?;

    let (transactions, total) =
        TransactionService::list_transactions(pool.get_ref(), auth.user_id, &filters).await?;

    Ok(HttpResponse::Ok().json(PaginatedTransactionResponse {
        transactions: transactions.into_iter().map(Into::into).collect(),
        current_page: filters.page.page,
        total_pages: filters.page.total_pages(total),
        total_transactions: total,
    }))
}

/// GET /transactions/{id} - Fetch one transaction
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction details", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions/{id}")]
pub async fn get_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    let transaction =
        TransactionService::get_transaction(pool.get_ref(), auth.user_id, path.id).await?;

    Ok(HttpResponse::Ok().json(TransactionResponse::from(transaction)))
}

/// POST /transactions - Record a transaction
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "Transactions",
    request_body = TransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = TransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/transactions")]
pub async fn create_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<TransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let transaction =
        TransactionService::create_transaction(pool.get_ref(), auth.user_id, &body).await?;

    Ok(HttpResponse::Created().json(TransactionResponse::from(transaction)))
}

/// PUT /transactions/{id} - Replace a transaction
#[utoipa::path(
    put,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    request_body = TransactionDto,
    responses(
        (status = 200, description = "Transaction updated", body = TransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/transactions/{id}")]
pub async fn update_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
    body: web::Json<TransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let transaction =
        TransactionService::update_transaction(pool.get_ref(), auth.user_id, path.id, &body)
            .await?;

    Ok(HttpResponse::Ok().json(TransactionResponse::from(transaction)))
}

/// DELETE /transactions/{id} - Delete a transaction
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction deleted", body = MessageResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/transactions/{id}")]
pub async fn delete_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    TransactionService::delete_transaction(pool.get_ref(), auth.user_id, path.id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Transaction deleted successfully")))
}
