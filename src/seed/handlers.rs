use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;
use crate::transaction::models::MessageResponse;

use super::generator::generate;
use super::service::SeedService;

/// POST /generate-mock-data - Fill the caller's account with a year of sample data
#[utoipa::path(
    post,
    path = "/generate-mock-data",
    tag = "Seed",
    responses(
        (status = 201, description = "Mock data inserted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/generate-mock-data")]
pub async fn generate_mock_data(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let data = generate(&mut rand::thread_rng(), Utc::now());

    SeedService::insert_mock_data(pool.get_ref(), auth.user_id, &data).await?;

    Ok(HttpResponse::Created().json(MessageResponse::new("Mock data generated successfully")))
}
