use secrecy::Secret;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

use super::jwt::create_access_token;
use super::models::{AuthResponse, LoginDto, RegisterDto, User, UserResponseDto};
use super::password::{hash_password, verify_against_decoy, verify_password};

fn duplicate_user() -> AppError {
    AppError::Conflict("Email or username already registered".to_string())
}

/// Registration, login and profile lookups.
pub struct AuthService;

impl AuthService {
    pub async fn register(
        pool: &PgPool,
        jwt_secret: &Secret<String>,
        dto: &RegisterDto,
    ) -> Result<AuthResponse, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR username = $2)",
        )
        .bind(&dto.email)
        .bind(&dto.username)
        .fetch_one(pool)
        .await?;

        if taken {
            return Err(duplicate_user());
        }

        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&password_hash)
        .fetch_one(pool)
        .await
        // A concurrent registration can win between the check and the insert
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => duplicate_user(),
            other => other,
        })?;

        info!(user_id = %user.id, "Registered new user");

        let token = create_access_token(user.id, jwt_secret)?;
        Ok(AuthResponse {
            token,
            user: UserResponseDto::from(&user),
        })
    }

    pub async fn login(
        pool: &PgPool,
        jwt_secret: &Secret<String>,
        dto: &LoginDto,
    ) -> Result<AuthResponse, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&dto.email)
        .fetch_optional(pool)
        .await?;

        let valid = match &user {
            Some(user) => verify_password(&dto.password, &user.password_hash)?,
            None => verify_against_decoy(&dto.password),
        };

        match user {
            Some(user) if valid => {
                let token = create_access_token(user.id, jwt_secret)?;
                Ok(AuthResponse {
                    token,
                    user: UserResponseDto::from(&user),
                })
            }
            _ => Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            )),
        }
    }

    pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
