use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

const PASSWORD_SYMBOLS: &str = "@$!%*?&";
const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_MAX_LENGTH: usize = 30;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_alphanumeric(username: &str) -> Result<(), ValidationError> {
    if username.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("username_not_alphanumeric"))
    }
}

/// Password must be 8-30 characters, mix lowercase, uppercase, digits and
/// one of `@$!%*?&`, and contain nothing else.
fn validate_password(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();
    if length < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::new("password_too_short")
            .with_message("Password must be at least 8 characters long".into()));
    }
    if length > PASSWORD_MAX_LENGTH {
        return Err(ValidationError::new("password_too_long")
            .with_message("Password must not exceed 30 characters".into()));
    }

    let is_symbol = |c: char| PASSWORD_SYMBOLS.contains(c);

    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || is_symbol(c));
    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(is_symbol);

    if allowed && has_lowercase && has_uppercase && has_digit && has_symbol {
        Ok(())
    } else {
        Err(ValidationError::new("password_complexity").with_message(
            "Password must contain at least one uppercase letter, one lowercase letter, one number and one special character".into(),
        ))
    }
}

/// Request body for user registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterDto {
    /// Alphanumeric handle, 3-30 characters
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    #[validate(custom(
        function = "validate_alphanumeric",
        message = "Username must only contain letters and numbers"
    ))]
    #[schema(example = "jdoe42")]
    pub username: String,
    #[validate(email(message = "Email must be a valid email address"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "Passw0rd!")]
    pub password: String,
}

/// Request body for login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(email(message = "Email must be a valid email address"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: Uuid,
    #[schema(example = "jdoe42")]
    pub username: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponseDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// Token plus the user it was issued to
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// JWT bearer token (valid for 24 hours)
    pub token: String,
    pub user: UserResponseDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str) -> RegisterDto {
        RegisterDto {
            username: username.to_string(),
            email: "user@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(register("jdoe42", "Passw0rd!").validate().is_ok());
    }

    #[test]
    fn test_password_rules() {
        // missing symbol
        assert!(register("jdoe42", "Passw0rdd").validate().is_err());
        // missing uppercase
        assert!(register("jdoe42", "passw0rd!").validate().is_err());
        // disallowed character
        assert!(register("jdoe42", "Passw0rd!#").validate().is_err());
        // too short
        assert!(register("jdoe42", "Pa0!").validate().is_err());
        // too long
        assert!(register("jdoe42", "Passw0rd!Passw0rd!Passw0rd!Passw0rd!")
            .validate()
            .is_err());
    }

    fn password_error_code(password: &str) -> Option<String> {
        let errors = register("jdoe42", password).validate().err()?;
        let field_errors = errors.field_errors();
        let code = field_errors.get("password")?.first()?.code.to_string();
        Some(code)
    }

    #[test]
    fn test_password_length_messages_are_distinct() {
        assert_eq!(password_error_code("Pa0!").as_deref(), Some("password_too_short"));
        assert_eq!(
            password_error_code("Passw0rd!Passw0rd!Passw0rd!Passw0rd!").as_deref(),
            Some("password_too_long")
        );
        assert_eq!(
            password_error_code("passw0rd!").as_deref(),
            Some("password_complexity")
        );
        assert_eq!(password_error_code("Passw0rd!"), None);

        let message = register("jdoe42", "Pa0!").validate().unwrap_err().to_string();
        assert!(message.contains("at least 8 characters"));
    }

    #[test]
    fn test_username_rules() {
        assert!(register("jd", "Passw0rd!").validate().is_err());
        assert!(register("j.doe", "Passw0rd!").validate().is_err());
    }
}
