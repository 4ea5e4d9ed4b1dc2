use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;

use crate::errors::AppError;

use super::models::TokenClaims;

pub const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 24;

/// Create a signed access token for a user
pub fn create_access_token(user_id: Uuid, jwt_secret: &Secret<String>) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS);

    let claims = TokenClaims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create access token: {e}")))
}

/// Decode and validate an access token
pub fn decode_token(token: &str, jwt_secret: &Secret<String>) -> Result<TokenClaims, AppError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let secret = Secret::new("test_secret".to_string());
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, &secret).expect("Should create token");
        let claims = decode_token(&token, &secret).expect("Should decode token");
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = create_access_token(Uuid::new_v4(), &Secret::new("one".to_string()))
            .expect("Should create token");
        let result = decode_token(&token, &Secret::new("two".to_string()));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = decode_token("not.a.jwt", &Secret::new("secret".to_string()));
        assert!(result.is_err());
    }
}
