use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;

use crate::errors::AppError;

lazy_static! {
    /// Argon2id, m=19456 KiB, t=2, p=1
    static ref HASHER: Argon2<'static> = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(19456, 2, 1, None).expect("Invalid Argon2 params")
    );

    /// Verified against when the login email is unknown, so both failure
    /// paths cost one Argon2 run.
    static ref DECOY_HASH: Option<String> = hash_password("decoy-Passw0rd!").ok();
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    HASHER
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is corrupt: {e}")))?;
    Ok(HASHER.verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Burn the same work as a real verification; always false.
pub fn verify_against_decoy(password: &str) -> bool {
    if let Some(hash) = DECOY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let hash = hash_password("Secure_Passw0rd!").expect("Should hash password");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_matches_only_original_password() {
        let hash = hash_password("Passw0rd!").expect("Should hash password");
        assert!(verify_password("Passw0rd!", &hash).expect("Should verify"));
        assert!(!verify_password("Passw0rd?", &hash).expect("Should verify"));
    }

    #[test]
    fn test_corrupt_hash_is_an_error() {
        assert!(verify_password("Passw0rd!", "plaintext").is_err());
    }

    #[test]
    fn test_decoy_never_matches() {
        assert!(!verify_against_decoy("decoy-Passw0rd!"));
    }
}
