use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::LeaveError;

/// Salted argon2id hash in PHC string form.
pub fn hash_password(password: &str) -> Result<String, LeaveError> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| LeaveError::Credential(e.to_string()))
}

/// False for a wrong password and for anything that is not a PHC hash
/// (such as a plaintext password left over from before hashing).
pub fn verify_password(password: &str, hashed: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hashed) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_are_salted() {
        let first = hash_password("advisor123").expect("hash");
        let second = hash_password("advisor123").expect("hash");
        assert_ne!(first, second);
        assert!(verify_password("advisor123", &first));
        assert!(!verify_password("hod123", &first));
    }

    #[test]
    fn plaintext_never_verifies() {
        assert!(!verify_password("advisor123", "advisor123"));
    }
}
