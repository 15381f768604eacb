/// Password hashing with Argon2id
///
/// Hashes are stored in PHC string format, so the parameters and salt travel
/// with the hash and verification needs nothing else.
///
/// # Parameters
///
/// - Memory: 64 MB (65536 KB)
/// - Iterations: 3
/// - Parallelism: 4 lanes
/// - Output: 32 bytes
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("hunter2hunter2")?;
/// assert!(verify_password("hunter2hunter2", &hash)?);
/// assert!(!verify_password("hunter3hunter3", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a plaintext password with a fresh random salt
///
/// Output looks like `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Checks a plaintext password against a stored hash
///
/// Returns `Ok(false)` on mismatch and an error only when the stored hash
/// cannot be parsed or verification itself fails.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}
