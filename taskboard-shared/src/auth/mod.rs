/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 token issuance and validation
/// - [`middleware`]: Bearer header parsing into an [`middleware::AuthContext`]
/// - [`authorization`]: role checks and the task status policy
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_token, validate_token, Claims, JwtSettings, Role};
/// use taskboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("correct horse battery")?;
/// assert!(verify_password("correct horse battery", &hash)?);
///
/// let settings = JwtSettings::new("a-signing-secret-of-at-least-32-bytes", "taskboard", "taskboard-clients");
/// let token = create_token(&Claims::new(1, "ada", Role::Admin, &settings), &settings)?;
/// assert_eq!(validate_token(&token, &settings)?.name, "ada");
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
