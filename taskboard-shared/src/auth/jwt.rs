/// JWT token generation and validation
///
/// Tokens are signed with HS256 and identify the caller by user id (`sub`,
/// as a decimal string), login name and role. Issuer and audience are part
/// of [`JwtSettings`] and are checked on every validation.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Lifetime**: 1 hour from issuance
/// - **Validation**: signature, `exp`, `nbf`, `iss`, `aud`
/// - **Secret**: at least 32 bytes, enforced by the API configuration
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_token, validate_token, Claims, JwtSettings, Role};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = JwtSettings::new("your-secret-key-at-least-32-bytes!", "taskboard", "taskboard-clients");
///
/// let claims = Claims::new(42, "grace", Role::User, &settings);
/// let token = create_token(&claims, &settings)?;
///
/// let validated = validate_token(&token, &settings)?;
/// assert_eq!(validated.user_id(), Some(42));
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::user::User;

/// Token lifetime in seconds
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Token was minted for another audience
    #[error("Invalid token audience")]
    InvalidAudience,
}

/// Caller role carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator: manages users, projects and tasks
    Admin,

    /// Regular user
    User,
}

impl Role {
    /// Role matching a user's admin flag
    pub fn for_user(user: &User) -> Self {
        if user.is_admin {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// Gets role as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signing key plus the expected issuer and audience
#[derive(Clone)]
pub struct JwtSettings {
    /// HMAC secret
    pub secret: String,

    /// Value of the `iss` claim
    pub issuer: String,

    /// Value of the `aud` claim
    pub audience: String,
}

impl JwtSettings {
    /// Creates token settings
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

/// JWT claims
///
/// # Standard Claims
///
/// - `sub`: user ID as a decimal string
/// - `iss`, `aud`: from [`JwtSettings`]
/// - `iat`, `nbf`, `exp`: Unix timestamps
///
/// # Custom Claims
///
/// - `name`: login handle at issuance
/// - `role`: `admin` or `user`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: String,

    /// Login handle
    pub name: String,

    /// Caller role
    pub role: Role,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims valid for [`TOKEN_TTL_SECONDS`]
    pub fn new(user_id: i64, name: impl Into<String>, role: Role, settings: &JwtSettings) -> Self {
        Self::with_expiration(
            user_id,
            name,
            role,
            settings,
            Duration::seconds(TOKEN_TTL_SECONDS),
        )
    }

    /// Creates claims with a custom lifetime
    pub fn with_expiration(
        user_id: i64,
        name: impl Into<String>,
        role: Role,
        settings: &JwtSettings,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id.to_string(),
            name: name.into(),
            role,
            iss: settings.issuer.clone(),
            aud: settings.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Parses the subject as a user ID
    ///
    /// Returns `None` when the subject is not a decimal integer.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, settings: &JwtSettings) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(settings.secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, `exp`, `nbf`, issuer and audience.
pub fn validate_token(token: &str, settings: &JwtSettings) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(settings.secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[settings.issuer.as_str()]);
    validation.set_audience(&[settings.audience.as_str()]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        ErrorKind::InvalidAudience => JwtError::InvalidAudience,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Issues a token for a user record
pub fn issue_token(user: &User, settings: &JwtSettings) -> Result<String, JwtError> {
    let claims = Claims::new(user.id, user.name.clone(), Role::for_user(user), settings);
    create_token(&claims, settings)
}
