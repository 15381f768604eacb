/// Bearer token authentication
///
/// Turns an `Authorization: Bearer <token>` header into an [`AuthContext`].
/// The API server runs [`authenticate_bearer`] from its auth layer and
/// inserts the context into request extensions, where handlers pick it up
/// with `Extension<AuthContext>`.
///
/// # Failure modes
///
/// | Condition                      | Error                            |
/// |--------------------------------|----------------------------------|
/// | header missing or not ASCII    | [`AuthError::MissingCredentials`] |
/// | scheme other than `Bearer`     | [`AuthError::InvalidFormat`]      |
/// | bad signature, expired, etc.   | [`AuthError::InvalidToken`]       |
/// | subject is not a user id       | [`AuthError::InvalidSubject`]     |

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, Claims, JwtError, JwtSettings, Role};

/// Authenticated caller, added to request extensions
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("{} ({})", auth.name, auth.role)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Caller's user ID
    pub user_id: i64,

    /// Caller's login handle at token issuance
    pub name: String,

    /// Caller's role
    pub role: Role,
}

impl AuthContext {
    /// Creates a context directly
    pub fn new(user_id: i64, name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            name: name.into(),
            role,
        }
    }

    /// Builds a context from validated claims
    ///
    /// Fails with [`AuthError::InvalidSubject`] if `sub` is not an integer.
    pub fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        let user_id = claims.user_id().ok_or(AuthError::InvalidSubject)?;

        Ok(Self {
            user_id,
            name: claims.name,
            role: claims.role,
        })
    }

    /// True for administrators
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Error type for bearer authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Authorization header is not a bearer credential
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),

    /// Token subject is not a user ID
    #[error("Invalid user identity in token")]
    InvalidSubject,
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
            JwtError::InvalidAudience => {
                AuthError::InvalidToken("Invalid token audience".to_string())
            }
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        }
    }
}

/// Authenticates a request from its headers
pub fn authenticate_bearer(
    headers: &HeaderMap,
    settings: &JwtSettings,
) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token.trim(), settings)?;

    AuthContext::from_claims(claims)
}
