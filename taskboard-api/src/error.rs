/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; every error converts into an HTTP status
/// and a JSON body:
///
/// ```json
/// { "error": "not_found", "message": "Task 9 not found" }
/// ```
///
/// Validation failures add a `details` array with one entry per field.
///
/// # Example
///
/// ```
/// use taskboard_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     Err(ApiError::NotFound("Nothing here".to_string()))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_shared::{
    auth::{authorization::AuthzError, middleware::AuthError},
    error::ServiceError,
};
use validator::{Validate, ValidationErrors};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. duplicate membership
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Validates a request body, turning failures into a 422
pub fn validate_request<T: Validate>(req: &T) -> ApiResult<()> {
    req.validate().map_err(ApiError::from)
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        let mut errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(errors)
    }
}

/// Convert service errors to API errors
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            ServiceError::BadRequest(msg) => ApiError::BadRequest(msg),
            ServiceError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            ServiceError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert auth errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
            AuthError::InvalidSubject => ApiError::BadRequest(err.to_string()),
        }
    }
}

/// Convert authorization errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_service_error_mapping() {
        assert!(matches!(
            ApiError::from(ServiceError::Forbidden("no".to_string())),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(ServiceError::Conflict("dup".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(ServiceError::Internal("db down".to_string())),
            ApiError::InternalError(_)
        ));
    }

    #[test]
    fn test_auth_error_mapping() {
        assert!(matches!(ApiError::from(AuthError::MissingCredentials), ApiError::Unauthorized(_)));
        assert!(matches!(
            ApiError::from(AuthError::InvalidFormat("Expected Bearer token".to_string())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(ApiError::from(AuthError::InvalidSubject), ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let (status, body) = body_json(ApiError::Conflict("already a member".to_string())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
        assert_eq!(body["message"], "already a member");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_is_masked() {
        let (status, body) = body_json(ApiError::InternalError("password=hunter2".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_validation_error_details() {
        let errors = vec![
            ValidationErrorDetail {
                field: "name".to_string(),
                message: "Name is required".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password too short".to_string(),
            },
        ];

        let (status, body) = body_json(ApiError::ValidationError(errors)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"][1]["field"], "password");
    }
}
