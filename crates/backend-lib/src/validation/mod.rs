// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation module.

use chirpy_common::{LoginRequest, WebhookRequest};
use thiserror::Error;
use uuid::Uuid;

use crate::error::AppError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_PASSWORD_LENGTH: usize = 1024;

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Size caps on login credentials.
///
/// Format and emptiness are not checked here: an unknown or malformed email
/// and an empty password must fail login the same way a wrong password does.
pub fn validate_login_request(request: &LoginRequest) -> ValidationResult<()> {
    if request.email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email address cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if request.password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password cannot exceed {MAX_PASSWORD_LENGTH} bytes"
        )));
    }

    Ok(())
}

/// Parse the user id carried by a webhook payload
pub fn validate_webhook_user_id(request: &WebhookRequest) -> ValidationResult<Uuid> {
    Uuid::parse_str(request.data.user_id.trim())
        .map_err(|_| ValidationError::InvalidUserId(request.data.user_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpy_common::WebhookData;

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            expires_in_seconds: None,
        }
    }

    #[test]
    fn test_validate_login_request_caps_lengths() {
        assert!(validate_login_request(&login("walt@breakingbad.com", "04234")).is_ok());
        assert!(matches!(
            validate_login_request(&login(&format!("{}@example.com", "a".repeat(250)), "04234")),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_login_request(&login("walt@breakingbad.com", &"x".repeat(MAX_PASSWORD_LENGTH + 1))),
            Err(ValidationError::InvalidPassword(_))
        ));
    }

    #[test]
    fn test_login_format_is_left_to_credential_check() {
        assert!(validate_login_request(&login("admin", "x")).is_ok());
        assert!(validate_login_request(&login("walt@breakingbad.com", "")).is_ok());
        assert!(validate_login_request(&login("", "")).is_ok());
    }

    #[test]
    fn test_validate_webhook_user_id() {
        let id = Uuid::new_v4();
        let request = WebhookRequest {
            event: "user.upgraded".to_string(),
            data: WebhookData { user_id: id.to_string() },
        };
        assert_eq!(validate_webhook_user_id(&request), Ok(id));

        let request = WebhookRequest {
            event: "user.upgraded".to_string(),
            data: WebhookData { user_id: "nope".to_string() },
        };
        assert!(validate_webhook_user_id(&request).is_err());
    }

    #[test]
    fn test_validation_error_maps_to_bad_request() {
        let err: AppError = ValidationError::InvalidEmail("x".into()).into();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
