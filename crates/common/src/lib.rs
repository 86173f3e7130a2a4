// ================
// common/src/lib.rs
// ================
//! Request and response shapes
//! shared between the Chirpy API server and its clients.
//! Every JSON body the auth endpoints accept or return is defined here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Plaintext password, verified against the stored digest
    pub password: String,
    /// Requested access-token lifetime. Clamped by the server to one hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<u64>,
}

/// Public user fields returned to clients
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

/// Response to a successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserView,
    /// Signed access token
    pub token: String,
    /// Opaque refresh token
    pub refresh_token: String,
}

/// Response to `POST /api/refresh`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RefreshResponse {
    /// Freshly minted access token
    pub token: String,
}

/// Body of `POST /api/polka/webhooks`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

/// Payload of a webhook event
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WebhookData {
    pub user_id: String,
}

/// The only webhook event that has an effect
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_ttl_is_optional() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.io","password":"pw"}"#).unwrap();
        assert_eq!(req.email, "a@b.io");
        assert!(req.expires_in_seconds.is_none());

        let req: LoginRequest = serde_json::from_str(
            r#"{"email":"a@b.io","password":"pw","expires_in_seconds":60}"#,
        )
        .unwrap();
        assert_eq!(req.expires_in_seconds, Some(60));
    }

    #[test]
    fn login_response_flattens_user_fields() {
        let now = Utc::now();
        let resp = LoginResponse {
            user: UserView {
                id: Uuid::new_v4(),
                created_at: now,
                updated_at: now,
                email: "a@b.io".to_string(),
                is_chirpy_red: false,
            },
            token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        };

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["email"], "a@b.io");
        assert_eq!(json["token"], "access");
        assert_eq!(json["refresh_token"], "refresh");
        assert_eq!(json["is_chirpy_red"], false);
        assert!(json.get("user").is_none());
    }
}
