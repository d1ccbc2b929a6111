//! Authentication request/response shapes.

use serde::{Deserialize, Serialize};

/// Login request: phone plus either a password or an SMS code.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Phone number the account is registered under.
    pub phone: String,
    /// Account password, for password login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// SMS verification code, for code login.
    #[serde(rename = "smsCode", skip_serializing_if = "Option::is_none")]
    pub sms_code: Option<String>,
}

impl LoginRequest {
    /// Password login.
    #[must_use]
    pub fn with_password(phone: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            password: Some(password.into()),
            sms_code: None,
        }
    }

    /// SMS-code login.
    #[must_use]
    pub fn with_sms_code(phone: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            password: None,
            sms_code: Some(code.into()),
        }
    }
}

/// Payload of a successful login.
///
/// `merchant_id` comes back as a raw number; validation (positive or
/// absent) happens when the credential is built from this shape.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// Numeric user identifier.
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Raw merchant identifier; non-positive means absent.
    #[serde(rename = "merchantId", default)]
    pub merchant_id: Option<i64>,
    /// Role tag reported by the server.
    #[serde(default)]
    pub role: Option<String>,
}

/// Registration request.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Phone number to register.
    pub phone: String,
    /// Chosen password.
    pub password: String,
    /// SMS verification code.
    #[serde(rename = "smsCode")]
    pub sms_code: String,
    /// Display nickname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// SMS verification code request.
#[derive(Debug, Clone, Serialize)]
pub struct SmsCodeRequest {
    /// Phone number to send the code to.
    pub phone: String,
}
