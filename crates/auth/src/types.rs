//! Request and response bodies of the auth API.

use crate::error::ValidationError;
use crate::otp::OTP_LENGTH;
use crate::phone::{OtpChannel, PHONE_DIGITS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SIGNUP_PREFIX: &str = "234";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub phone_number: String,
    pub channel: OtpChannel,
    pub device_id: String,
}

impl SignupRequest {
    pub fn new(
        phone_number: impl Into<String>,
        channel: OtpChannel,
        device_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let request = Self {
            phone_number: phone_number.into(),
            channel,
            device_id: device_id.into(),
        };
        request.validate()?;
        Ok(request)
    }

    /// `phone_number` must be `234` followed by ten digits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let national = self
            .phone_number
            .strip_prefix(SIGNUP_PREFIX)
            .filter(|rest| rest.len() == PHONE_DIGITS && rest.bytes().all(|b| b.is_ascii_digit()));
        if national.is_none() {
            return Err(ValidationError::new(
                "phone_number",
                format!("Expected {} followed by {} digits", SIGNUP_PREFIX, PHONE_DIGITS),
            ));
        }

        if self.device_id.is_empty() {
            return Err(ValidationError::new("device_id", "Device ID is required"));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyOtpRequest {
    pub phone_number: String,
    pub device_id: String,
    pub otp: String,
}

impl VerifyOtpRequest {
    pub fn new(
        phone_number: impl Into<String>,
        device_id: impl Into<String>,
        otp: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let request = Self {
            phone_number: phone_number.into(),
            device_id: device_id.into(),
            otp: otp.into(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.phone_number.is_empty() {
            return Err(ValidationError::new("phone_number", "Phone number is required"));
        }
        if self.device_id.is_empty() {
            return Err(ValidationError::new("device_id", "Device ID is required"));
        }
        if self.otp.len() != OTP_LENGTH || !self.otp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::new("otp", "Code must be exactly 6 digits"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Envelope shared by every auth endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
    #[serde(default)]
    pub metadata: Option<ResponseMetadata>,
}

/// Logged-in user returned by OTP verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user_id: String,
    pub phone_number: String,
    pub email: String,
    pub first_name: String,
    pub token: String,
}
