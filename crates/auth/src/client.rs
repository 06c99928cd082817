use crate::error::AuthError;
use crate::types::{ApiResponse, AuthData, SignupRequest, VerifyOtpRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};

const SIGNUP_PATH: &str = "/api/v1/auth/signup";
const VERIFY_OTP_PATH: &str = "/api/v1/auth/otp/verify";

/// Remote auth operations.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Request a one-time code. Returns the server's message.
    async fn signup(&self, request: &SignupRequest) -> Result<String, AuthError>;

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<AuthData, AuthError>;
}

pub struct HttpAuthClient {
    client: Client,
    base_url: String,
}

impl HttpAuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, AuthError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        // Error statuses still carry the JSON envelope; only fall back to the
        // status line when the body is not one.
        serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                AuthError::MalformedResponse(e.to_string())
            } else {
                AuthError::Http(format!("{}: {}", status, text))
            }
        })
    }
}

fn rejection_message(message: &str, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn signup(&self, request: &SignupRequest) -> Result<String, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::from_validation("signup", e))?;

        let result: ApiResponse<serde_json::Value> = self
            .post(SIGNUP_PATH, request)
            .await
            .inspect_err(|e| error!("Signup error: {}", e))?;

        if !result.success {
            let message = rejection_message(&result.message, "Signup request failed");
            error!("Signup error: {}", message);
            return Err(AuthError::Rejected(message));
        }

        info!("Signup accepted for {}", request.phone_number);
        Ok(result.message)
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<AuthData, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::from_validation("verify otp", e))?;

        let result: ApiResponse<AuthData> = self
            .post(VERIFY_OTP_PATH, request)
            .await
            .inspect_err(|e| error!("Verify otp error: {}", e))?;

        if !result.success {
            let message = rejection_message(&result.message, "Verify otp request failed");
            error!("Verify otp error: {}", message);
            return Err(AuthError::Rejected(message));
        }

        result.data.ok_or_else(|| {
            AuthError::MalformedResponse("verify otp succeeded without user data".to_string())
        })
    }
}
