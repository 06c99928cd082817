use crate::client::AuthApi;
use crate::error::AuthError;
use crate::types::{AuthData, VerifyOtpRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub is_logged_in: bool,
    pub token: String,
    pub user_id: String,
    pub phone_number: String,
    pub email: String,
    pub first_name: String,
}

/// Process-wide login state.
#[derive(Default)]
pub struct AuthSession {
    state: RwLock<AuthState>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(state: AuthState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    pub async fn logged_in(&self, data: &AuthData) {
        let mut state = self.state.write().await;
        *state = AuthState {
            is_logged_in: true,
            token: data.token.clone(),
            user_id: data.user_id.clone(),
            phone_number: data.phone_number.clone(),
            email: data.email.clone(),
            first_name: data.first_name.clone(),
        };
        tracing::info!("User {} logged in", state.user_id);
    }

    pub async fn logged_out(&self) {
        *self.state.write().await = AuthState::default();
        tracing::info!("User logged out");
    }

    pub async fn snapshot(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.state.read().await.is_logged_in
    }
}

/// Verifies a code and records the login on success.
#[derive(Clone)]
pub struct VerifyOtpService {
    api: Arc<dyn AuthApi>,
    session: Arc<AuthSession>,
}

impl VerifyOtpService {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<AuthSession>) -> Self {
        Self { api, session }
    }

    pub async fn verify(&self, request: &VerifyOtpRequest) -> Result<AuthData, AuthError> {
        let data = self.api.verify_otp(request).await?;
        self.session.logged_in(&data).await;
        Ok(data)
    }
}
