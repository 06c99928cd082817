use safecircle_auth::{
    normalize_display_phone, AuthApi, AuthError, AuthSession, DeviceIdProvider, OtpChannel,
    OtpInput, PhoneNumber, SignupRequest, ValidationError, VerifyOtpRequest, VerifyOtpService,
};
use safecircle_permissions::PermissionController;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Onboarding,
    Signup,
    VerifyOtp { phone: PhoneNumber },
    Permissions,
    Home,
}

#[derive(Debug, Error)]
pub enum FlowError {
    /// Form-level problem, shown as the field message.
    #[error("{}", .0.message)]
    InvalidInput(ValidationError),

    #[error("Please enter a valid 6-digit code")]
    IncompleteCode,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Where a fresh start lands.
pub async fn initial_route(session: &AuthSession, permissions: &dyn PermissionController) -> Route {
    if !session.is_logged_in().await {
        return Route::Onboarding;
    }
    permissions.refresh_permissions().await;
    if permissions.permissions().await.all_granted() {
        Route::Home
    } else {
        Route::Permissions
    }
}

/// Drives signup, code verification and the permission gate.
pub struct OnboardingFlow {
    api: Arc<dyn AuthApi>,
    verifier: VerifyOtpService,
    session: Arc<AuthSession>,
    devices: Arc<DeviceIdProvider>,
    permissions: Arc<dyn PermissionController>,
    country_code: String,
}

impl OnboardingFlow {
    pub fn new(
        api: Arc<dyn AuthApi>,
        session: Arc<AuthSession>,
        devices: Arc<DeviceIdProvider>,
        permissions: Arc<dyn PermissionController>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            verifier: VerifyOtpService::new(Arc::clone(&api), Arc::clone(&session)),
            api,
            session,
            devices,
            permissions,
            country_code: country_code.into(),
        }
    }

    pub async fn initial_route(&self) -> Route {
        initial_route(&self.session, self.permissions.as_ref()).await
    }

    /// Phone entry screen: requests a code and moves to verification.
    pub async fn submit_phone(&self, input: &str, channel: OtpChannel) -> Result<Route, FlowError> {
        let phone = PhoneNumber::parse(input).map_err(FlowError::InvalidInput)?;
        let device_id = self.devices.device_id().await;

        let request = SignupRequest::new(phone.international(&self.country_code), channel, device_id)
            .map_err(|e| AuthError::from_validation("signup", e))?;
        let message = self.api.signup(&request).await?;
        info!("Code requested via {}: {}", channel.as_str(), message);

        Ok(Route::VerifyOtp { phone })
    }

    /// Verification screen: checks the code, then asks for permissions.
    pub async fn submit_otp(&self, phone: &PhoneNumber, code: &OtpInput) -> Result<Route, FlowError> {
        if !code.is_complete() {
            return Err(FlowError::IncompleteCode);
        }

        let device_id = self.devices.device_id().await;
        let phone_number = normalize_display_phone(&phone.display(&self.country_code));
        let request = VerifyOtpRequest {
            phone_number,
            device_id,
            otp: code.code(),
        };
        self.verifier.verify(&request).await?;

        Ok(self.grant_permissions().await)
    }

    /// Permission screen button. Stays on the screen unless both are granted.
    pub async fn grant_permissions(&self) -> Route {
        let result = self.permissions.request_all_permissions().await;
        if result.all_granted() {
            Route::Home
        } else {
            warn!(
                "Some permissions were denied: location={} contacts={}",
                result.location.granted, result.contacts.granted
            );
            Route::Permissions
        }
    }
}
