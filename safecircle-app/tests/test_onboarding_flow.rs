use async_trait::async_trait;
use safecircle_app::console::Prompter;
use safecircle_app::{AppConfig, AppContext, ErrorNotice, FlowError, OnboardingFlow, Route};
use safecircle_auth::{
    AuthApi, AuthData, AuthError, AuthSession, DeviceIdProvider, OtpChannel, OtpInput,
    PhoneNumber, SignupRequest, VerifyOtpRequest,
};
use safecircle_permissions::{
    PermissionApi, PermissionApiError, PermissionController, PermissionKind, PermissionService,
    PermissionState, PermissionStatus, PermissionStore,
};
use safecircle_storage::{MemoryKeyValueStore, SecureStore};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingAuthApi {
    signups: Mutex<Vec<SignupRequest>>,
    verifications: Mutex<Vec<VerifyOtpRequest>>,
}

#[async_trait]
impl AuthApi for RecordingAuthApi {
    async fn signup(&self, request: &SignupRequest) -> Result<String, AuthError> {
        self.signups.lock().unwrap().push(request.clone());
        Ok("OTP sent".to_string())
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<AuthData, AuthError> {
        self.verifications.lock().unwrap().push(request.clone());
        if request.otp != "123456" {
            return Err(AuthError::Rejected("Invalid verification code".to_string()));
        }
        Ok(AuthData {
            user_id: "u-42".to_string(),
            phone_number: request.phone_number.clone(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            token: "jwt".to_string(),
        })
    }
}

/// Answers prompts with fixed decisions and never reports a prior grant.
struct FixedOs {
    location: PermissionStatus,
    contacts: PermissionStatus,
}

#[async_trait]
impl PermissionApi for FixedOs {
    async fn status(&self, _kind: PermissionKind) -> Result<PermissionStatus, PermissionApiError> {
        Ok(PermissionStatus::Undetermined)
    }

    async fn request(&self, kind: PermissionKind) -> Result<PermissionStatus, PermissionApiError> {
        Ok(match kind {
            PermissionKind::Location => self.location,
            PermissionKind::Contacts => self.contacts,
        })
    }
}

struct Harness {
    _temp: TempDir,
    api: Arc<RecordingAuthApi>,
    session: Arc<AuthSession>,
    flow: OnboardingFlow,
}

async fn harness(location: PermissionStatus, contacts: PermissionStatus) -> Harness {
    let temp = TempDir::new().unwrap();
    let secure = Arc::new(SecureStore::new(temp.path(), &[5u8; 32]).unwrap());
    secure.store_secret("deviceId", "device-xyz").unwrap();

    let service = PermissionService::new(
        PermissionStore::new(Arc::new(MemoryKeyValueStore::new())),
        Arc::new(FixedOs { location, contacts }),
    );
    let permissions: Arc<dyn PermissionController> =
        Arc::new(PermissionState::initialize(service).await);

    let api = Arc::new(RecordingAuthApi::default());
    let session = Arc::new(AuthSession::new());
    let flow = OnboardingFlow::new(
        api.clone(),
        session.clone(),
        Arc::new(DeviceIdProvider::new(secure)),
        permissions,
        "234",
    );

    Harness {
        _temp: temp,
        api,
        session,
        flow,
    }
}

fn code(text: &str) -> OtpInput {
    let mut input = OtpInput::new();
    input.paste(text);
    input
}

#[tokio::test]
async fn test_submit_phone_sends_international_number() {
    let h = harness(PermissionStatus::Granted, PermissionStatus::Granted).await;

    let route = h
        .flow
        .submit_phone("801 234 5678", OtpChannel::Whatsapp)
        .await
        .unwrap();

    assert_eq!(
        route,
        Route::VerifyOtp {
            phone: PhoneNumber::parse("8012345678").unwrap()
        }
    );
    let signups = h.api.signups.lock().unwrap();
    assert_eq!(signups.len(), 1);
    assert_eq!(signups[0].phone_number, "2348012345678");
    assert_eq!(signups[0].channel, OtpChannel::Whatsapp);
    assert_eq!(signups[0].device_id, "device-xyz");
}

#[tokio::test]
async fn test_submit_phone_rejects_bad_input_locally() {
    let h = harness(PermissionStatus::Granted, PermissionStatus::Granted).await;

    let err = h
        .flow
        .submit_phone("0801-234", OtpChannel::Sms)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Phone number can only contain digits and spaces"
    );
    assert!(h.api.signups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_incomplete_code_is_not_sent() {
    let h = harness(PermissionStatus::Granted, PermissionStatus::Granted).await;
    let phone = PhoneNumber::parse("8012345678").unwrap();

    let err = h.flow.submit_otp(&phone, &code("123")).await.unwrap_err();

    assert!(matches!(err, FlowError::IncompleteCode));
    let notice = ErrorNotice::from_flow_error(&err).unwrap();
    assert_eq!(notice.message(), "Please enter a valid 6-digit code");
    assert!(h.api.verifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_verified_with_all_permissions_goes_home() {
    let h = harness(PermissionStatus::Granted, PermissionStatus::Granted).await;
    let phone = PhoneNumber::parse("8012345678").unwrap();

    let route = h.flow.submit_otp(&phone, &code("123456")).await.unwrap();

    assert_eq!(route, Route::Home);
    let verifications = h.api.verifications.lock().unwrap();
    assert_eq!(verifications[0].phone_number, "2348012345678");
    assert_eq!(verifications[0].device_id, "device-xyz");
    assert!(h.session.is_logged_in().await);
}

#[tokio::test]
async fn test_verified_with_denied_permission_goes_to_permissions() {
    let h = harness(PermissionStatus::Granted, PermissionStatus::Denied).await;
    let phone = PhoneNumber::parse("8012345678").unwrap();

    let route = h.flow.submit_otp(&phone, &code("123456")).await.unwrap();
    assert_eq!(route, Route::Permissions);

    // Button on the permission screen: the denial sticks, stay put
    assert_eq!(h.flow.grant_permissions().await, Route::Permissions);
    assert_eq!(h.flow.initial_route().await, Route::Permissions);
}

#[tokio::test]
async fn test_rejected_code_surfaces_server_message() {
    let h = harness(PermissionStatus::Granted, PermissionStatus::Granted).await;
    let phone = PhoneNumber::parse("8012345678").unwrap();

    let err = h.flow.submit_otp(&phone, &code("000000")).await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid verification code");
    assert!(!h.session.is_logged_in().await);
    assert_eq!(h.flow.initial_route().await, Route::Onboarding);
}

struct AlwaysYes;

#[async_trait]
impl Prompter for AlwaysYes {
    async fn confirm(&self, _question: &str) -> bool {
        true
    }
}

#[tokio::test]
async fn test_context_wires_persistent_services() {
    let temp = TempDir::new().unwrap();
    let config = AppConfig {
        api_url: Some("http://127.0.0.1:9".to_string()),
        data_dir: temp.path().join("data"),
        ..AppConfig::default()
    };

    let device_id = {
        let context = AppContext::build_with_prompter(config.clone(), Arc::new(AlwaysYes))
            .await
            .unwrap();
        assert!(!context.permissions.is_loading());

        let result = context.permissions.request_all_permissions().await;
        assert!(result.location.first_time && result.contacts.first_time);
        assert!(result.all_granted());

        context
            .session
            .logged_in(&AuthData {
                user_id: "u-1".to_string(),
                phone_number: "2348012345678".to_string(),
                email: "ada@example.com".to_string(),
                first_name: "Ada".to_string(),
                token: "jwt".to_string(),
            })
            .await;
        context.persist_session().await.unwrap();
        context.devices.device_id().await
    };

    let context = AppContext::build_with_prompter(config, Arc::new(AlwaysYes))
        .await
        .unwrap();
    assert_eq!(context.devices.device_id().await, device_id);
    assert!(context.permissions.permissions().await.all_granted());
    assert_eq!(context.session.snapshot().await.first_name, "Ada");
    assert_eq!(context.initial_route().await, Route::Home);

    context.session.logged_out().await;
    context.persist_session().await.unwrap();
    assert_eq!(context.initial_route().await, Route::Onboarding);
}
