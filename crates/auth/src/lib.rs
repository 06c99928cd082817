pub mod client;
pub mod device;
pub mod error;
pub mod otp;
pub mod phone;
pub mod session;
pub mod types;

pub use client::{AuthApi, HttpAuthClient};
pub use device::DeviceIdProvider;
pub use error::{AuthError, ValidationError};
pub use otp::{OtpInput, ResendCountdown, OTP_LENGTH};
pub use phone::{normalize_display_phone, OtpChannel, PhoneNumber};
pub use session::{AuthSession, AuthState, VerifyOtpService};
pub use types::{ApiErrorBody, ApiResponse, AuthData, ResponseMetadata, SignupRequest, VerifyOtpRequest};
