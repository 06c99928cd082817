use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PHONE_DIGITS: usize = 10;

/// A national phone number of exactly ten digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Accepts digits separated by whitespace, e.g. `"801 234 5678"`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::new("phone_number", "Phone number is required"));
        }

        if !input.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
            return Err(ValidationError::new(
                "phone_number",
                "Phone number can only contain digits and spaces",
            ));
        }

        let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() != PHONE_DIGITS {
            return Err(ValidationError::new(
                "phone_number",
                "Phone number must be exactly 10 digits",
            ));
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Country code followed by the national digits, no separators.
    pub fn international(&self, country_code: &str) -> String {
        format!("{}{}", country_code, self.0)
    }

    /// Human-readable form shown on the verification screen.
    pub fn display(&self, country_code: &str) -> String {
        format!("+{} {}", country_code, self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery channel for the one-time code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpChannel {
    #[default]
    Sms,
    Whatsapp,
}

impl OtpChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            OtpChannel::Sms => "sms",
            OtpChannel::Whatsapp => "whatsapp",
        }
    }
}

impl std::str::FromStr for OtpChannel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sms" => Ok(OtpChannel::Sms),
            "whatsapp" => Ok(OtpChannel::Whatsapp),
            other => Err(ValidationError::new(
                "channel",
                format!("Unsupported channel: {}", other),
            )),
        }
    }
}

/// `"+234 8012345678"` -> `"2348012345678"`.
pub fn normalize_display_phone(display: &str) -> String {
    display
        .strip_prefix('+')
        .unwrap_or(display)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
