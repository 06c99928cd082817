use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "safecircle.yaml";
pub const API_URL_ENV: &str = "SAFECIRCLE_API_URL";
pub const DATA_DIR_ENV: &str = "SAFECIRCLE_DATA_DIR";

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_country_code() -> String {
    "234".to_string()
}

fn default_otp_resend_seconds() -> u32 {
    900
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_otp_resend_seconds")]
    pub otp_resend_seconds: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            data_dir: default_data_dir(),
            country_code: default_country_code(),
            otp_resend_seconds: default_otp_resend_seconds(),
        }
    }
}

impl AppConfig {
    /// Reads `path` if it exists, then applies environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            self.api_url = Some(url);
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        Ok(())
    }

    /// The configured API base URL; required for any auth call.
    pub fn api_url(&self) -> Result<&str> {
        match self.api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => anyhow::bail!("Api Url required"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.country_code.is_empty() || !self.country_code.bytes().all(|b| b.is_ascii_digit()) {
            anyhow::bail!("country_code must be digits, got {:?}", self.country_code);
        }
        Ok(())
    }
}
