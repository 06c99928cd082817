//! Boundary to the operating system's permission prompts.

use crate::kind::PermissionKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

#[derive(Debug, Error)]
pub enum PermissionApiError {
    #[error("Permission subsystem unavailable: {0}")]
    Unavailable(String),

    #[error("Permission request failed: {0}")]
    RequestFailed(String),
}

/// Location and contacts permission APIs, keyed by kind.
///
/// `status` never prompts. `request` may show a system prompt; after a
/// denial most platforms answer without prompting again.
#[async_trait]
pub trait PermissionApi: Send + Sync {
    async fn status(&self, kind: PermissionKind) -> Result<PermissionStatus, PermissionApiError>;

    async fn request(&self, kind: PermissionKind) -> Result<PermissionStatus, PermissionApiError>;
}
