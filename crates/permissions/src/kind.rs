use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionKind {
    Location,
    Contacts,
}

impl PermissionKind {
    pub const ALL: [PermissionKind; 2] = [PermissionKind::Location, PermissionKind::Contacts];

    pub fn asked_key(self) -> &'static str {
        match self {
            PermissionKind::Location => "@app_location_asked",
            PermissionKind::Contacts => "@app_contacts_asked",
        }
    }

    pub fn granted_key(self) -> &'static str {
        match self {
            PermissionKind::Location => "@app_location_granted",
            PermissionKind::Contacts => "@app_contacts_granted",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PermissionKind::Location => "LOCATION",
            PermissionKind::Contacts => "CONTACTS",
        }
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one request flow.
///
/// At most one of `existing`, `asked_before` and `first_time` is set, naming
/// the checkpoint that produced the result. None is set when `error` is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRequestResult {
    pub granted: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub existing: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub asked_before: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub first_time: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PermissionRequestResult {
    pub fn existing() -> Self {
        Self {
            granted: true,
            existing: true,
            ..Default::default()
        }
    }

    pub fn asked_before(granted: bool) -> Self {
        Self {
            granted,
            asked_before: true,
            ..Default::default()
        }
    }

    pub fn first_time(granted: bool) -> Self {
        Self {
            granted,
            first_time: true,
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            granted: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedPermissionResult {
    pub location: PermissionRequestResult,
    pub contacts: PermissionRequestResult,
}

impl CombinedPermissionResult {
    pub fn get(&self, kind: PermissionKind) -> &PermissionRequestResult {
        match kind {
            PermissionKind::Location => &self.location,
            PermissionKind::Contacts => &self.contacts,
        }
    }

    pub fn all_granted(&self) -> bool {
        self.location.granted && self.contacts.granted
    }

    pub fn snapshot(&self) -> PermissionSnapshot {
        PermissionSnapshot {
            location: self.location.granted,
            contacts: self.contacts.granted,
        }
    }
}

/// Cached granted flags for every kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSnapshot {
    pub location: bool,
    pub contacts: bool,
}

impl PermissionSnapshot {
    pub fn get(&self, kind: PermissionKind) -> bool {
        match kind {
            PermissionKind::Location => self.location,
            PermissionKind::Contacts => self.contacts,
        }
    }

    pub fn set(&mut self, kind: PermissionKind, granted: bool) {
        match kind {
            PermissionKind::Location => self.location = granted,
            PermissionKind::Contacts => self.contacts = granted,
        }
    }

    pub fn all_granted(&self) -> bool {
        self.location && self.contacts
    }
}
