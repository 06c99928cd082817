//! Runtime permission orchestration for location and contacts access.
//!
//! Three pieces cooperate:
//!
//! - [`PermissionStore`] caches "asked before" and "granted" flags per kind in
//!   a [`KeyValueStore`](safecircle_storage::KeyValueStore).
//! - [`PermissionService`] reconciles the operating system's answer
//!   ([`PermissionApi`]) with the store and never fails its callers.
//! - [`PermissionState`] keeps the last known status in memory for screens,
//!   exposed through the [`PermissionController`] trait.

pub mod kind;
pub mod os;
pub mod service;
pub mod state;
pub mod store;

pub use kind::{CombinedPermissionResult, PermissionKind, PermissionRequestResult, PermissionSnapshot};
pub use os::{PermissionApi, PermissionApiError, PermissionStatus};
pub use service::PermissionService;
pub use state::{PermissionController, PermissionState};
pub use store::PermissionStore;
