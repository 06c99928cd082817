use crate::kind::{CombinedPermissionResult, PermissionKind, PermissionRequestResult, PermissionSnapshot};
use crate::os::{PermissionApi, PermissionApiError};
use crate::store::PermissionStore;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Reconciles the OS permission state with the cached flags.
///
/// The OS is authoritative; the store only mirrors its last answer. No
/// operation here returns an error: OS failures degrade to "not granted".
#[derive(Clone)]
pub struct PermissionService {
    store: PermissionStore,
    api: Arc<dyn PermissionApi>,
}

impl PermissionService {
    pub fn new(store: PermissionStore, api: Arc<dyn PermissionApi>) -> Self {
        Self { store, api }
    }

    pub fn store(&self) -> &PermissionStore {
        &self.store
    }

    pub async fn request_location_permission(&self) -> PermissionRequestResult {
        self.request_permission(PermissionKind::Location).await
    }

    pub async fn request_contacts_permission(&self) -> PermissionRequestResult {
        self.request_permission(PermissionKind::Contacts).await
    }

    pub async fn request_permission(&self, kind: PermissionKind) -> PermissionRequestResult {
        match self.run_request_flow(kind).await {
            Ok(result) => {
                info!(
                    "{} permission: granted={} existing={} asked_before={} first_time={}",
                    kind, result.granted, result.existing, result.asked_before, result.first_time
                );
                result
            }
            Err(e) => {
                error!("Error requesting {} permission: {}", kind, e);
                PermissionRequestResult::failed(e.to_string())
            }
        }
    }

    async fn run_request_flow(
        &self,
        kind: PermissionKind,
    ) -> Result<PermissionRequestResult, PermissionApiError> {
        let existing = self.api.status(kind).await?;
        if existing.is_granted() {
            self.store.save_granted_status(kind, true).await;
            return Ok(PermissionRequestResult::existing());
        }

        if self.store.has_asked_before(kind).await {
            // The OS decides whether a second prompt is possible; only re-check
            let granted = self.api.status(kind).await?.is_granted();
            self.store.save_granted_status(kind, granted).await;
            return Ok(PermissionRequestResult::asked_before(granted));
        }

        self.store.mark_asked(kind).await;
        debug!("Prompting for {} permission", kind);
        let granted = self.api.request(kind).await?.is_granted();
        self.store.save_granted_status(kind, granted).await;
        Ok(PermissionRequestResult::first_time(granted))
    }

    /// Runs both flows concurrently. Each branch converts its own failures,
    /// so this always resolves with both results.
    pub async fn request_all_permissions(&self) -> CombinedPermissionResult {
        let (location, contacts) = tokio::join!(
            self.request_location_permission(),
            self.request_contacts_permission(),
        );
        CombinedPermissionResult { location, contacts }
    }

    /// Cached flags only; never prompts.
    pub async fn check_all_permissions(&self) -> PermissionSnapshot {
        let (location, contacts) = tokio::join!(
            self.store.get_granted_status(PermissionKind::Location),
            self.store.get_granted_status(PermissionKind::Contacts),
        );
        PermissionSnapshot { location, contacts }
    }

    pub async fn clear_permission_data(&self) {
        self.store.clear_all().await;
    }
}
