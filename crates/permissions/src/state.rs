use crate::kind::{CombinedPermissionResult, PermissionKind, PermissionRequestResult, PermissionSnapshot};
use crate::service::PermissionService;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Permission operations consumed by screens and flow controllers.
#[async_trait]
pub trait PermissionController: Send + Sync {
    /// Last known granted flags.
    async fn permissions(&self) -> PermissionSnapshot;

    /// True until the first load or request completes, and while any runs.
    fn is_loading(&self) -> bool;

    async fn request_location_permission(&self) -> PermissionRequestResult;

    async fn request_contacts_permission(&self) -> PermissionRequestResult;

    async fn request_all_permissions(&self) -> CombinedPermissionResult;

    /// Re-read the cached flags into memory.
    async fn refresh_permissions(&self);
}

/// In-memory view of the permission flags, kept in sync with every request.
pub struct PermissionState {
    service: PermissionService,
    permissions: RwLock<PermissionSnapshot>,
    hydrated: AtomicBool,
    in_flight: AtomicUsize,
}

/// Marks a load or request as running. Dropping it also ends the initial
/// loading phase, whichever operation finishes first.
struct Loading<'a> {
    hydrated: &'a AtomicBool,
    in_flight: &'a AtomicUsize,
}

impl<'a> Loading<'a> {
    fn enter(state: &'a PermissionState) -> Self {
        state.in_flight.fetch_add(1, Ordering::SeqCst);
        Self {
            hydrated: &state.hydrated,
            in_flight: &state.in_flight,
        }
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.hydrated.store(true, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PermissionState {
    /// Creates the state in loading mode; call [`load`](Self::load) to hydrate.
    pub fn new(service: PermissionService) -> Self {
        Self {
            service,
            permissions: RwLock::new(PermissionSnapshot::default()),
            hydrated: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Creates and hydrates in one step.
    pub async fn initialize(service: PermissionService) -> Self {
        let state = Self::new(service);
        state.load().await;
        state
    }

    pub fn service(&self) -> &PermissionService {
        &self.service
    }

    pub async fn load(&self) {
        let _guard = Loading::enter(self);
        let status = self.service.check_all_permissions().await;
        *self.permissions.write().await = status;
        tracing::debug!(
            "Loaded permission status: location={} contacts={}",
            status.location,
            status.contacts
        );
    }

    async fn request_single(&self, kind: PermissionKind) -> PermissionRequestResult {
        let _guard = Loading::enter(self);
        let result = self.service.request_permission(kind).await;
        if result.granted {
            self.permissions.write().await.set(kind, true);
        }
        result
    }
}

#[async_trait]
impl PermissionController for PermissionState {
    async fn permissions(&self) -> PermissionSnapshot {
        *self.permissions.read().await
    }

    fn is_loading(&self) -> bool {
        !self.hydrated.load(Ordering::SeqCst) || self.in_flight.load(Ordering::SeqCst) > 0
    }

    async fn request_location_permission(&self) -> PermissionRequestResult {
        self.request_single(PermissionKind::Location).await
    }

    async fn request_contacts_permission(&self) -> PermissionRequestResult {
        self.request_single(PermissionKind::Contacts).await
    }

    async fn request_all_permissions(&self) -> CombinedPermissionResult {
        let _guard = Loading::enter(self);
        let result = self.service.request_all_permissions().await;
        *self.permissions.write().await = result.snapshot();
        result
    }

    async fn refresh_permissions(&self) {
        self.load().await;
    }
}
