use crate::kind::PermissionKind;
use safecircle_storage::KeyValueStore;
use std::sync::Arc;
use tracing::error;

const TRUE: &str = "true";
const FALSE: &str = "false";

/// Cached permission flags. Never fails: reads default to `false`, writes
/// are best effort.
#[derive(Clone)]
pub struct PermissionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl PermissionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn has_asked_before(&self, kind: PermissionKind) -> bool {
        match self.kv.get(kind.asked_key()).await {
            Ok(value) => value.as_deref() == Some(TRUE),
            Err(e) => {
                error!("Error checking {} permission status: {}", kind, e);
                false
            }
        }
    }

    pub async fn mark_asked(&self, kind: PermissionKind) {
        if let Err(e) = self.kv.set(kind.asked_key(), TRUE).await {
            error!("Error marking {} as asked: {}", kind, e);
        }
    }

    pub async fn save_granted_status(&self, kind: PermissionKind, granted: bool) {
        let value = if granted { TRUE } else { FALSE };
        if let Err(e) = self.kv.set(kind.granted_key(), value).await {
            error!("Error saving {} status: {}", kind, e);
        }
    }

    pub async fn get_granted_status(&self, kind: PermissionKind) -> bool {
        match self.kv.get(kind.granted_key()).await {
            Ok(value) => value.as_deref() == Some(TRUE),
            Err(e) => {
                error!("Error getting {} status: {}", kind, e);
                false
            }
        }
    }

    pub async fn clear_all(&self) {
        let keys: Vec<&str> = PermissionKind::ALL
            .iter()
            .flat_map(|kind| [kind.asked_key(), kind.granted_key()])
            .collect();

        if let Err(e) = self.kv.multi_remove(&keys).await {
            error!("Error clearing permission data: {}", e);
        }
    }
}
