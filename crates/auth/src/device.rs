use safecircle_storage::SecureStore;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

pub const DEVICE_ID_KEY: &str = "deviceId";

/// Stable per-install identifier sent with every auth request.
///
/// The first call reads the secure store and generates a UUID if nothing is
/// stored. A failed save still yields an id for this run.
pub struct DeviceIdProvider {
    store: Arc<SecureStore>,
    cached: OnceCell<String>,
}

impl DeviceIdProvider {
    pub fn new(store: Arc<SecureStore>) -> Self {
        Self {
            store,
            cached: OnceCell::new(),
        }
    }

    pub async fn device_id(&self) -> String {
        self.cached
            .get_or_init(|| async {
                let store = Arc::clone(&self.store);
                match tokio::task::spawn_blocking(move || load_or_create(&store)).await {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::warn!("Device ID initialization failed: {}", e);
                        Uuid::new_v4().to_string()
                    }
                }
            })
            .await
            .clone()
    }
}

fn load_or_create(store: &SecureStore) -> String {
    if let Some(stored) = store.retrieve_from_store(DEVICE_ID_KEY) {
        return stored;
    }

    let id = Uuid::new_v4().to_string();
    store.save_in_store(DEVICE_ID_KEY, &id);
    tracing::info!("Generated new device id");
    id
}
