use crate::config::AppConfig;
use crate::console::{ConsolePermissionApi, Prompter, TerminalPrompter};
use crate::flow::{self, OnboardingFlow, Route};
use anyhow::{Context, Result};
use safecircle_auth::{AuthApi, AuthSession, AuthState, DeviceIdProvider, HttpAuthClient};
use safecircle_permissions::{PermissionService, PermissionState, PermissionStore};
use safecircle_storage::{FileKeyValueStore, SecureStore};
use std::sync::Arc;

const SESSION_KEY: &str = "authSession";

/// Every service the binary needs, built once from the config.
pub struct AppContext {
    pub config: AppConfig,
    pub secure_store: Arc<SecureStore>,
    pub session: Arc<AuthSession>,
    pub devices: Arc<DeviceIdProvider>,
    pub permissions: Arc<PermissionState>,
}

impl AppContext {
    pub async fn build(config: AppConfig) -> Result<Self> {
        Self::build_with_prompter(config, Arc::new(TerminalPrompter::stdio())).await
    }

    pub async fn build_with_prompter(config: AppConfig, prompter: Arc<dyn Prompter>) -> Result<Self> {
        config.validate()?;
        let data_dir = &config.data_dir;
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let secure_store = Arc::new(
            SecureStore::open_with_key_file(data_dir.join("secure"), data_dir.join("master.key"))
                .context("Failed to open secure store")?,
        );

        let cache = Arc::new(FileKeyValueStore::new(data_dir.join("permissions.json")));
        let decisions = Arc::new(FileKeyValueStore::new(data_dir.join("os_permissions.json")));
        let api = Arc::new(ConsolePermissionApi::new(decisions, prompter));
        let service = PermissionService::new(PermissionStore::new(cache), api);
        let permissions = Arc::new(PermissionState::initialize(service).await);

        let session = Arc::new(match restore_session(&secure_store) {
            Some(state) => AuthSession::restore(state),
            None => AuthSession::new(),
        });

        Ok(Self {
            devices: Arc::new(DeviceIdProvider::new(Arc::clone(&secure_store))),
            config,
            secure_store,
            session,
            permissions,
        })
    }

    pub fn auth_api(&self) -> Result<Arc<dyn AuthApi>> {
        Ok(Arc::new(HttpAuthClient::new(self.config.api_url()?)))
    }

    pub fn flow(&self, api: Arc<dyn AuthApi>) -> OnboardingFlow {
        OnboardingFlow::new(
            api,
            Arc::clone(&self.session),
            Arc::clone(&self.devices),
            self.permissions.clone(),
            self.config.country_code.clone(),
        )
    }

    pub async fn initial_route(&self) -> Route {
        flow::initial_route(&self.session, self.permissions.as_ref()).await
    }

    /// Writes the current login to the secure store so later runs restore it.
    pub async fn persist_session(&self) -> Result<()> {
        let state = self.session.snapshot().await;
        if !state.is_logged_in {
            self.secure_store.delete_secret(SESSION_KEY)?;
            return Ok(());
        }
        let json = serde_json::to_string(&state)?;
        self.secure_store.store_secret(SESSION_KEY, &json)?;
        Ok(())
    }
}

fn restore_session(store: &SecureStore) -> Option<AuthState> {
    let json = store.retrieve_from_store(SESSION_KEY)?;
    match serde_json::from_str(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!("Discarding unreadable stored session: {}", e);
            None
        }
    }
}
