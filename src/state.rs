use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::accounts::{AdminCredentials, Directory};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, StoreBackend};
use crate::lifecycle::LeaveLifecycle;
use crate::notify::{FcmSink, LogSink, NotificationSink};
use crate::store::{MemoryStore, MySqlStore, RecordStore};

/// Shared handles for request handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub leaves: Arc<LeaveLifecycle>,
    pub directory: Arc<Directory>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        let leaves = LeaveLifecycle::new(
            store.clone(),
            notifier,
            clock,
            config.transition_policy,
        );
        let directory = Directory::new(
            store.clone(),
            AdminCredentials {
                id: config.admin_id.clone(),
                password: config.admin_password.clone(),
            },
        );

        Self {
            store,
            leaves: Arc::new(leaves),
            directory: Arc::new(directory),
        }
    }

    /// Opens the configured store and notification sink with the system clock.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = open_store(config).await?;
        let notifier: Arc<dyn NotificationSink> = match &config.fcm_server_key {
            Some(key) => Arc::new(FcmSink::new(config.fcm_endpoint.clone(), key.clone())),
            None => {
                info!("FCM_SERVER_KEY not set, notifications are logged only");
                Arc::new(LogSink)
            }
        };

        Ok(Self::new(store, notifier, Arc::new(SystemClock), config))
    }

    pub async fn shutdown(&self) {
        self.store.close().await;
        info!("Store closed");
    }
}

pub async fn open_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::Mysql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when STORE_BACKEND is mysql")?;
            Arc::new(MySqlStore::connect(url).await.context("connecting to MySQL")?)
        }
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };

    info!(backend = store.backend_tag(), "Store ready");
    Ok(store)
}
