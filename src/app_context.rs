use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, Notify, RwLock};

use crate::config::{Config, ConfigError, RuntimeConfig};
use crate::monitor::{AlertHistory, AlertState};

#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub config_path: Arc<String>,
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    pub runtime_update_notify: Arc<Notify>,
    pub alert_state: Arc<Mutex<AlertState>>,
    pub alert_history: Arc<Mutex<AlertHistory>>,
    pub last_monitor_tick: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppContext {
    pub fn new(config: Config, config_path: impl Into<String>) -> Result<Self, ConfigError> {
        let runtime_config = RuntimeConfig::from_config(&config)?;

        Ok(Self {
            config,
            config_path: Arc::new(config_path.into()),
            runtime_config: Arc::new(RwLock::new(runtime_config)),
            runtime_update_notify: Arc::new(Notify::new()),
            alert_state: Arc::new(Mutex::new(AlertState::default())),
            alert_history: Arc::new(Mutex::new(AlertHistory::default())),
            last_monitor_tick: Arc::new(Mutex::new(None)),
        })
    }

    pub async fn update_runtime_config(&self, runtime_config: RuntimeConfig) {
        *self.runtime_config.write().await = runtime_config;
        self.runtime_update_notify.notify_waiters();
    }
}
