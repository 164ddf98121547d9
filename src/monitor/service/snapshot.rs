use std::sync::Arc;

use tokio::sync::Mutex;

use super::super::history::{AlertHistory, AlertRecord};
use super::super::model::{MetricKind, Severity};
use super::super::state::AlertState;

#[derive(Debug, Clone)]
pub struct AlertSnapshot {
    pub armed: Vec<(MetricKind, Severity)>,
    pub consecutive_dispatch_failures: u32,
}

pub async fn alert_snapshot(state: &Arc<Mutex<AlertState>>) -> AlertSnapshot {
    let state = state.lock().await;
    AlertSnapshot {
        armed: state.armed_keys(),
        consecutive_dispatch_failures: state.consecutive_dispatch_failures(),
    }
}

pub async fn recent_alerts(history: &Arc<Mutex<AlertHistory>>, limit: usize) -> Vec<AlertRecord> {
    let history = history.lock().await;
    history.recent(limit)
}
