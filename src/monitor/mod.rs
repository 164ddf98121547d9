mod evaluator;
mod history;
mod model;
mod policy;
mod provider;
mod service;
mod state;
mod thresholds;

pub use history::{AlertHistory, AlertRecord};
pub use model::{MetricKind, MetricSample, Severity};
pub use policy::{Language, MessageFormat, NotificationPolicy, TimeWindow};
pub use provider::RealSnapshotProvider;
pub use service::{AlertSnapshot, alert_snapshot, check_metrics, recent_alerts};
pub use state::AlertState;
pub use thresholds::{ThresholdConfig, ThresholdError, ThresholdRegistry};
