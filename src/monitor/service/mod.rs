mod core;
mod snapshot;

pub use self::core::check_metrics;
pub use snapshot::{AlertSnapshot, alert_snapshot, recent_alerts};
