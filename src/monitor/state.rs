use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::model::{MetricKind, Severity};

#[derive(Debug, Clone, Copy)]
pub(crate) struct SentRecord {
    pub(crate) sent_at: DateTime<Utc>,
    pub(crate) value: f32,
}

/// Per (metric, severity) record of the last successfully delivered
/// notification. Entries are created lazily on the first send and advance
/// only after the dispatcher confirms delivery, so a failed send leaves the
/// alert eligible to retry on the next tick.
#[derive(Debug, Default)]
pub struct AlertState {
    sent: HashMap<(MetricKind, Severity), SentRecord>,
    consecutive_dispatch_failures: u32,
}

impl AlertState {
    pub(crate) fn last_sent(&self, metric: MetricKind, severity: Severity) -> Option<SentRecord> {
        self.sent.get(&(metric, severity)).copied()
    }

    pub(crate) fn record_sent(
        &mut self,
        metric: MetricKind,
        severity: Severity,
        now: DateTime<Utc>,
        value: f32,
    ) {
        self.sent
            .insert((metric, severity), SentRecord { sent_at: now, value });
    }

    /// Recovery reset: a metric back in the normal range drops BOTH its
    /// warning and critical records, even if only one ever fired. The next
    /// crossing is then unconditionally eligible to notify.
    pub(crate) fn clear_metric(&mut self, metric: MetricKind) {
        self.sent.remove(&(metric, Severity::Warning));
        self.sent.remove(&(metric, Severity::Critical));
    }

    pub(crate) fn dispatch_failed(&mut self) -> u32 {
        self.consecutive_dispatch_failures += 1;
        self.consecutive_dispatch_failures
    }

    pub(crate) fn dispatch_succeeded(&mut self) {
        self.consecutive_dispatch_failures = 0;
    }

    pub(crate) fn consecutive_dispatch_failures(&self) -> u32 {
        self.consecutive_dispatch_failures
    }

    pub(crate) fn armed_keys(&self) -> Vec<(MetricKind, Severity)> {
        let mut keys: Vec<_> = self.sent.keys().copied().collect();
        keys.sort_by_key(|(metric, severity)| (metric.as_str(), severity.as_str()));
        keys
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{AlertState, MetricKind, Severity};

    #[test]
    fn recovery_clears_both_severity_keys_even_if_one_armed() {
        let mut state = AlertState::default();
        let now = Utc::now();
        state.record_sent(MetricKind::Cpu, Severity::Warning, now, 85.0);

        state.clear_metric(MetricKind::Cpu);

        assert!(state.last_sent(MetricKind::Cpu, Severity::Warning).is_none());
        assert!(state.last_sent(MetricKind::Cpu, Severity::Critical).is_none());
    }

    #[test]
    fn clearing_one_metric_leaves_others_armed() {
        let mut state = AlertState::default();
        let now = Utc::now();
        state.record_sent(MetricKind::Cpu, Severity::Warning, now, 85.0);
        state.record_sent(MetricKind::Memory, Severity::Critical, now, 97.0);

        state.clear_metric(MetricKind::Cpu);

        assert!(state.last_sent(MetricKind::Cpu, Severity::Warning).is_none());
        assert!(
            state
                .last_sent(MetricKind::Memory, Severity::Critical)
                .is_some()
        );
    }

    #[test]
    fn failure_counter_resets_on_success() {
        let mut state = AlertState::default();
        assert_eq!(state.dispatch_failed(), 1);
        assert_eq!(state.dispatch_failed(), 2);
        state.dispatch_succeeded();
        assert_eq!(state.consecutive_dispatch_failures(), 0);
    }
}
