use chrono::{DateTime, Utc};

use super::model::{MetricSample, Severity};
use super::policy::NotificationPolicy;
use super::state::AlertState;
use super::thresholds::ThresholdConfig;

#[derive(Debug, Clone, Copy)]
pub(super) struct AlertDecision {
    pub(super) severity: Severity,
    pub(super) threshold: f32,
    pub(super) notify: bool,
}

#[derive(Debug, Clone, Copy)]
pub(super) enum Evaluation {
    /// Metric disabled; nothing classified, prior state preserved so a
    /// re-enabled metric resumes with its history intact.
    Skipped,
    /// Value is back in the normal range; both severity keys were cleared.
    Normal,
    Alert(AlertDecision),
}

/// One evaluation step: classify the sample against its thresholds and
/// decide whether a notification is warranted. Pure over (sample,
/// thresholds, policy, state, now); time-window gating and dispatch happen
/// in the service layer so the feed still records suppressed detections.
pub(super) fn evaluate_sample(
    sample: &MetricSample,
    thresholds: ThresholdConfig,
    policy: &NotificationPolicy,
    state: &mut AlertState,
    now: DateTime<Utc>,
) -> Evaluation {
    if !thresholds.enabled {
        return Evaluation::Skipped;
    }

    let Some(severity) = classify(sample.value, thresholds) else {
        state.clear_metric(sample.metric);
        return Evaluation::Normal;
    };

    let threshold = match severity {
        Severity::Critical => thresholds.critical,
        Severity::Warning => thresholds.warning,
    };

    // Critical always bypasses throttling; otherwise a significant jump or
    // an elapsed cooldown re-opens the key. A key that never sent is always
    // eligible.
    let notify = match state.last_sent(sample.metric, severity) {
        None => true,
        Some(previous) => {
            severity == Severity::Critical
                || (sample.value - previous.value).abs() >= policy.significant_change_delta
                || now.signed_duration_since(previous.sent_at).num_seconds()
                    >= policy.cooldown_secs as i64
        }
    };

    Evaluation::Alert(AlertDecision {
        severity,
        threshold,
        notify,
    })
}

fn classify(value: f32, thresholds: ThresholdConfig) -> Option<Severity> {
    if value >= thresholds.critical {
        Some(Severity::Critical)
    } else if value >= thresholds.warning {
        Some(Severity::Warning)
    } else {
        None
    }
}
