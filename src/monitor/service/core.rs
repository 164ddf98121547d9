use std::sync::Arc;

use chrono::{DateTime, Local, NaiveTime, Utc};
use tokio::sync::Mutex;

use crate::config::RuntimeConfig;
use crate::notifier::{Dispatcher, alert_message};

use super::super::{
    evaluator::{Evaluation, evaluate_sample},
    history::AlertHistory,
    provider::SnapshotProvider,
    state::AlertState,
};

/// Escalate to an operator-visible error once this many sends in a row
/// have failed.
const DISPATCH_FAILURE_ESCALATION: u32 = 3;

pub async fn check_metrics<P: SnapshotProvider, D: Dispatcher>(
    dispatcher: &D,
    runtime_config: &RuntimeConfig,
    state: &Arc<Mutex<AlertState>>,
    history: &Arc<Mutex<AlertHistory>>,
    provider: &mut P,
) {
    check_metrics_at(
        dispatcher,
        runtime_config,
        state,
        history,
        provider,
        Utc::now(),
        Local::now().time(),
    )
    .await
}

pub(crate) async fn check_metrics_at<P: SnapshotProvider, D: Dispatcher>(
    dispatcher: &D,
    runtime_config: &RuntimeConfig,
    state: &Arc<Mutex<AlertState>>,
    history: &Arc<Mutex<AlertHistory>>,
    provider: &mut P,
    now: DateTime<Utc>,
    local_time: NaiveTime,
) {
    let snapshot = match provider.collect().await {
        Ok(snapshot) => snapshot,
        Err(error) => {
            // No sample this tick; alert state is untouched and the next
            // scheduled tick retries.
            log::warn!("snapshot_unavailable error={}", error);
            return;
        }
    };

    tracing::info!(
        target: "monitor",
        module = "monitor",
        cpu = snapshot.cpu,
        memory = snapshot.memory,
        temperature = snapshot.temperature,
        frequency_ghz = snapshot.frequency_ghz,
        "monitor_snapshot"
    );

    let policy = &runtime_config.policy;
    let send_allowed = policy.allows_send_at(local_time);

    for sample in snapshot.samples(now) {
        let Some(thresholds) = runtime_config.thresholds.get(sample.metric) else {
            // Fail safe: a metric without readable threshold config is
            // treated as disabled rather than evaluated against defaults.
            log::debug!(
                "threshold_config_unavailable metric={} treated=disabled",
                sample.metric
            );
            continue;
        };

        let evaluation = {
            let mut state = state.lock().await;
            evaluate_sample(&sample, thresholds, policy, &mut state, now)
        };

        match evaluation {
            Evaluation::Skipped => {}
            Evaluation::Normal => {
                let mut history = history.lock().await;
                history.resolve_metric(sample.metric);
            }
            Evaluation::Alert(decision) => {
                {
                    let mut history = history.lock().await;
                    history.record(
                        sample.metric,
                        decision.severity,
                        sample.value,
                        decision.threshold,
                        sample.taken_at,
                    );
                }

                if !decision.notify {
                    continue;
                }
                if !send_allowed {
                    log::debug!(
                        "notification_suppressed metric={} severity={} reason=policy_window",
                        sample.metric,
                        decision.severity
                    );
                    continue;
                }

                let message = alert_message(
                    policy.language,
                    policy.message_format,
                    sample.metric,
                    decision.severity,
                    sample.value,
                    decision.threshold,
                    sample.taken_at,
                );

                match dispatcher.send(&message).await {
                    Ok(()) => {
                        let mut state = state.lock().await;
                        state.record_sent(sample.metric, decision.severity, now, sample.value);
                        state.dispatch_succeeded();
                    }
                    Err(error) => {
                        // State deliberately not advanced: the alert stays
                        // eligible and the next tick retries.
                        let failures = {
                            let mut state = state.lock().await;
                            state.dispatch_failed()
                        };
                        log::warn!(
                            "dispatch_failed metric={} severity={} consecutive={} error={}",
                            sample.metric,
                            decision.severity,
                            failures,
                            error
                        );
                        if failures == DISPATCH_FAILURE_ESCALATION {
                            log::error!(
                                "CRITICAL: dispatch_failures_escalated consecutive={} notifications_are_not_being_delivered",
                                failures
                            );
                        }
                    }
                }
            }
        }
    }
}
