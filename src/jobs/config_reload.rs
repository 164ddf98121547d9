use std::path::Path;

use notify::{Config as NotifyConfig, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::app_context::AppContext;
use crate::config::{RuntimeConfig, load_config};

async fn apply_runtime_reload_from_path(
    app_context: &AppContext,
    config_path: &str,
) -> Result<RuntimeConfig, String> {
    let new_config = load_config(config_path).map_err(|error| error.to_string())?;
    let runtime_config =
        RuntimeConfig::from_config(&new_config).map_err(|error| error.to_string())?;
    app_context
        .update_runtime_config(runtime_config.clone())
        .await;
    Ok(runtime_config)
}

pub(super) fn start_config_hot_reload_job(app_context: AppContext) {
    tokio::spawn(async move {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let config_path = app_context.config_path.clone();
        let mut watcher = match RecommendedWatcher::new(
            move |result| {
                let _ = tx.send(result);
            },
            NotifyConfig::default(),
        ) {
            Ok(watcher) => watcher,
            Err(error) => {
                log::warn!("config hot-reload disabled: watcher init failed: {}", error);
                return;
            }
        };

        if let Err(error) =
            watcher.watch(Path::new(config_path.as_str()), RecursiveMode::NonRecursive)
        {
            log::warn!(
                "config hot-reload disabled: failed to watch {}: {}",
                config_path,
                error
            );
            return;
        }

        while let Some(event_result) = rx.recv().await {
            let event = match event_result {
                Ok(event) => event,
                Err(error) => {
                    log::warn!("config hot-reload event error: {}", error);
                    continue;
                }
            };

            let should_reload = matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any
            );
            if !should_reload {
                continue;
            }

            match apply_runtime_reload_from_path(&app_context, config_path.as_str()).await {
                Ok(runtime_config) => {
                    let policy = &runtime_config.policy;
                    log::info!(
                        "config_hot_reload_applied target=runtime monitor_interval={} notifications_enabled={} cooldown_secs={} significant_change_delta={}",
                        runtime_config.monitor_interval,
                        policy.enabled,
                        policy.cooldown_secs,
                        policy.significant_change_delta,
                    );
                }
                Err(error) => {
                    log::warn!("config hot-reload ignored invalid config: {}", error);
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::{
        app_context::AppContext,
        config::load_config,
        monitor::MetricKind,
    };

    use super::apply_runtime_reload_from_path;

    fn config_toml(monitor_interval: u64, cooldown_secs: u64, cpu_warning: f32) -> String {
        format!(
            r#"bot_token = "123456:abc"
owner_id = 123456789
monitor_interval = {monitor_interval}

[notifications]
enabled = true
cooldown_secs = {cooldown_secs}
significant_change_delta = 10.0

[thresholds.cpu]
enabled = true
warning = {cpu_warning}
critical = 95.0
"#
        )
    }

    #[tokio::test]
    async fn hot_reload_applies_valid_runtime_changes_without_restart() {
        let temp = tempdir().expect("tempdir should be created");
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, config_toml(30, 60, 80.0))
            .expect("initial config should be written");

        let initial = load_config(&config_path).expect("initial config should load");
        let app = AppContext::new(initial, config_path.to_string_lossy().to_string())
            .expect("app context should build");

        fs::write(&config_path, config_toml(12, 120, 72.5))
            .expect("updated config should be written");

        let applied = apply_runtime_reload_from_path(&app, &config_path.to_string_lossy())
            .await
            .expect("valid hot-reload should apply");

        let current = app.runtime_config.read().await.clone();
        assert_eq!(applied.monitor_interval, 12);
        assert_eq!(applied.policy.cooldown_secs, 120);
        assert_eq!(current.monitor_interval, 12);
        let cpu = current
            .thresholds
            .get(MetricKind::Cpu)
            .expect("cpu thresholds present");
        assert!((cpu.warning - 72.5).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn hot_reload_rejects_invalid_config_and_preserves_last_runtime() {
        let temp = tempdir().expect("tempdir should be created");
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, config_toml(30, 60, 80.0))
            .expect("initial config should be written");

        let initial = load_config(&config_path).expect("initial config should load");
        let app = AppContext::new(initial, config_path.to_string_lossy().to_string())
            .expect("app context should build");

        // warning above critical must be rejected at the boundary.
        fs::write(&config_path, config_toml(12, 120, 99.0))
            .expect("invalid config should be written");

        let error = apply_runtime_reload_from_path(&app, &config_path.to_string_lossy())
            .await
            .expect_err("invalid config should be rejected");
        assert!(error.contains("warning"));

        let current = app.runtime_config.read().await.clone();
        assert_eq!(current.monitor_interval, 30);
        assert_eq!(current.policy.cooldown_secs, 60);
        let cpu = current
            .thresholds
            .get(MetricKind::Cpu)
            .expect("cpu thresholds present");
        assert!((cpu.warning - 80.0).abs() < f32::EPSILON);
    }
}
