use chrono::NaiveTime;
use serde::Deserialize;

use crate::monitor::{
    Language, MessageFormat, MetricKind, NotificationPolicy, ThresholdConfig, ThresholdRegistry,
    TimeWindow,
};

use super::defaults::*;
use super::validate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bot_token: String,
    pub owner_id: u64,
    #[serde(default = "default_monitor_interval")]
    pub monitor_interval: u64,
    #[serde(default)]
    pub notifications: Notifications,
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// The slice of configuration the monitor loop re-reads on every tick.
/// Replaced wholesale on hot reload; mutated in place by /set.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub monitor_interval: u64,
    pub thresholds: ThresholdRegistry,
    pub policy: NotificationPolicy,
}

impl RuntimeConfig {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut thresholds = ThresholdRegistry::default();
        for (metric, section) in [
            (MetricKind::Cpu, &config.thresholds.cpu),
            (MetricKind::Memory, &config.thresholds.memory),
            (MetricKind::Temperature, &config.thresholds.temperature),
            (MetricKind::Frequency, &config.thresholds.frequency),
        ] {
            let threshold_config = ThresholdConfig {
                enabled: section.enabled,
                warning: section.warning,
                critical: section.critical,
            };
            thresholds
                .set(metric, threshold_config)
                .map_err(|error| ConfigError::Validation(error.to_string()))?;
        }

        let notifications = &config.notifications;
        let policy = NotificationPolicy {
            enabled: notifications.enabled,
            cooldown_secs: notifications.cooldown_secs,
            significant_change_delta: notifications.significant_change_delta,
            working_hours: parse_window(
                "notifications.working_hours",
                &notifications.working_hours,
            )?,
            quiet_hours: parse_window("notifications.quiet_hours", &notifications.quiet_hours)?,
            language: notifications.language,
            message_format: notifications.message_format,
        };

        Ok(Self {
            monitor_interval: config.monitor_interval,
            thresholds,
            policy,
        })
    }
}

fn parse_window(field: &str, section: &WindowSection) -> Result<Option<TimeWindow>, ConfigError> {
    if !section.enabled {
        return Ok(None);
    }

    let start = parse_clock_time(field, "start", &section.start)?;
    let end = parse_clock_time(field, "end", &section.end)?;
    Ok(Some(TimeWindow { start, end }))
}

fn parse_clock_time(field: &str, bound: &str, raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| {
        ConfigError::Validation(format!(
            "{}.{} must be a clock time in HH:MM format, got {:?}",
            field, bound, raw
        ))
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notifications {
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    #[serde(default = "default_significant_change_delta")]
    pub significant_change_delta: f32,
    #[serde(default = "default_language")]
    pub language: Language,
    #[serde(default = "default_message_format")]
    pub message_format: MessageFormat,
    #[serde(default = "default_working_hours")]
    pub working_hours: WindowSection,
    #[serde(default = "default_quiet_hours")]
    pub quiet_hours: WindowSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowSection {
    #[serde(default)]
    pub enabled: bool,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_cpu_thresholds")]
    pub cpu: ThresholdSection,
    #[serde(default = "default_memory_thresholds")]
    pub memory: ThresholdSection,
    #[serde(default = "default_temperature_thresholds")]
    pub temperature: ThresholdSection,
    #[serde(default = "default_frequency_thresholds")]
    pub frequency: ThresholdSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdSection {
    pub enabled: bool,
    pub warning: f32,
    pub critical: f32,
}
