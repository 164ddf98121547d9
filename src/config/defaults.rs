use crate::monitor::{Language, MessageFormat};

use super::schema::{Notifications, ThresholdSection, Thresholds, WindowSection};

pub(super) fn default_monitor_interval() -> u64 {
    30
}

pub(super) fn default_notifications_enabled() -> bool {
    true
}

pub(super) fn default_cooldown_secs() -> u64 {
    60
}

pub(super) fn default_significant_change_delta() -> f32 {
    10.0
}

pub(super) fn default_language() -> Language {
    Language::Ru
}

pub(super) fn default_message_format() -> MessageFormat {
    MessageFormat::Detailed
}

pub(super) fn default_working_hours() -> WindowSection {
    WindowSection {
        enabled: true,
        start: "09:00".to_string(),
        end: "18:00".to_string(),
    }
}

pub(super) fn default_quiet_hours() -> WindowSection {
    WindowSection {
        enabled: false,
        start: "22:00".to_string(),
        end: "08:00".to_string(),
    }
}

pub(super) fn default_cpu_thresholds() -> ThresholdSection {
    ThresholdSection {
        enabled: true,
        warning: 80.0,
        critical: 95.0,
    }
}

pub(super) fn default_memory_thresholds() -> ThresholdSection {
    ThresholdSection {
        enabled: true,
        warning: 85.0,
        critical: 95.0,
    }
}

pub(super) fn default_temperature_thresholds() -> ThresholdSection {
    ThresholdSection {
        enabled: true,
        warning: 70.0,
        critical: 85.0,
    }
}

pub(super) fn default_frequency_thresholds() -> ThresholdSection {
    ThresholdSection {
        enabled: false,
        warning: 4.5,
        critical: 5.0,
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            enabled: default_notifications_enabled(),
            cooldown_secs: default_cooldown_secs(),
            significant_change_delta: default_significant_change_delta(),
            language: default_language(),
            message_format: default_message_format(),
            working_hours: default_working_hours(),
            quiet_hours: default_quiet_hours(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu: default_cpu_thresholds(),
            memory: default_memory_thresholds(),
            temperature: default_temperature_thresholds(),
            frequency: default_frequency_thresholds(),
        }
    }
}
