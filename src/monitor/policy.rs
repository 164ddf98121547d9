use chrono::{NaiveTime, Timelike};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    Detailed,
    Compact,
}

/// Inclusive clock-time range. When `end < start` the window wraps past
/// midnight, e.g. 22:00–08:00 covers 23:30 and 03:00 but not 12:00.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn contains(&self, time: NaiveTime) -> bool {
        let now = minute_of_day(time);
        let start = minute_of_day(self.start);
        let end = minute_of_day(self.end);

        if start > end {
            now >= start || now <= end
        } else {
            now >= start && now <= end
        }
    }
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Global gating rules for outbound notifications. Severity classification
/// and the history feed are never gated by this policy, only delivery is.
#[derive(Debug, Clone)]
pub struct NotificationPolicy {
    pub enabled: bool,
    pub cooldown_secs: u64,
    pub significant_change_delta: f32,
    pub working_hours: Option<TimeWindow>,
    pub quiet_hours: Option<TimeWindow>,
    pub language: Language,
    pub message_format: MessageFormat,
}

impl NotificationPolicy {
    pub fn allows_send_at(&self, time: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }

        let within_working_hours = self
            .working_hours
            .map_or(true, |window| window.contains(time));
        let within_quiet_hours = self
            .quiet_hours
            .is_some_and(|window| window.contains(time));

        within_working_hours && !within_quiet_hours
    }
}
