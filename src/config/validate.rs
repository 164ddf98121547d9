use teloxide::types::{ChatId, UserId};
use thiserror::Error;

use super::schema::{Config, RuntimeConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "bot_token must not be empty".to_string(),
            ));
        }
        if self.owner_id == 0 {
            return Err(ConfigError::Validation(
                "owner_id must be a positive integer".to_string(),
            ));
        }
        if self.monitor_interval == 0 {
            return Err(ConfigError::Validation(
                "monitor_interval must be greater than 0".to_string(),
            ));
        }
        let delta = self.notifications.significant_change_delta;
        if !delta.is_finite() || delta < 0.0 {
            return Err(ConfigError::Validation(
                "notifications.significant_change_delta must be non-negative".to_string(),
            ));
        }

        // Thresholds and time windows share their validation with the
        // runtime conversion, so a config that loads is a config that runs.
        RuntimeConfig::from_config(self).map(|_| ())
    }

    pub fn owner_chat_id(&self) -> Result<ChatId, ConfigError> {
        if self.owner_id == 0 {
            return Err(ConfigError::Validation(
                "owner_id must be a positive integer".to_string(),
            ));
        }

        let chat_id = i64::try_from(self.owner_id).map_err(|_| {
            ConfigError::Validation("owner_id is too large to fit Telegram chat id".to_string())
        })?;
        Ok(ChatId(chat_id))
    }

    pub fn owner_user_id(&self) -> Result<UserId, ConfigError> {
        if self.owner_id == 0 {
            return Err(ConfigError::Validation(
                "owner_id must be a positive integer".to_string(),
            ));
        }

        Ok(UserId(self.owner_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::monitor::{Language, MetricKind};

    use super::super::schema::{Config, RuntimeConfig};

    fn parse(raw: &str) -> Config {
        toml::from_str(raw).expect("config should deserialize")
    }

    const MINIMAL: &str = r#"
bot_token = "123456:abc"
owner_id = 123456789
"#;

    #[test]
    fn minimal_config_gets_dashboard_defaults() {
        let config = parse(MINIMAL);
        config.validate().expect("defaults should validate");

        assert_eq!(config.monitor_interval, 30);
        assert_eq!(config.notifications.cooldown_secs, 60);
        assert_eq!(config.notifications.language, Language::Ru);
        assert!(config.thresholds.cpu.enabled);
        assert!(!config.thresholds.frequency.enabled);

        let runtime = RuntimeConfig::from_config(&config).expect("runtime conversion");
        let cpu = runtime
            .thresholds
            .get(MetricKind::Cpu)
            .expect("cpu thresholds present");
        assert_eq!(cpu.warning, 80.0);
        assert_eq!(cpu.critical, 95.0);
        assert!(runtime.policy.working_hours.is_some());
        assert!(runtime.policy.quiet_hours.is_none());
    }

    #[test]
    fn warning_above_critical_is_rejected() {
        let config = parse(&format!(
            "{MINIMAL}\n[thresholds.cpu]\nenabled = true\nwarning = 90.0\ncritical = 50.0\n"
        ));
        let error = config.validate().expect_err("should reject");
        assert!(error.to_string().contains("warning"));
    }

    #[test]
    fn malformed_window_time_is_rejected() {
        let config = parse(&format!(
            "{MINIMAL}\n[notifications.quiet_hours]\nenabled = true\nstart = \"25:00\"\nend = \"08:00\"\n"
        ));
        let error = config.validate().expect_err("should reject");
        assert!(error.to_string().contains("quiet_hours"));
    }

    #[test]
    fn empty_bot_token_is_rejected() {
        let config = parse("bot_token = \"  \"\nowner_id = 1\n");
        assert!(config.validate().is_err());
    }

    #[test]
    fn midnight_wrapping_window_is_accepted() {
        let config = parse(&format!(
            "{MINIMAL}\n[notifications.quiet_hours]\nenabled = true\nstart = \"22:00\"\nend = \"08:00\"\n"
        ));
        config.validate().expect("wrapping window is valid");
    }
}
