use std::collections::HashMap;

use thiserror::Error;

use super::model::MetricKind;

#[derive(Debug, Clone, Copy)]
pub struct ThresholdConfig {
    pub enabled: bool,
    pub warning: f32,
    pub critical: f32,
}

#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error("{metric}: warning level {warning} must not exceed critical level {critical}")]
    WarningAboveCritical {
        metric: MetricKind,
        warning: f32,
        critical: f32,
    },
    #[error("{metric}: threshold levels must be finite and non-negative")]
    OutOfRange { metric: MetricKind },
}

impl ThresholdConfig {
    pub fn validate(&self, metric: MetricKind) -> Result<(), ThresholdError> {
        if !self.warning.is_finite()
            || !self.critical.is_finite()
            || self.warning < 0.0
            || self.critical < 0.0
        {
            return Err(ThresholdError::OutOfRange { metric });
        }
        if self.warning > self.critical {
            return Err(ThresholdError::WarningAboveCritical {
                metric,
                warning: self.warning,
                critical: self.critical,
            });
        }
        Ok(())
    }
}

/// Per-metric threshold store. The evaluator reads it fresh on every tick;
/// a metric without an entry is treated as disabled.
#[derive(Debug, Clone, Default)]
pub struct ThresholdRegistry {
    entries: HashMap<MetricKind, ThresholdConfig>,
}

impl ThresholdRegistry {
    pub fn get(&self, metric: MetricKind) -> Option<ThresholdConfig> {
        self.entries.get(&metric).copied()
    }

    /// Validates before storing; a rejected write leaves the previous
    /// config in effect.
    pub fn set(&mut self, metric: MetricKind, config: ThresholdConfig) -> Result<(), ThresholdError> {
        config.validate(metric)?;
        self.entries.insert(metric, config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MetricKind, ThresholdConfig, ThresholdRegistry};

    #[test]
    fn rejected_write_keeps_previous_config() {
        let mut registry = ThresholdRegistry::default();
        registry
            .set(
                MetricKind::Cpu,
                ThresholdConfig {
                    enabled: true,
                    warning: 80.0,
                    critical: 95.0,
                },
            )
            .expect("valid config should store");

        let error = registry.set(
            MetricKind::Cpu,
            ThresholdConfig {
                enabled: true,
                warning: 90.0,
                critical: 50.0,
            },
        );
        assert!(error.is_err());

        let current = registry.get(MetricKind::Cpu).expect("entry survives");
        assert_eq!(current.warning, 80.0);
        assert_eq!(current.critical, 95.0);
    }

    #[test]
    fn negative_and_non_finite_levels_are_rejected() {
        let mut registry = ThresholdRegistry::default();
        assert!(
            registry
                .set(
                    MetricKind::Memory,
                    ThresholdConfig {
                        enabled: true,
                        warning: -1.0,
                        critical: 95.0,
                    },
                )
                .is_err()
        );
        assert!(
            registry
                .set(
                    MetricKind::Memory,
                    ThresholdConfig {
                        enabled: true,
                        warning: 10.0,
                        critical: f32::NAN,
                    },
                )
                .is_err()
        );
        assert!(registry.get(MetricKind::Memory).is_none());
    }

    #[test]
    fn updated_config_is_observed_on_next_get() {
        let mut registry = ThresholdRegistry::default();
        registry
            .set(
                MetricKind::Temperature,
                ThresholdConfig {
                    enabled: true,
                    warning: 70.0,
                    critical: 85.0,
                },
            )
            .expect("valid");
        registry
            .set(
                MetricKind::Temperature,
                ThresholdConfig {
                    enabled: true,
                    warning: 60.0,
                    critical: 80.0,
                },
            )
            .expect("valid update");

        let current = registry.get(MetricKind::Temperature).expect("present");
        assert_eq!(current.warning, 60.0);
    }
}
