use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use sysinfo::{ComponentExt, CpuExt, System, SystemExt};
use thiserror::Error;

use super::model::{MetricKind, MetricSample};

/// Point-in-time reading from the snapshot source. Temperature and
/// frequency are host-dependent and simply absent where the platform
/// exposes nothing.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub(crate) cpu: f32,
    pub(crate) memory: f32,
    pub(crate) temperature: Option<f32>,
    pub(crate) frequency_ghz: Option<f32>,
}

impl Snapshot {
    pub(crate) fn samples(&self, taken_at: DateTime<Utc>) -> Vec<MetricSample> {
        let mut samples = vec![
            MetricSample {
                metric: MetricKind::Cpu,
                value: self.cpu,
                taken_at,
            },
            MetricSample {
                metric: MetricKind::Memory,
                value: self.memory,
                taken_at,
            },
        ];

        if let Some(temperature) = self.temperature {
            samples.push(MetricSample {
                metric: MetricKind::Temperature,
                value: temperature,
                taken_at,
            });
        }
        if let Some(frequency) = self.frequency_ghz {
            samples.push(MetricSample {
                metric: MetricKind::Frequency,
                value: frequency,
                taken_at,
            });
        }

        samples
    }

    #[cfg(test)]
    pub(crate) fn new(
        cpu: f32,
        memory: f32,
        temperature: Option<f32>,
        frequency_ghz: Option<f32>,
    ) -> Self {
        Self {
            cpu,
            memory,
            temperature,
            frequency_ghz,
        }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct SnapshotError {
    message: String,
}

impl SnapshotError {
    #[cfg(test)]
    pub(crate) fn mock_exhausted() -> Self {
        Self {
            message: "mock snapshots exhausted".to_string(),
        }
    }
}

pub trait SnapshotProvider {
    async fn collect(&mut self) -> Result<Snapshot, SnapshotError>;
}

pub struct RealSnapshotProvider {
    system: System,
}

impl RealSnapshotProvider {
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
        }
    }
}

impl SnapshotProvider for RealSnapshotProvider {
    async fn collect(&mut self) -> Result<Snapshot, SnapshotError> {
        self.system.refresh_cpu();
        self.system.refresh_memory();
        self.system.refresh_components_list();
        self.system.refresh_components();

        let cpu = self.system.global_cpu_info().cpu_usage();

        let total_memory = self.system.total_memory() as f32;
        let used_memory = self.system.used_memory() as f32;
        let memory = if total_memory > 0.0 {
            (used_memory / total_memory) * 100.0
        } else {
            0.0
        };

        let temperature = cpu_temperature(&self.system);

        let frequency_mhz = self.system.global_cpu_info().frequency();
        let frequency_ghz = if frequency_mhz > 0 {
            Some(frequency_mhz as f32 / 1000.0)
        } else {
            None
        };

        Ok(Snapshot {
            cpu,
            memory,
            temperature,
            frequency_ghz,
        })
    }
}

fn cpu_temperature(system: &System) -> Option<f32> {
    let components = system.components();

    let cpu_like = components
        .iter()
        .filter(|component| {
            let label = component.label().to_lowercase();
            label.contains("cpu") || label.contains("core") || label.contains("tctl")
        })
        .map(|component| component.temperature())
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    cpu_like
        .or_else(|| {
            components
                .iter()
                .map(|component| component.temperature())
                .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        })
        .filter(|temperature| *temperature > 0.0)
}

#[cfg(test)]
pub(crate) struct MockSnapshotProvider {
    sequence: Vec<Snapshot>,
}

#[cfg(test)]
impl MockSnapshotProvider {
    pub(crate) fn new(sequence: Vec<Snapshot>) -> Self {
        Self { sequence }
    }
}

#[cfg(test)]
impl SnapshotProvider for MockSnapshotProvider {
    async fn collect(&mut self) -> Result<Snapshot, SnapshotError> {
        if self.sequence.is_empty() {
            return Err(SnapshotError::mock_exhausted());
        }

        Ok(self.sequence.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{MetricKind, Snapshot};

    #[test]
    fn samples_omit_unavailable_metrics() {
        let taken_at = Utc::now();
        let full = Snapshot::new(10.0, 20.0, Some(45.0), Some(3.2));
        assert_eq!(full.samples(taken_at).len(), 4);

        let headless = Snapshot::new(10.0, 20.0, None, None);
        let samples = headless.samples(taken_at);
        assert_eq!(samples.len(), 2);
        assert!(
            samples
                .iter()
                .all(|sample| sample.metric == MetricKind::Cpu
                    || sample.metric == MetricKind::Memory)
        );
    }
}
