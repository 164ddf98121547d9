use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Cpu,
    Memory,
    Temperature,
    Frequency,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Cpu,
        MetricKind::Memory,
        MetricKind::Temperature,
        MetricKind::Frequency,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::Temperature => "temperature",
            MetricKind::Frequency => "frequency",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Cpu => "CPU",
            MetricKind::Memory => "Memory",
            MetricKind::Temperature => "Temperature",
            MetricKind::Frequency => "Frequency",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::Cpu | MetricKind::Memory => "%",
            MetricKind::Temperature => "°C",
            MetricKind::Frequency => "GHz",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "cpu" => Some(MetricKind::Cpu),
            "memory" | "ram" => Some(MetricKind::Memory),
            "temperature" | "temp" => Some(MetricKind::Temperature),
            "frequency" | "freq" => Some(MetricKind::Frequency),
            _ => None,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point-in-time reading of a single metric. Produced on every poll
/// tick and discarded after evaluation; only derived alert state persists.
#[derive(Debug, Clone, Copy)]
pub struct MetricSample {
    pub metric: MetricKind,
    pub value: f32,
    pub taken_at: DateTime<Utc>,
}
