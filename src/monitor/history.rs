use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use super::model::{MetricKind, Severity};

const HISTORY_CAPACITY: usize = 50;

/// Display-only entry in the alert feed. Never consulted for dispatch
/// decisions.
#[derive(Debug, Clone)]
pub struct AlertRecord {
    pub id: u64,
    pub metric: MetricKind,
    pub value: f32,
    pub threshold: f32,
    pub severity: Severity,
    pub fired_at: DateTime<Utc>,
    pub active: bool,
}

/// Bounded, newest-first feed of fired alerts. Oldest entries are silently
/// dropped past the cap.
#[derive(Debug)]
pub struct AlertHistory {
    records: VecDeque<AlertRecord>,
    next_id: u64,
    capacity: usize,
}

impl Default for AlertHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl AlertHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            next_id: 1,
            capacity,
        }
    }

    pub(crate) fn record(
        &mut self,
        metric: MetricKind,
        severity: Severity,
        value: f32,
        threshold: f32,
        fired_at: DateTime<Utc>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.records.push_front(AlertRecord {
            id,
            metric,
            value,
            threshold,
            severity,
            fired_at,
            active: true,
        });
        if self.records.len() > self.capacity {
            self.records.pop_back();
        }

        id
    }

    /// Marks the metric's feed entries inactive once it recovers.
    pub(crate) fn resolve_metric(&mut self, metric: MetricKind) {
        for record in self
            .records
            .iter_mut()
            .filter(|record| record.metric == metric)
        {
            record.active = false;
        }
    }

    pub fn recent(&self, limit: usize) -> Vec<AlertRecord> {
        self.records.iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
