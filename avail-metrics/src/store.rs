//! Tick-indexed sample store and its reduction to an average curve

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Identifies one independent replication of the study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReplicationId(pub u32);

impl fmt::Display for ReplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Replication({})", self.0)
    }
}

/// One recorded availability verdict: 1 if the system was up at the tick,
/// 0 if it was down. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub replication: ReplicationId,
    pub value: u8,
}

/// Accumulates per-tick samples across replications.
///
/// The store grows monotonically while replications run and is reduced
/// read-only afterwards. Averaging across replications is only meaningful
/// because every replication reports the same tick set `0..horizon`; the
/// driver guarantees that by running all replications with one horizon and a
/// one-unit monitor period.
#[derive(Debug, Default)]
pub struct MetricsStore {
    samples: BTreeMap<u64, Vec<Sample>>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample under `tick`.
    pub fn add(&mut self, tick: u64, replication: ReplicationId, value: u8) {
        self.samples
            .entry(tick)
            .or_default()
            .push(Sample { replication, value });
    }

    /// Sum of all values recorded at `tick`.
    pub fn sum(&self, tick: u64) -> u64 {
        self.samples
            .get(&tick)
            .map(|samples| samples.iter().map(|s| u64::from(s.value)).sum())
            .unwrap_or(0)
    }

    /// Arithmetic mean of all values recorded at `tick`, or `None` if the
    /// tick has no samples.
    pub fn average(&self, tick: u64) -> Option<f64> {
        self.samples
            .get(&tick)
            .filter(|samples| !samples.is_empty())
            .map(|samples| self.sum(tick) as f64 / samples.len() as f64)
    }

    /// The empirical availability curve: `(tick, average)` for every recorded
    /// tick, in ascending tick order.
    pub fn averages(&self) -> Vec<(u64, f64)> {
        self.samples
            .iter()
            .map(|(&tick, samples)| {
                let sum: u64 = samples.iter().map(|s| u64::from(s.value)).sum();
                (tick, sum as f64 / samples.len() as f64)
            })
            .collect()
    }

    /// All recorded ticks, ascending.
    pub fn ticks(&self) -> impl Iterator<Item = u64> + '_ {
        self.samples.keys().copied()
    }

    /// Number of distinct ticks with at least one sample.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Emits the full store at `debug` level, one line per tick.
    pub fn log_contents(&self) {
        for (&tick, samples) in &self.samples {
            debug!(tick, ?samples, "metrics store contents");
        }
    }
}
