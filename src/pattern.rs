//! Bounded memory of recent shot outcomes.

use alloc::collections::VecDeque;

use crate::config::Coord;

/// Records beyond this count trigger eviction.
pub const MEMORY_CAPACITY: usize = 50;
/// Records kept after an eviction.
pub const MEMORY_RETAIN: usize = 30;
/// Shots considered when computing miss density.
pub const DENSITY_WINDOW: usize = 20;
/// Shots considered when computing the recent hit rate.
pub const HIT_RATE_WINDOW: usize = 10;

/// Per-shot decay of a miss's weight in [`PatternMemory::miss_density`].
const DENSITY_DECAY: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotRecord {
    pub coord: Coord,
    pub hit: bool,
    pub sunk: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PatternMemory {
    records: VecDeque<ShotRecord>,
}

impl PatternMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ShotRecord) {
        self.records.push_back(record);
        if self.records.len() > MEMORY_CAPACITY {
            let excess = self.records.len() - MEMORY_RETAIN;
            self.records.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent records first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ShotRecord> {
        self.records.iter().rev().take(n)
    }

    /// Fraction of hits among the last `window` shots, `None` when empty.
    pub fn hit_rate(&self, window: usize) -> Option<f64> {
        let mut shots = 0usize;
        let mut hits = 0usize;
        for record in self.recent(window) {
            shots += 1;
            if record.hit {
                hits += 1;
            }
        }
        (shots > 0).then(|| hits as f64 / shots as f64)
    }

    /// Decaying weight of recent misses within one cell of `coord`.
    /// The newest miss counts 1.0, older ones fade exponentially.
    pub fn miss_density(&self, (row, col): Coord) -> f64 {
        self.recent(DENSITY_WINDOW)
            .enumerate()
            .filter(|(_, record)| {
                !record.hit
                    && record.coord.0.abs_diff(row) <= 1
                    && record.coord.1.abs_diff(col) <= 1
            })
            .map(|(age, _)| libm::exp(-DENSITY_DECAY * age as f64))
            .sum()
    }
}
