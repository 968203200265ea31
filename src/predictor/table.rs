//! Tables of saturating counters.

use crate::branch::Outcome;
use crate::predictor::counter::*;

/// Interface to a table of predictors.
pub trait PredictorTable {
    /// The type of entry in the table.
    type Entry;

    /// Returns the number of entries in the table.
    fn size(&self) -> usize;

    /// Given some key, return the corresponding index into the table.
    fn get_index(&self, key: u64) -> usize {
        (key as usize) & self.index_mask()
    }

    /// Returns a reference to an entry in the table.
    fn get_entry(&self, idx: usize) -> &Self::Entry;

    /// Returns a mutable reference to an entry in the table.
    fn get_entry_mut(&mut self, idx: usize) -> &mut Self::Entry;

    /// Returns a bitmask corresponding to the number of entries in the table.
    fn index_mask(&self) -> usize {
        debug_assert!(self.size().is_power_of_two());
        self.size() - 1
    }
}

/// A power-of-two sized table of saturating counters, all initialized to
/// zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterTable {
    /// Saturating counter configuration
    cfg: SaturatingCounterConfig,

    /// Table of counters
    data: Vec<u32>,
}
impl CounterTable {
    pub fn new(size: usize, cfg: SaturatingCounterConfig) -> Self {
        assert!(size.is_power_of_two());
        Self { cfg, data: vec![0; size] }
    }

    pub fn counter_config(&self) -> &SaturatingCounterConfig { &self.cfg }

    /// Returns all counter values.
    pub fn as_slice(&self) -> &[u32] { &self.data }

    /// Returns the direction predicted by the counter at `idx`.
    pub fn predict(&self, idx: usize) -> Outcome {
        self.cfg.predict(*self.get_entry(idx))
    }

    /// Move the counter at `idx` toward an outcome.
    pub fn train(&mut self, idx: usize, outcome: Outcome) {
        let cfg = self.cfg;
        let entry = self.get_entry_mut(idx);
        *entry = cfg.train(*entry, outcome);
    }

    /// Clear every counter back to zero.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }
}

impl PredictorTable for CounterTable {
    type Entry = u32;

    fn size(&self) -> usize { self.data.len() }

    fn get_entry(&self, idx: usize) -> &u32 {
        let index = idx & self.index_mask();
        &self.data[index]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut u32 {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}
