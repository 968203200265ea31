//! Helpers for collecting statistics.

use std::collections::*;
use bitvec::prelude::*;
use itertools::*;

use crate::branch::*;

/// Container for recording simple statistics while replaying a trace.
#[derive(Default)]
pub struct BranchStats {
    /// Per-branch statistics (indexed by program counter value).
    pub data: BTreeMap<u64, BranchData>,

    /// Number of correct predictions
    pub global_hits: usize,

    /// Number of times any conditional branch was executed
    pub global_brns: usize,

    /// Number of instructions observed (branches included)
    pub global_insts: usize,
}
impl BranchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the global hit rate.
    pub fn hit_rate(&self) -> f64 {
        if self.global_brns == 0 { return 0.0; }
        self.global_hits as f64 / self.global_brns as f64
    }

    /// Return the global hit count.
    pub fn global_hits(&self) -> usize { self.global_hits }

    /// Return the global miss count.
    pub fn global_miss(&self) -> usize { self.global_brns - self.global_hits }

    /// Return the total branch count.
    pub fn global_brns(&self) -> usize { self.global_brns }

    /// Return the total instruction count.
    pub fn global_insts(&self) -> usize { self.global_insts }

    /// Mispredictions per thousand instructions.
    pub fn mpki(&self) -> f64 {
        if self.global_insts == 0 { return 0.0; }
        self.global_miss() as f64 * 1000.0 / self.global_insts as f64
    }

    /// Update global statistics.
    pub fn update_global(&mut self, record: &BranchRecord, prediction: Outcome) {
        self.global_brns += 1;
        if prediction == record.outcome { self.global_hits += 1; }
    }

    /// Update per-branch statistics.
    pub fn update_per_branch(&mut self,
        record: &BranchRecord, prediction: Outcome)
    {
        let hit = prediction == record.outcome;
        let data = self.get_mut(record.pc);
        data.occ += 1;
        data.pat.push(record.outcome.into());
        if hit { data.hits += 1; }
    }

    /// Returns a reference to data collected for a particular branch.
    pub fn get(&self, pc: u64) -> Option<&BranchData> {
        self.data.get(&pc)
    }

    /// Returns a mutable reference to data collected for a particular branch.
    /// Creates a new entry if one doesn't already exist.
    pub fn get_mut(&mut self, pc: u64) -> &mut BranchData {
        self.data.entry(pc).or_default()
    }

    /// Returns the number of unique observed branch instructions.
    pub fn num_unique_branches(&self) -> usize {
        self.data.len()
    }

    /// Returns the `n` most frequently executed branches.
    pub fn get_common_branches(&self, n: usize) -> Vec<(u64, &BranchData)> {
        self.data.iter()
            .sorted_by_key(|(_, s)| s.occ)
            .rev()
            .take(n)
            .map(|(pc, s)| (*pc, s))
            .collect()
    }

    /// Returns up to `n` frequently executed branches which are predicted
    /// correctly no more than `max_rate` of the time, most frequent first.
    pub fn get_low_rate_branches(&self, n: usize, min_occ: usize, max_rate: f64)
        -> Vec<(u64, &BranchData)>
    {
        self.data.iter()
            .filter(|(_, s)| s.occ >= min_occ && s.hit_rate() <= max_rate)
            .sorted_by_key(|(_, s)| s.occ)
            .rev()
            .take(n)
            .map(|(pc, s)| (*pc, s))
            .collect()
    }
}

/// Container for per-branch statistics.
#[derive(Default)]
pub struct BranchData {
    /// Number of times this branch was encountered.
    pub occ: usize,

    /// Number of correct predictions for this branch.
    pub hits: usize,

    /// Record of all observed outcomes for this branch.
    pub pat: BitVec,
}
impl BranchData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the hit rate for this branch.
    pub fn hit_rate(&self) -> f64 {
        self.hits as f64 / self.occ as f64
    }

    pub fn is_always_taken(&self) -> bool {
        self.pat.count_ones() == self.pat.len()
    }

    pub fn is_never_taken(&self) -> bool {
        self.pat.count_zeros() == self.pat.len()
    }

    pub fn times_taken(&self) -> usize {
        self.pat.count_ones()
    }

    /// Render the most recent `n` outcomes, oldest first.
    pub fn recent_pattern(&self, n: usize) -> String {
        let start = self.pat.len().saturating_sub(n);
        self.pat[start..].iter().by_vals()
            .map(|b| if b { 'T' } else { 'N' })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use Outcome::*;

    fn rec(pc: u64, outcome: Outcome) -> BranchRecord {
        BranchRecord::new(pc, OpKind::JmpCond, outcome, 0)
    }

    #[test]
    fn global_and_per_branch() {
        let mut s = BranchStats::new();
        assert_eq!(s.hit_rate(), 0.0);
        for (pc, o, pred) in [(0x10, T, T), (0x10, N, T), (0x20, N, N)] {
            let r = rec(pc, o);
            s.update_global(&r, pred);
            s.update_per_branch(&r, pred);
        }
        s.global_insts = 1000;

        assert_eq!(s.global_hits(), 2);
        assert_eq!(s.global_miss(), 1);
        assert_eq!(s.mpki(), 1.0);
        assert_eq!(s.num_unique_branches(), 2);

        let d = s.get(0x10).unwrap();
        assert_eq!(d.hit_rate(), 0.5);
        assert_eq!(d.times_taken(), 1);
        assert_eq!(d.recent_pattern(8), "TN");
        assert!(s.get(0x20).unwrap().is_never_taken());
    }

    #[test]
    fn ranking() {
        let mut s = BranchStats::new();
        for _ in 0..3 { s.update_per_branch(&rec(0x10, T), N); }
        for _ in 0..5 { s.update_per_branch(&rec(0x20, T), T); }
        s.update_per_branch(&rec(0x30, T), N);

        let common: Vec<u64> = s.get_common_branches(2).iter()
            .map(|(pc, _)| *pc).collect();
        assert_eq!(common, vec![0x20, 0x10]);

        let low: Vec<u64> = s.get_low_rate_branches(4, 2, 0.5).iter()
            .map(|(pc, _)| *pc).collect();
        assert_eq!(low, vec![0x10]);
    }
}
