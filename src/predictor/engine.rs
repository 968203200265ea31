//! A configurable predictor built from a single shared table of counters.
//!
//! Depending on the [Strategy], the table is indexed with:
//!
//! - [Strategy::Simple]: low bits of the program counter
//! - [Strategy::GShare]: the program counter XOR'ed with global history
//! - [Strategy::Local]: the history of the branch itself
//! - [Strategy::Tournament]: both the GShare and Local schemes, with a
//!   separate meta-table choosing which one to trust for each branch
//!
//! In tournament mode the GShare and Local sub-predictors deliberately
//! index the *same* physical table.

use log::debug;

use crate::branch::*;
use crate::config::*;
use crate::history::*;
use crate::predictor::*;

/// Indices and counter values read for a tournament lookup.
#[derive(Clone, Copy, Debug)]
struct TournamentLookup {
    gshare_idx: usize,
    gshare_val: u32,
    local_idx: usize,
    local_val: u32,
    meta_idx: usize,
    choice: u32,
}

pub struct Predictor {
    cfg: PredictorConfig,

    /// Prediction table shared by every strategy
    table: CounterTable,

    /// Chooser between GShare (low) and Local (high), tournament only
    meta: CounterTable,

    ghr: GlobalHistoryRegister,
    lht: LocalHistoryTable,
}

impl Predictor {
    pub fn new(cfg: PredictorConfig) -> Self {
        let ctr_cfg = SaturatingCounterConfig::new(cfg.counter_bits());
        let hist_len = cfg.index_bits() as usize;
        debug!("building {} predictor: {} entries, {}-bit counters",
            cfg.strategy(), cfg.num_entries(), cfg.counter_bits());
        Self {
            cfg,
            table: CounterTable::new(cfg.num_entries(), ctr_cfg),
            meta: CounterTable::new(cfg.num_entries(), ctr_cfg),
            ghr: GlobalHistoryRegister::new(hist_len),
            lht: LocalHistoryTable::new(hist_len),
        }
    }

    pub fn config(&self) -> &PredictorConfig { &self.cfg }
    pub fn table(&self) -> &CounterTable { &self.table }
    pub fn meta_table(&self) -> &CounterTable { &self.meta }
    pub fn ghr(&self) -> &GlobalHistoryRegister { &self.ghr }
    pub fn lht(&self) -> &LocalHistoryTable { &self.lht }

    /// Returns the local history register used for `pc`.
    pub fn local_history(&self, pc: u64) -> &HistoryRegister {
        self.lht.get(pc)
    }

    fn simple_index(&self, pc: u64) -> usize {
        self.table.get_index(pc)
    }

    fn gshare_index(&self, pc: u64) -> usize {
        self.table.get_index((pc >> 2) ^ self.ghr.value() as u64)
    }

    fn local_index(&self, pc: u64) -> usize {
        self.table.get_index(self.lht.get(pc).value() as u64)
    }

    fn tournament_lookup(&self, pc: u64) -> TournamentLookup {
        let gshare_idx = self.gshare_index(pc);
        let local_idx = self.local_index(pc);
        let meta_idx = self.meta.get_index(pc);
        TournamentLookup {
            gshare_idx,
            gshare_val: *self.table.get_entry(gshare_idx),
            local_idx,
            local_val: *self.table.get_entry(local_idx),
            meta_idx,
            choice: *self.meta.get_entry(meta_idx),
        }
    }
}

impl ConditionalPredictor for Predictor {
    fn name(&self) -> &'static str { self.cfg.strategy().name() }

    fn reset(&mut self) {
        self.table.reset();
        self.meta.reset();
        self.ghr.reset();
        self.lht.reset();
    }

    fn predict(&self, pc: u64) -> Outcome {
        match self.cfg.strategy() {
            Strategy::Simple => self.table.predict(self.simple_index(pc)),
            Strategy::GShare => self.table.predict(self.gshare_index(pc)),
            Strategy::Local  => self.table.predict(self.local_index(pc)),
            Strategy::Tournament => {
                let ctr = *self.table.counter_config();
                let l = self.tournament_lookup(pc);
                let use_local = ctr.predict(l.choice) == Outcome::T;
                if use_local {
                    ctr.predict(l.local_val)
                } else {
                    ctr.predict(l.gshare_val)
                }
            },
        }
    }

    fn update(&mut self,
        pc: u64, _kind: OpKind, resolved: Outcome, _predicted: Outcome, _tgt: u64
    ) {
        match self.cfg.strategy() {
            Strategy::Simple => {
                let idx = self.simple_index(pc);
                self.table.train(idx, resolved);
            },
            Strategy::GShare => {
                let idx = self.gshare_index(pc);
                self.table.train(idx, resolved);
                self.ghr.shift_in(resolved);
            },
            Strategy::Local => {
                let idx = self.local_index(pc);
                self.table.train(idx, resolved);
                self.lht.get_mut(pc).shift_in(resolved);
            },
            Strategy::Tournament => {
                let ctr = *self.table.counter_config();

                // Everything here is read before any state is written.
                let l = self.tournament_lookup(pc);
                let pred_gshare = ctr.predict(l.gshare_val);
                let pred_local = ctr.predict(l.local_val);

                // The chooser only learns when the two sides disagree.
                if pred_gshare != pred_local {
                    let toward = Outcome::from(pred_local == resolved);
                    *self.meta.get_entry_mut(l.meta_idx) =
                        ctr.train(l.choice, toward);
                }

                // Both sides always learn. When the two indices coincide,
                // the local write is the one that remains.
                *self.table.get_entry_mut(l.gshare_idx) =
                    ctr.train(l.gshare_val, resolved);
                *self.table.get_entry_mut(l.local_idx) =
                    ctr.train(l.local_val, resolved);

                self.lht.get_mut(pc).shift_in(resolved);
                self.ghr.shift_in(resolved);
            },
        }
    }
}
