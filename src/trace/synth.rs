//! Synthetic traces built from branches with known outcome patterns.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::branch::*;
use crate::trace::Trace;

/// A pre-determined pattern of outcomes associated with a conditional branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchPattern {
    /// A branch whose outcome is always 'taken'.
    AlwaysTaken,

    /// A branch whose outcome is always 'not-taken'.
    NeverTaken,

    /// A branch whose outcome is only periodically "taken".
    /// Otherwise, the branch is "not-taken" by default.
    TakenPeriodic(usize),

    /// A branch whose outcome is only periodically "not-taken".
    /// Otherwise, the branch is "taken" by default.
    NotTakenPeriodic(usize),

    /// A branch with an arbitrary pattern of outcomes.
    Pattern(&'static [Outcome]),

    /// A branch which is taken with some probability (in percent).
    Random(u8),
}
impl BranchPattern {
    /// Given some counter, generate a branch outcome.
    /// Panics for an empty pattern or a zero period.
    pub fn outcome(&self, ctr: usize, rng: &mut impl Rng) -> Outcome {
        match self {
            Self::AlwaysTaken => Outcome::T,
            Self::NeverTaken => Outcome::N,
            Self::TakenPeriodic(p) => {
                Outcome::from(ctr % p == (p - 1))
            },
            Self::NotTakenPeriodic(p) => {
                Outcome::from(ctr % p != (p - 1))
            },
            Self::Pattern(pat) => pat[ctr % pat.len()],
            Self::Random(pct) => {
                Outcome::from(rng.gen_range(0..100u8) < *pct)
            },
        }
    }
}

/// A single conditional branch site.
#[derive(Clone, Debug)]
struct Site {
    pc: u64,
    tgt: u64,
    pat: BranchPattern,
    ctr: usize,
}

/// Lays out branch sites at increasing addresses and emits a trace that
/// visits them round-robin.
#[derive(Clone, Debug)]
pub struct TraceSynth {
    sites: Vec<Site>,

    /// The initial address/program counter value.
    base: u64,

    /// State tracking the program counter value during layout.
    cursor: u64,

    /// Number of non-branch instructions emitted before each branch.
    filler: usize,
}

impl TraceSynth {
    /// Instruction size used when laying out sites.
    pub const ILEN: u64 = 4;

    pub fn new(base: u64) -> Self {
        Self {
            sites: Vec::new(),
            base,
            cursor: base,
            filler: 0,
        }
    }

    /// Emit `n` plain instructions before every branch.
    pub fn with_filler(mut self, n: usize) -> Self {
        self.filler = n;
        self
    }

    /// Add a conditional branch with some pattern of outcomes.
    /// Returns the address of the branch.
    pub fn branch(&mut self, pat: BranchPattern) -> u64 {
        match pat {
            BranchPattern::TakenPeriodic(p) |
            BranchPattern::NotTakenPeriodic(p) => assert!(p > 0, "zero period"),
            BranchPattern::Pattern(p) => assert!(!p.is_empty(), "empty pattern"),
            _ => {},
        }
        self.cursor += self.filler as u64 * Self::ILEN;
        let pc = self.cursor;
        self.sites.push(Site { pc, tgt: self.base, pat, ctr: 0 });
        self.cursor += Self::ILEN;
        pc
    }

    /// Increment the program counter by some value.
    pub fn pad(&mut self, len: u64) {
        self.cursor += len;
    }

    /// Increment and align the program counter to some power of two.
    pub fn pad_align(&mut self, aln: u64) {
        assert!(aln.is_power_of_two());
        let mask = aln - 1;
        self.cursor = (self.cursor + mask) & !mask;
    }

    /// Generate `num_branches` conditional branches (plus filler).
    /// The same seed always produces the same trace.
    pub fn generate(&self, num_branches: usize, seed: u64) -> Trace {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sites = self.sites.clone();
        let mut data = Vec::new();
        if sites.is_empty() {
            return Trace::new("synthetic", data);
        }

        let num_sites = sites.len();
        for i in 0..num_branches {
            let site = &mut sites[i % num_sites];
            for f in (1..=self.filler as u64).rev() {
                let pc = site.pc - f * Self::ILEN;
                data.push(BranchRecord::new(pc, OpKind::Op, Outcome::N, 0));
            }
            let outcome = site.pat.outcome(site.ctr, &mut rng);
            site.ctr += 1;
            data.push(BranchRecord::new(site.pc, OpKind::JmpCond, outcome, site.tgt));
        }
        Trace::new("synthetic", data)
    }
}
