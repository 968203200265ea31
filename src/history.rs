//! Branch history registers.

use bitvec::prelude::*;
use crate::branch::Outcome;

/// Number of per-address registers in a [LocalHistoryTable].
pub const LOCAL_HISTORY_ENTRIES: usize = 1024;

/// A shift register of recent outcomes, `len` bits wide.
///
/// The most recent outcome is bit 0. Shifting in a new outcome discards the
/// oldest bit (bit `len - 1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryRegister {
    data: u32,
    len: usize,
}

// NOTE: This presents the bits with the oldest outcome on the left and the
// newest outcome (bit 0) on the right.
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.view_bits::<Lsb0>()[..self.len].iter()
            .by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        assert!(len >= 1 && len <= 31);
        Self { data: 0, len }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn mask(&self) -> u32 { (1 << self.len) - 1 }

    /// Return the current contents of the register.
    pub fn value(&self) -> u32 { self.data }

    /// Shift an outcome into the bottom of the register.
    pub fn shift_in(&mut self, outcome: Outcome) {
        self.data = ((self.data << 1) | outcome.bit()) & self.mask();
    }

    /// Clear all history.
    pub fn reset(&mut self) { self.data = 0; }
}

/// A global history register (GHR) shared by every branch.
pub type GlobalHistoryRegister = HistoryRegister;

/// A table of per-address history registers.
///
/// Entries are selected with the low bits of the program counter, so
/// distinct branches may alias onto the same register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalHistoryTable {
    data: Vec<HistoryRegister>,
}
impl LocalHistoryTable {
    /// Create a table whose registers are `len` bits wide.
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![HistoryRegister::new(len); LOCAL_HISTORY_ENTRIES],
        }
    }

    pub fn size(&self) -> usize { self.data.len() }

    /// Returns the table index for some program counter value.
    pub fn get_index(&self, pc: u64) -> usize {
        (pc as usize) & (LOCAL_HISTORY_ENTRIES - 1)
    }

    /// Returns the history register for some program counter value.
    pub fn get(&self, pc: u64) -> &HistoryRegister {
        &self.data[self.get_index(pc)]
    }

    /// Returns the history register for some program counter value.
    pub fn get_mut(&mut self, pc: u64) -> &mut HistoryRegister {
        let idx = self.get_index(pc);
        &mut self.data[idx]
    }

    /// Clear all history.
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(HistoryRegister::reset);
    }
}
