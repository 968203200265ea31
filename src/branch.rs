//! Types for representing instructions and branch outcomes.

use std::fmt;
use std::str::FromStr;

/// A branch outcome.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// Not taken
    N = 0,
    /// Taken
    T = 1,
}

impl Outcome {
    /// Returns the outcome as a single history bit.
    pub fn bit(self) -> u32 {
        self as u32
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::T => "t",
            Self::N => "n",
        };
        write!(f, "{}", s)
    }
}

impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}

impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        match x {
            true => Self::T,
            false => Self::N,
        }
    }
}

impl From<Outcome> for bool {
    fn from(x: Outcome) -> bool {
        match x {
            Outcome::T => true,
            Outcome::N => false,
        }
    }
}

/// The class of an instruction, as reported by whatever produces the trace.
///
/// Only the conditional kinds are ever handed to a predictor for a
/// prediction. Everything else goes through
/// [`ConditionalPredictor::track_other_inst`](crate::ConditionalPredictor::track_other_inst).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpKind {
    /// Not a control-flow instruction.
    Op,

    /// An unconditional return.
    Ret,
    /// A direct unconditional jump.
    Jmp,
    /// An indirect unconditional jump.
    JmpIndirect,
    /// A direct unconditional call.
    Call,
    /// An indirect unconditional call.
    CallIndirect,

    /// A conditional return.
    RetCond,
    /// A direct conditional branch.
    JmpCond,
    /// An indirect conditional branch.
    JmpIndirectCond,
    /// A direct conditional call.
    CallCond,
    /// An indirect conditional call.
    CallIndirectCond,
}

impl OpKind {
    pub const ALL: [OpKind; 11] = [
        Self::Op,
        Self::Ret,
        Self::Jmp,
        Self::JmpIndirect,
        Self::Call,
        Self::CallIndirect,
        Self::RetCond,
        Self::JmpCond,
        Self::JmpIndirectCond,
        Self::CallCond,
        Self::CallIndirectCond,
    ];

    /// Returns 'true' if this is a conditional branch.
    pub fn is_conditional(&self) -> bool {
        matches!(self,
            Self::RetCond | Self::JmpCond | Self::JmpIndirectCond |
            Self::CallCond | Self::CallIndirectCond
        )
    }

    /// Returns 'true' for any kind of control-flow instruction.
    pub fn is_branch(&self) -> bool {
        !matches!(self, Self::Op)
    }

    /// Returns 'true' if the target is not encoded in the instruction.
    pub fn is_indirect(&self) -> bool {
        matches!(self,
            Self::Ret | Self::JmpIndirect | Self::CallIndirect |
            Self::RetCond | Self::JmpIndirectCond | Self::CallIndirectCond
        )
    }

    /// The mnemonic used in text traces.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Op               => "op",
            Self::Ret              => "ret",
            Self::Jmp              => "jmp",
            Self::JmpIndirect      => "jmp.ind",
            Self::Call             => "call",
            Self::CallIndirect     => "call.ind",
            Self::RetCond          => "ret.cc",
            Self::JmpCond          => "jcc",
            Self::JmpIndirectCond  => "jcc.ind",
            Self::CallCond         => "call.cc",
            Self::CallIndirectCond => "call.ind.cc",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for OpKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter()
            .find(|k| k.mnemonic() == s)
            .copied()
            .ok_or_else(|| format!("unknown instruction kind '{}'", s))
    }
}

/// A record of one executed instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BranchRecord {
    /// The program counter value for this instruction
    pub pc: u64,

    /// The target address evaluated for this instruction
    pub tgt: u64,

    /// The type/kind of instruction
    pub kind: OpKind,

    /// The resolved direction
    pub outcome: Outcome,
}
impl BranchRecord {
    pub fn new(pc: u64, kind: OpKind, outcome: Outcome, tgt: u64) -> Self {
        Self { pc, tgt, kind, outcome }
    }

    /// Returns 'true' if this is a conditional instruction.
    pub fn is_conditional(&self) -> bool {
        self.kind.is_conditional()
    }
}
