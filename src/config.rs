//! Predictor configuration.

use std::fmt;
use thiserror::Error;

/// Usage string for the positional predictor parameters.
pub const USAGE: &str =
    "<trace> index_bits counter_bits strategy(0:simple, 1:gshare, 2:local, 3:tournament)";

/// Largest accepted index width. Two tables of `1 << 24` counters
/// already take 128 MiB.
pub const MAX_INDEX_BITS: u32 = 24;

/// Largest accepted counter width, so a counter fits a `u32`.
pub const MAX_COUNTER_BITS: u32 = 31;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("expected 3 predictor parameters, got {0}")]
    ArgCount(usize),

    #[error("malformed number '{0}'")]
    Malformed(String),

    #[error("{name} must be between 1 and {max}, got {value}")]
    OutOfRange { name: &'static str, max: u32, value: u64 },

    #[error("unknown strategy {0} (expected 0, 1, 2 or 3)")]
    UnknownStrategy(u64),
}

/// Parse an unsigned integer the way `strtoul(s, NULL, 0)` picks a radix:
/// a `0x` prefix is hexadecimal, a leading `0` is octal, anything else is
/// decimal. Unlike `strtoul`, trailing garbage is an error.
pub fn parse_uint(s: &str) -> Result<u64, ConfigError> {
    let t = s.trim();
    let (digits, radix) = if let Some(hex) = t.strip_prefix("0x")
        .or_else(|| t.strip_prefix("0X"))
    {
        (hex, 16)
    } else if t.len() > 1 && t.starts_with('0') {
        (&t[1..], 8)
    } else {
        (t, 10)
    };
    u64::from_str_radix(digits, radix)
        .map_err(|_| ConfigError::Malformed(s.to_string()))
}

/// Strategy used by [Predictor](crate::Predictor) to index its tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A table of counters indexed by the program counter.
    Simple,
    /// Program counter hashed with global history.
    GShare,
    /// Counters indexed by per-address history.
    Local,
    /// GShare and Local arbitrated by a meta-table.
    Tournament,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple     => "simple",
            Self::GShare     => "gshare",
            Self::Local      => "local",
            Self::Tournament => "tournament",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u64> for Strategy {
    type Error = ConfigError;
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(Self::Simple),
            1 => Ok(Self::GShare),
            2 => Ok(Self::Local),
            3 => Ok(Self::Tournament),
            _ => Err(ConfigError::UnknownStrategy(x)),
        }
    }
}

/// Configuration for building a [Predictor](crate::Predictor).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictorConfig {
    /// log2 of the number of table entries
    index_bits: u32,

    /// Width of each saturating counter
    counter_bits: u32,

    strategy: Strategy,
}
impl PredictorConfig {
    pub fn new(index_bits: u32, counter_bits: u32, strategy: Strategy)
        -> Result<Self, ConfigError>
    {
        Self::check_bits("index_bits", MAX_INDEX_BITS, index_bits as u64)?;
        Self::check_bits("counter_bits", MAX_COUNTER_BITS, counter_bits as u64)?;
        Ok(Self { index_bits, counter_bits, strategy })
    }

    /// Build a configuration from the three positional parameters
    /// `index_bits counter_bits strategy`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        if args.len() != 3 {
            return Err(ConfigError::ArgCount(args.len()));
        }
        let index_bits = parse_uint(args[0].as_ref())?;
        let counter_bits = parse_uint(args[1].as_ref())?;
        let strategy = Strategy::try_from(parse_uint(args[2].as_ref())?)?;

        let index_bits = Self::check_bits("index_bits", MAX_INDEX_BITS, index_bits)?;
        let counter_bits =
            Self::check_bits("counter_bits", MAX_COUNTER_BITS, counter_bits)?;
        Ok(Self { index_bits, counter_bits, strategy })
    }

    fn check_bits(name: &'static str, max: u32, value: u64)
        -> Result<u32, ConfigError>
    {
        if value == 0 || value > max as u64 {
            return Err(ConfigError::OutOfRange { name, max, value });
        }
        Ok(value as u32)
    }

    pub fn index_bits(&self) -> u32 { self.index_bits }
    pub fn counter_bits(&self) -> u32 { self.counter_bits }
    pub fn strategy(&self) -> Strategy { self.strategy }

    /// Number of entries in each table.
    pub fn num_entries(&self) -> usize { 1 << self.index_bits }

    /// Mask selecting the significant bits of an index.
    pub fn index_mask(&self) -> u64 { (1 << self.index_bits) - 1 }

    /// Largest value a counter can hold.
    pub fn count_max(&self) -> u32 { (1 << self.counter_bits) - 1 }
}
