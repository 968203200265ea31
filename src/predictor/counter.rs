//! Saturating counters.

use crate::branch::Outcome;

/// Increment a counter, saturating at `max`.
pub fn sat_increment(v: u32, max: u32) -> u32 {
    if v < max { v + 1 } else { max }
}

/// Decrement a counter, saturating at zero.
pub fn sat_decrement(v: u32) -> u32 {
    v.saturating_sub(1)
}

/// Configuration shared by every counter in a table.
///
/// Counters are plain `u32` values in `[0, max]`, starting at zero
/// (strongly not-taken).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounterConfig {
    max: u32,
}
impl SaturatingCounterConfig {
    /// Counters which are `bits` wide.
    pub fn new(bits: u32) -> Self {
        assert!(bits >= 1 && bits <= 31);
        Self { max: (1 << bits) - 1 }
    }

    pub fn max(&self) -> u32 { self.max }

    /// Values strictly above this predict taken. The midpoint itself is
    /// a not-taken prediction.
    pub fn threshold(&self) -> u32 { self.max / 2 }

    /// Return the direction predicted by some counter value.
    pub fn predict(&self, v: u32) -> Outcome {
        Outcome::from(v > self.threshold())
    }

    /// Move some counter value toward an outcome.
    pub fn train(&self, v: u32, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::T => sat_increment(v, self.max),
            Outcome::N => sat_decrement(v),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn saturates_at_bounds() {
        assert_eq!(sat_increment(3, 3), 3);
        assert_eq!(sat_decrement(0), 0);
        assert_eq!(sat_increment(0, 1), 1);
    }

    #[test]
    fn midpoint_is_not_taken() {
        let cfg = SaturatingCounterConfig::new(2);
        assert_eq!(cfg.max(), 3);
        assert_eq!(cfg.predict(1), Outcome::N);
        assert_eq!(cfg.predict(2), Outcome::T);

        let cfg = SaturatingCounterConfig::new(1);
        assert_eq!(cfg.predict(0), Outcome::N);
        assert_eq!(cfg.predict(1), Outcome::T);
    }

    proptest! {
        #[test]
        fn increment_stays_in_range(bits in 1u32..=31, seed: u32) {
            let max = (1u32 << bits) - 1;
            let v = seed % (max + 1);
            let next = sat_increment(v, max);
            prop_assert!(next >= v && next <= max);
        }

        #[test]
        fn decrement_stays_in_range(v: u32) {
            let next = sat_decrement(v);
            prop_assert!(next <= v);
            if v > 0 { prop_assert_eq!(next, v - 1); }
        }

        #[test]
        fn taken_streak_saturates(bits in 1u32..=6) {
            let cfg = SaturatingCounterConfig::new(bits);
            let mut v = 0;
            for k in 1..=cfg.max() + 2 {
                v = cfg.train(v, Outcome::T);
                let expected = Outcome::from(k > cfg.threshold());
                prop_assert_eq!(cfg.predict(v), expected);
            }
            prop_assert_eq!(v, cfg.max());
        }
    }
}
