//! Dwell counters: randomized countdowns that decide how long a behavior
//! stays on one target before switching.
//!
//! Ranges are configured in seconds and quantized to ticks at the current
//! synthesizer rate, so every counter must be reseeded when the rate changes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::DwellBounds;

/// Integer countdown in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellCounter {
    remaining: i64,
}

impl DwellCounter {
    pub fn new(ticks: i64) -> Self {
        Self { remaining: ticks }
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    /// Count one tick down. Returns true once the counter has run out.
    ///
    /// A counter seeded at N expires on its Nth tick; one seeded at 0 expires
    /// on its first.
    pub fn tick(&mut self) -> bool {
        self.remaining -= 1;
        self.remaining <= 0
    }
}

/// Source of dwell counters; owns the random generator
#[derive(Debug, Clone)]
pub struct CounterBank {
    rng: StdRng,
}

impl CounterBank {
    /// Deterministic bank for tests and replays
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Bank seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Inclusive tick range a bound pair samples from
    pub fn tick_range(bounds: DwellBounds, rate: f64) -> (i64, i64) {
        let bounds = bounds.clamped();
        let lo = ((bounds.min * rate).floor() as i64).max(0);
        let hi = ((bounds.max * rate).floor() as i64).max(lo);
        (lo, hi)
    }

    /// Fresh counter sampled uniformly from the quantized range
    pub fn reseed(&mut self, bounds: DwellBounds, rate: f64) -> DwellCounter {
        let (lo, hi) = Self::tick_range(bounds, rate);
        if lo == hi {
            return DwellCounter::new(lo);
        }
        DwellCounter::new(self.rng.random_range(lo..=hi))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reseed_stays_in_range() {
        let mut bank = CounterBank::from_seed(7);
        let cases: [(f64, f64, f64); 4] = [(0.1, 3.0, 10.0), (0.5, 0.5, 30.0), (1.25, 4.75, 7.0), (2.0, 9.0, 1.0)];
        for (min, max, rate) in cases {
            let lo = (min * rate).floor() as i64;
            let hi = (max * rate).floor() as i64;
            for _ in 0..500 {
                let c = bank.reseed(DwellBounds::new(min, max), rate);
                assert!(c.remaining() >= lo && c.remaining() <= hi, "{} not in [{}, {}]", c.remaining(), lo, hi);
            }
        }
    }

    #[test]
    fn test_reseed_clamps_inverted_bounds() {
        let mut bank = CounterBank::from_seed(1);
        assert_eq!(CounterBank::tick_range(DwellBounds::new(2.0, 1.0), 10.0), (20, 20));
        for _ in 0..50 {
            assert_eq!(bank.reseed(DwellBounds::new(2.0, 1.0), 10.0).remaining(), 20);
        }
    }

    #[test]
    fn test_zero_width_range_is_deterministic() {
        let mut a = CounterBank::from_seed(1);
        let mut b = CounterBank::from_seed(99);
        let bounds = DwellBounds::new(0.3, 0.3);
        assert_eq!(a.reseed(bounds, 10.0), b.reseed(bounds, 10.0));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = CounterBank::from_seed(42);
        let mut b = CounterBank::from_seed(42);
        let bounds = DwellBounds::new(0.1, 3.0);
        for _ in 0..20 {
            assert_eq!(a.reseed(bounds, 10.0), b.reseed(bounds, 10.0));
        }
    }

    #[test]
    fn test_counter_expires_on_nth_tick() {
        let mut c = DwellCounter::new(3);
        assert!(!c.tick());
        assert!(!c.tick());
        assert!(c.tick());
    }

    #[test]
    fn test_zero_counter_expires_immediately() {
        let mut c = DwellCounter::new(0);
        assert!(c.tick());
    }
}
