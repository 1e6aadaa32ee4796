//! Master clock configuration and exact clock-domain conversion.

/// Master clock configuration for a system.
///
/// The CPU clock is the crystal divided by an integer, which keeps odd rates
/// such as NTSC's 3,579,545 / 3 Hz exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    /// Crystal frequency in Hz.
    pub crystal_hz: u64,
    /// CPU clock = crystal / divider.
    pub divider: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(crystal_hz: u64, divider: u64) -> Self {
        Self {
            crystal_hz,
            divider,
        }
    }
}

/// Converts CPU cycles into ticks of a slower clock without drift.
///
/// The fractional part of each conversion is carried as an integer remainder
/// in units of `1 / crystal_hz` ticks, so many small conversions always sum
/// to the same whole ticks as one large conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FractionalClock {
    source: MasterClock,
    target_hz: u64,
    remainder: u64,
}

impl FractionalClock {
    #[must_use]
    pub const fn new(source: MasterClock, target_hz: u64) -> Self {
        Self {
            source,
            target_hz,
            remainder: 0,
        }
    }

    /// Convert `cycles` CPU cycles, returning the whole target ticks elapsed.
    pub fn advance(&mut self, cycles: u32) -> u32 {
        let scaled = u64::from(cycles) * self.target_hz * self.source.divider + self.remainder;
        self.remainder = scaled % self.source.crystal_hz;
        (scaled / self.source.crystal_hz) as u32
    }

    /// Carried remainder, in `1 / crystal_hz` ticks.
    #[must_use]
    pub const fn remainder(&self) -> u64 {
        self.remainder
    }

    /// Drop any partial tick.
    pub fn clear(&mut self) {
        self.remainder = 0;
    }

    /// The pending fraction of a tick, multiplied by `scale` and truncated.
    #[must_use]
    pub fn fraction_scaled(&self, scale: u64) -> u64 {
        self.remainder * scale / self.source.crystal_hz
    }

    /// Restore a fraction previously produced by [`fraction_scaled`].
    ///
    /// Exact as long as `scale` exceeds `crystal_hz`: the remainder is the
    /// only integer inside the interval the truncated fraction describes.
    ///
    /// [`fraction_scaled`]: Self::fraction_scaled
    pub fn set_fraction_scaled(&mut self, fraction: u64, scale: u64) {
        let remainder = (fraction * self.source.crystal_hz).div_ceil(scale);
        self.remainder = remainder.min(self.source.crystal_hz - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NTSC: MasterClock = MasterClock::new(3_579_545, 3);

    #[test]
    fn large_and_small_steps_agree() {
        let mut one = FractionalClock::new(NTSC, 20_000);
        let mut many = FractionalClock::new(NTSC, 20_000);

        let whole = one.advance(76 * 262);
        let summed: u32 = (0..262).map(|_| many.advance(76)).sum();

        assert_eq!(whole, summed);
        assert_eq!(one.remainder(), many.remainder());
    }

    #[test]
    fn conversion_loses_nothing() {
        let mut clock = FractionalClock::new(NTSC, 20_000);
        clock.advance(12_345);
        let before = clock.remainder();
        let whole = clock.advance(999);
        assert_eq!(
            u64::from(whole) * NTSC.crystal_hz + clock.remainder(),
            999 * 20_000 * 3 + before
        );
    }

    #[test]
    fn scaled_fraction_round_trips() {
        let mut clock = FractionalClock::new(NTSC, 20_000);
        for step in [1, 7, 59, 60, 61, 1000, 76] {
            clock.advance(step);
            let saved = clock.fraction_scaled(100_000_000);
            let mut restored = FractionalClock::new(NTSC, 20_000);
            restored.set_fraction_scaled(saved, 100_000_000);
            assert_eq!(restored.remainder(), clock.remainder(), "step {step}");
        }
    }
}
