//! Cartridge configuration.

use emu_core::MasterClock;

/// Console video standard, forwarded to the ARM interpreter so it can
/// convert its instruction timing into 6507 cycles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTiming {
    /// NTSC: 3,579,545 Hz crystal, 1.19 MHz CPU.
    #[default]
    Ntsc,
    /// PAL: 3,546,894 Hz crystal, 1.18 MHz CPU.
    Pal,
    /// SECAM: PAL timing with SECAM colour.
    Secam,
}

/// How RAM above the driver is filled on reset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RamInit {
    #[default]
    Zeroed,
    /// Pseudo-random contents, reproducible from the seed.
    Random { seed: u64 },
}

/// Clock the music fetchers are timed against.
///
/// BUS drivers are tuned for 1,193,191.67 Hz regardless of the console
/// standard, so this is not derived from [`ConsoleTiming`].
pub const MUSIC_REFERENCE_CLOCK: MasterClock = MasterClock::new(3_579_575, 3);

/// Configuration for constructing a BUS cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartConfig {
    pub ram_init: RamInit,
    /// Video standard, forwarded to the ARM interpreter.
    pub timing: ConsoleTiming,
    /// CPU clock the music fetchers convert cycles from.
    pub music_clock: MasterClock,
    /// Treat ARM memory faults as fatal instead of letting the access
    /// through. Forwarded to the interpreter.
    pub trap_fatal: bool,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            ram_init: RamInit::default(),
            timing: ConsoleTiming::default(),
            music_clock: MUSIC_REFERENCE_CLOCK,
            trap_fatal: true,
        }
    }
}
