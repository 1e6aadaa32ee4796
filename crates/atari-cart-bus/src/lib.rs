//! Atari 2600 BUS cartridge.
//!
//! BUS is a Harmony/Melody bankswitching scheme: 32K of flash (a 2K ARM
//! driver, 2K of C code, seven 4K 6507 banks) and 8K of RAM shared between
//! the 6507 and an ARM coprocessor. On top of plain bank switching it adds
//! datastreams, fast jumps, bus stuffing into TIA writes and three-voice
//! music.
//!
//! # Hotspots (offset within `$1000-$1FFF`)
//!
//! | Offset | Name      | Access | Effect                                  |
//! |--------|-----------|--------|-----------------------------------------|
//! | `$FEE` | AMPLITUDE | R      | Current music sample                    |
//! | `$FEF` | DSREAD    | R      | Next byte of the command stream         |
//! | `$FF0` | DSWRITE   | W      | Store into the command stream           |
//! | `$FF1` | DSPTR     | W      | Shift a byte into the command pointer   |
//! | `$FF2` | SETMODE   | W      | Detector and audio mode                 |
//! | `$FF3` | CALLFN    | W      | `$FE`/`$FF` run the ARM code            |
//! | `$FF5`-`$FFB` | BANK0-6 | R/W | Select a 4K bank                     |
//!
//! Offsets `$000-$03F` always read ROM.
//!
//! The cartridge does not own the system bus: every access takes the host
//! as a [`VcsBus`], which supplies the cycle count, page mapping and the
//! TIA and RIOT that share the address space.

mod bank;
mod cartridge;
mod config;
mod coprocessor;
mod datastream;
pub mod detect;
mod error;
mod host;
mod hotspot;
mod inspect;
mod music;
mod overdrive;
mod ram;
mod state;

pub use bank::{BANK_COUNT, BANK_SIZE, START_BANK};
pub use cartridge::{Cartridge, IMAGE_SIZE};
pub use config::{CartConfig, ConsoleTiming, MUSIC_REFERENCE_CLOCK, RamInit};
pub use coprocessor::{
    CALL_RUN, CALL_RUN_POLLED, CallOutcome, CallbackOp, Callbacks, Coprocessor,
    CoprocessorFault, CoprocessorMemory, FaultHandler,
};
pub use datastream::{COMM_STREAM, JUMP_STREAM, UNIT_STEP};
pub use error::CartError;
pub use host::{PAGE_SHIFT, PAGE_SIZE, VcsBus};
pub use hotspot::{
    AMPLITUDE, BANK0, BANK6, CALLFN, DSPTR, DSREAD, DSWRITE, Mode, PROTECTED_LIMIT, SETMODE,
};
pub use music::{DEFAULT_WAVEFORM_SIZE, MusicFetchers, Voice, WAVEFORM_ORIGIN, waveform_base};
pub use overdrive::{LAST_MAPPED_REGISTER, NO_OVERRIDE};
pub use ram::{ChipRam, DRIVER_SIZE, DSMAPS, DSRAM, DSXINC, DSXPTR, RAM_SIZE, WAVEFORM};
pub use state::STATE_TAG;
