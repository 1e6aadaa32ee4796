//! The 8K of Harmony RAM shared by the driver, the ARM code and the 6507.
//!
//! Every table lives at a fixed offset inside one buffer, so a store through
//! one view is visible through every overlapping view. Programs rely on this
//! (the ARM code rewrites the driver and the datastream tables directly).
//!
//! | Offset  | Contents                                 |
//! |---------|------------------------------------------|
//! | `$0000` | BUS driver, copied from ROM on reset     |
//! | `$06D8` | Datastream pointers (`PPPFF---`)         |
//! | `$0720` | Datastream increments (`----IIFF`)       |
//! | `$0760` | Bus-stuffing address maps                |
//! | `$07F4` | Waveform / sample pointers, 3 voices     |
//! | `$0800` | Display data (6K)                        |
//!
//! The pointer table holds 18 slots before it runs into the increments,
//! and increment slots 16 and 17 share bytes with map slots 0 and 1.

/// Size of the Harmony RAM.
pub const RAM_SIZE: usize = 8192;
/// Size of the BUS driver at the start of ROM and RAM.
pub const DRIVER_SIZE: usize = 0x0800;

/// Datastream pointer table.
pub const DSXPTR: usize = 0x06D8;
/// Datastream increment table.
pub const DSXINC: usize = 0x0720;
/// Bus-stuffing address maps.
pub const DSMAPS: usize = 0x0760;
/// Waveform pointer table.
pub const WAVEFORM: usize = 0x07F4;
/// Display data.
pub const DSRAM: usize = 0x0800;

/// Harmony RAM with named views onto its tables.
#[derive(Clone)]
pub struct ChipRam {
    bytes: Box<[u8; RAM_SIZE]>,
}

impl ChipRam {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0; RAM_SIZE]),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; RAM_SIZE] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8; RAM_SIZE] {
        &mut self.bytes
    }

    /// Display data: the target of datastream reads and writes.
    #[must_use]
    pub fn display(&self) -> &[u8] {
        &self.bytes[DSRAM..]
    }

    pub fn display_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[DSRAM..]
    }

    /// Everything after the driver. Cleared or randomized on reset.
    pub fn above_driver_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[DRIVER_SIZE..]
    }

    fn word(&self, base: usize, index: u8) -> u32 {
        let at = base + usize::from(index) * 4;
        u32::from_le_bytes([
            self.bytes[at],
            self.bytes[at + 1],
            self.bytes[at + 2],
            self.bytes[at + 3],
        ])
    }

    fn set_word(&mut self, base: usize, index: u8, value: u32) {
        let at = base + usize::from(index) * 4;
        self.bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    #[must_use]
    pub fn pointer(&self, stream: u8) -> u32 {
        self.word(DSXPTR, stream)
    }

    pub fn set_pointer(&mut self, stream: u8, value: u32) {
        self.set_word(DSXPTR, stream, value);
    }

    #[must_use]
    pub fn increment(&self, stream: u8) -> u32 {
        self.word(DSXINC, stream)
    }

    pub fn set_increment(&mut self, stream: u8, value: u32) {
        self.set_word(DSXINC, stream, value);
    }

    #[must_use]
    pub fn address_map(&self, map: u8) -> u32 {
        self.word(DSMAPS, map)
    }

    pub fn set_address_map(&mut self, map: u8, value: u32) {
        self.set_word(DSMAPS, map, value);
    }

    /// Raw waveform pointer for a voice, as the ARM sees it.
    #[must_use]
    pub fn waveform_pointer(&self, voice: u8) -> u32 {
        self.word(WAVEFORM, voice)
    }

    pub fn set_waveform_pointer(&mut self, voice: u8, value: u32) {
        self.set_word(WAVEFORM, voice, value);
    }
}

impl Default for ChipRam {
    fn default() -> Self {
        Self::new()
    }
}
