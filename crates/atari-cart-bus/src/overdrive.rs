//! Bus stuffing.
//!
//! The ARM can pull data-bus lines low while the 6507 writes to the TIA.
//! Kernels arm it with `STY ZP` (0x84 0xnn) while Y holds 0xFF: the driver
//! watches the operand fetch, and the following write to `$nn` carries the
//! next byte of the datastream selected by that register's address map
//! instead of 0xFF.

use crate::ram::ChipRam;

/// Pending address meaning "no override armed".
pub const NO_OVERRIDE: u16 = 0xFF;
/// Highest TIA register (`HMBL`) with an address map.
pub const LAST_MAPPED_REGISTER: u8 = 0x24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusOverride {
    pending: u16,
}

impl BusOverride {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: NO_OVERRIDE,
        }
    }

    #[must_use]
    pub const fn pending(&self) -> u16 {
        self.pending
    }

    /// Arm an override for the next write to `address`.
    pub fn arm(&mut self, address: u16) {
        self.pending = address;
    }

    /// Drop any armed override without touching the streams.
    pub fn disarm(&mut self) {
        self.pending = NO_OVERRIDE;
    }

    /// Value that actually reaches the TIA for a write of `value` to
    /// `address`. Disarms after every write, whether it matched or not.
    pub fn apply(&mut self, ram: &mut ChipRam, address: u16, value: u8) -> u8 {
        let mut driven = value;
        if address == self.pending {
            let map = (address & 0x7F) as u8;
            if map <= LAST_MAPPED_REGISTER {
                // Each map is eight 4-bit stream numbers, consumed low nibble
                // first and rotated back in at the top.
                let all = ram.address_map(map);
                let stream = (all & 0x0F) as u8;
                driven &= ram.read_stream(stream);
                ram.set_address_map(map, (all >> 4) | (u32::from(stream) << 28));
            }
        }
        self.disarm();
        driven
    }
}

impl Default for BusOverride {
    fn default() -> Self {
        Self::new()
    }
}
