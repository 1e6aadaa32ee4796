//! What the cartridge needs from the console it is plugged into.

use emu_core::{Bus, Device};

/// Pages are 64 bytes: the hotspot window `$1000-$103F` is exactly one.
pub const PAGE_SHIFT: u16 = 6;
pub const PAGE_SIZE: u16 = 1 << PAGE_SHIFT;

/// The 2600 system bus.
///
/// Accesses below `$1000` still reach the cartridge (it snoops the bus for
/// bus stuffing) and are passed on to the TIA or RIOT from here.
pub trait VcsBus: Bus {
    fn tia(&mut self) -> &mut dyn Device;
    fn riot(&mut self) -> &mut dyn Device;

    /// Route the TIA and RIOT pages through the cartridge, which forwards
    /// each access to [`tia`](Self::tia) or [`riot`](Self::riot). Called
    /// once from install, before the cartridge maps its window.
    fn install_delegates(&mut self);
}
