//! Bank switch register.

use emu_core::{Bus, PageAccess};

use crate::host::{PAGE_SHIFT, PAGE_SIZE};
use crate::hotspot::PROTECTED_LIMIT;

pub const BANK_COUNT: u8 = 7;
pub const BANK_SIZE: usize = 4096;
pub const START_BANK: u8 = 6;
/// Image offset of bank 0. The driver and C code sit below it.
pub const PROGRAM_BASE: usize = 0x1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankSwitch {
    current: u8,
    changed: bool,
    locked: bool,
}

impl BankSwitch {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: START_BANK,
            changed: false,
            locked: false,
        }
    }

    #[must_use]
    pub const fn current(&self) -> u8 {
        self.current
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.changed
    }

    /// Read and clear the changed flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Image offset of a window offset in the active bank.
    #[must_use]
    pub fn image_offset(&self, offset: u16) -> usize {
        PROGRAM_BASE + usize::from(self.current) * BANK_SIZE + usize::from(offset & 0x0FFF)
    }

    /// Switch banks. Fails while locked or for a bank that doesn't exist.
    pub fn select<B: Bus + ?Sized>(&mut self, bus: &mut B, index: u8) -> bool {
        if self.locked {
            return false;
        }
        if index >= BANK_COUNT {
            log::warn!("ignoring switch to bank {index}, only {BANK_COUNT} exist");
            return false;
        }
        self.restore(bus, index);
        true
    }

    /// Switch banks even when locked. Used when restoring state.
    pub fn restore<B: Bus + ?Sized>(&mut self, bus: &mut B, index: u8) {
        self.current = index;
        map_program_pages(bus, index);
        self.changed = true;
    }
}

impl Default for BankSwitch {
    fn default() -> Self {
        Self::new()
    }
}

/// Route the hotspot window through the cartridge. It never holds code the
/// disassembler should tag.
pub fn map_hotspot_window<B: Bus + ?Sized>(bus: &mut B) {
    for address in (0x1000..0x1000 + PROTECTED_LIMIT).step_by(usize::from(PAGE_SIZE)) {
        bus.set_page_access(address >> PAGE_SHIFT, PageAccess::read());
    }
}

/// Route the rest of the 4K window through the cartridge, tagged with
/// offsets into `bank`.
pub fn map_program_pages<B: Bus + ?Sized>(bus: &mut B, bank: u8) {
    let base = usize::from(bank) * BANK_SIZE;
    for address in (0x1000 + PROTECTED_LIMIT..0x2000).step_by(usize::from(PAGE_SIZE)) {
        let code_offset = base + usize::from(address & 0x0FFF);
        bus.set_page_access(address >> PAGE_SHIFT, PageAccess::read_code(code_offset));
    }
}
