//! Host bus contract and page-access mapping.

/// A page mapping request issued by a device to the host bus.
///
/// Every access to a mapped page is routed through the owning device's
/// `peek`/`poke`. `code_offset` locates the page inside the device's
/// code-access map (used by disassemblers to tag code versus data); it is
/// `None` for pages that only carry hotspots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageAccess {
    pub code_offset: Option<usize>,
}

impl PageAccess {
    /// A page that only carries hotspots.
    #[must_use]
    pub const fn read() -> Self {
        Self { code_offset: None }
    }

    #[must_use]
    pub const fn read_code(code_offset: usize) -> Self {
        Self {
            code_offset: Some(code_offset),
        }
    }
}

/// A peripheral that answers reads and writes on its own.
pub trait Device {
    /// Read a byte. May have side effects (hotspots, latches).
    fn peek(&mut self, address: u16) -> u8;

    /// Write a byte. Returns true if the write changed the device's address
    /// space (e.g. patched ROM).
    fn poke(&mut self, address: u16, value: u8) -> bool;
}

/// The system bus as seen from a device that is being accessed through it.
pub trait Bus {
    /// Current host CPU cycle count. Wraps at 32 bits.
    fn cycles(&self) -> u32;

    /// True while the host is scanning an unknown image to identify its
    /// format. Devices should stay quiet about failures in this mode.
    fn autodetect_mode(&self) -> bool {
        false
    }

    /// Route all accesses to `page` through the calling device.
    fn set_page_access(&mut self, page: u16, access: PageAccess);
}
