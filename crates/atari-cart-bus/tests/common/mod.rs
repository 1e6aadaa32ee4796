//! Shared test host: a 2600 bus with recording TIA and RIOT stand-ins.

#![allow(dead_code)]

use std::collections::BTreeMap;

use atari_cart_bus::{CartConfig, Cartridge, IMAGE_SIZE, SETMODE, VcsBus};
use emu_core::{Bus, Device, PageAccess};

/// Logs every access and answers reads with a fixed byte.
#[derive(Default)]
pub struct Recorder {
    pub reads: Vec<u16>,
    pub writes: Vec<(u16, u8)>,
    pub read_value: u8,
    pub poke_result: bool,
}

impl Device for Recorder {
    fn peek(&mut self, address: u16) -> u8 {
        self.reads.push(address);
        self.read_value
    }

    fn poke(&mut self, address: u16, value: u8) -> bool {
        self.writes.push((address, value));
        self.poke_result
    }
}

#[derive(Default)]
pub struct MockBus {
    pub cycles: u32,
    pub autodetect: bool,
    pub pages: BTreeMap<u16, PageAccess>,
    /// Pages in the order they were mapped.
    pub page_log: Vec<u16>,
    pub tia: Recorder,
    pub riot: Recorder,
    pub delegates_installed: bool,
}

impl Bus for MockBus {
    fn cycles(&self) -> u32 {
        self.cycles
    }

    fn autodetect_mode(&self) -> bool {
        self.autodetect
    }

    fn set_page_access(&mut self, page: u16, access: PageAccess) {
        self.pages.insert(page, access);
        self.page_log.push(page);
    }
}

impl VcsBus for MockBus {
    fn tia(&mut self) -> &mut dyn Device {
        &mut self.tia
    }

    fn riot(&mut self) -> &mut dyn Device {
        &mut self.riot
    }

    fn install_delegates(&mut self) {
        self.delegates_installed = true;
    }
}

/// Builds a 32K BUS image.
pub struct RomBuilder {
    image: Vec<u8>,
}

impl RomBuilder {
    pub fn new() -> Self {
        Self {
            image: vec![0; IMAGE_SIZE],
        }
    }

    /// Fill the 2K driver area.
    pub fn driver(mut self, fill: u8) -> Self {
        self.image[..0x800].fill(fill);
        self
    }

    /// Place 6507 code or data at a window offset (`$000-$FFF`) of a bank.
    pub fn bank_bytes(mut self, bank: u8, offset: u16, bytes: &[u8]) -> Self {
        let at = 0x1000 + usize::from(bank) * 4096 + usize::from(offset);
        self.image[at..at + bytes.len()].copy_from_slice(bytes);
        self
    }

    /// Place bytes at an absolute image offset.
    pub fn raw(mut self, at: usize, bytes: &[u8]) -> Self {
        self.image[at..at + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.image
    }
}

/// Load `image` and plug it into a fresh bus.
pub fn installed(image: &[u8]) -> (Cartridge, MockBus) {
    let mut cart = Cartridge::new(image, CartConfig::default()).expect("valid image");
    let mut bus = MockBus::default();
    cart.install(&mut bus);
    (cart, bus)
}

/// Turn on fast jump and bus stuffing, leave digital audio off.
pub fn enable_bus_stuffing(cart: &mut Cartridge, bus: &mut MockBus) {
    cart.poke(bus, 0x1000 | SETMODE, 0xF0);
}
