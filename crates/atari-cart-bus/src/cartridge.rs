//! The BUS cartridge as a device on the 2600 bus.

use emu_core::Bus;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::bank::{self, BANK_COUNT, BankSwitch, START_BANK};
use crate::config::{CartConfig, ConsoleTiming, RamInit};
use crate::coprocessor::{
    Bridge, CallOutcome, Coprocessor, CoprocessorMemory, FaultHandler,
};
use crate::datastream::{COMM_STREAM, JUMP_STREAM};
use crate::error::CartError;
use crate::host::VcsBus;
use crate::hotspot::{FastJump, JMP_ABS, Mode, PROTECTED_LIMIT, ReadHotspot, STY_ZP, WriteHotspot};
use crate::music::MusicFetchers;
use crate::overdrive::BusOverride;
use crate::ram::{ChipRam, DRIVER_SIZE};

/// Size of a BUS flash image: 2K driver, 2K C code, seven 4K banks.
pub const IMAGE_SIZE: usize = 32768;

pub struct Cartridge {
    pub(crate) image: Box<[u8; IMAGE_SIZE]>,
    pub(crate) ram: ChipRam,
    pub(crate) banks: BankSwitch,
    pub(crate) mode: Mode,
    pub(crate) fast_jump: FastJump,
    /// Offset of the operand fetch following a `STY zp`, 0 when none.
    pub(crate) sty_operand: u16,
    pub(crate) overdrive: BusOverride,
    pub(crate) music: MusicFetchers,
    pub(crate) bridge: Bridge,
    /// Host cycle count at the last music update.
    pub(crate) system_cycles: u32,
    rng: StdRng,
    config: CartConfig,
}

impl Cartridge {
    /// Load a BUS image. Short images are zero-padded to 32K.
    pub fn new(image: &[u8], config: CartConfig) -> Result<Self, CartError> {
        if image.is_empty() {
            return Err(CartError::EmptyImage);
        }
        if image.len() > IMAGE_SIZE {
            return Err(CartError::ImageTooLarge(image.len()));
        }
        let mut padded = Box::new([0u8; IMAGE_SIZE]);
        padded[..image.len()].copy_from_slice(image);

        let seed = match config.ram_init {
            RamInit::Random { seed } => seed,
            RamInit::Zeroed => 0,
        };
        let mut cart = Self {
            image: padded,
            ram: ChipRam::new(),
            banks: BankSwitch::new(),
            mode: Mode::RESET,
            fast_jump: FastJump::default(),
            sty_operand: 0,
            overdrive: BusOverride::new(),
            music: MusicFetchers::new(config.music_clock),
            bridge: Bridge::default(),
            system_cycles: 0,
            rng: StdRng::seed_from_u64(seed),
            config,
        };
        cart.power_on(0);
        Ok(cart)
    }

    /// Attach the ARM interpreter that `CALLFN` runs.
    #[must_use]
    pub fn with_coprocessor(mut self, mut interpreter: Box<dyn Coprocessor>) -> Self {
        interpreter.set_console_timing(self.config.timing);
        interpreter.set_trap_fatal(self.config.trap_fatal);
        self.bridge.attach(interpreter);
        self
    }

    /// Send ARM faults to `handler` instead of the log.
    #[must_use]
    pub fn with_fault_handler(mut self, handler: Box<dyn FaultHandler>) -> Self {
        self.bridge.set_fault_handler(handler);
        self
    }

    fn power_on(&mut self, now: u32) {
        match self.config.ram_init {
            RamInit::Zeroed => self.ram.above_driver_mut().fill(0),
            RamInit::Random { .. } => self.rng.fill_bytes(self.ram.above_driver_mut()),
        }
        self.ram.as_bytes_mut()[..DRIVER_SIZE].copy_from_slice(&self.image[..DRIVER_SIZE]);

        self.system_cycles = now;
        self.bridge.set_arm_cycles(now);
        self.music.reset();
        self.mode = Mode::RESET;
        self.fast_jump = FastJump::default();
        self.sty_operand = 0;
        self.overdrive = BusOverride::new();
    }

    /// Map the cartridge into the bus and select the start bank.
    pub fn install<B: VcsBus>(&mut self, bus: &mut B) {
        bus.install_delegates();
        bank::map_hotspot_window(bus);
        self.bank(bus, START_BANK);
    }

    /// Console reset: reload the driver, clear or scramble the rest of RAM
    /// and return to the start bank.
    pub fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.power_on(bus.cycles());
        self.bank(bus, START_BANK);
        log::debug!("BUS cartridge reset at cycle {}", self.system_cycles);
    }

    pub fn peek<B: VcsBus>(&mut self, bus: &mut B, address: u16) -> u8 {
        if address & 0x1000 == 0 {
            return delegate_peek(bus, address);
        }
        let offset = address & 0x0FFF;
        let rom = self.image[self.banks.image_offset(offset)];
        if offset < PROTECTED_LIMIT || self.banks.is_locked() {
            return rom;
        }

        if self.fast_jump.take(offset) {
            return self.ram.read_stream_unit(JUMP_STREAM);
        }
        let stuffing = self.mode.bus_stuffing();
        if stuffing && rom == JMP_ABS && self.jmp_operand_is_zero(offset) {
            self.fast_jump.arm(offset);
            return JMP_ABS;
        }
        self.fast_jump.operand = 0;

        if stuffing && self.sty_operand == offset {
            self.overdrive.arm(u16::from(rom));
        }
        self.sty_operand = 0;

        let value = match ReadHotspot::decode(offset) {
            Some(ReadHotspot::Amplitude) => {
                self.update_music(bus.cycles());
                self.music
                    .sample(&self.ram, &self.image[..], self.mode.digital_audio())
            }
            Some(ReadHotspot::DsRead) => self.ram.read_stream(COMM_STREAM),
            Some(ReadHotspot::Bank(index)) => {
                self.bank(bus, index);
                rom
            }
            None => rom,
        };

        if stuffing && value == STY_ZP {
            self.sty_operand = offset + 1;
        }
        value
    }

    /// Write a byte. Never changes the cartridge's address space, so always
    /// returns false.
    pub fn poke<B: VcsBus>(&mut self, bus: &mut B, address: u16, value: u8) -> bool {
        if address & 0x1000 == 0 {
            // A locked cartridge drives nothing, but every write still
            // disarms bus stuffing.
            let value = if self.banks.is_locked() {
                self.overdrive.disarm();
                value
            } else {
                self.overdrive.apply(&mut self.ram, address, value)
            };
            delegate_poke(bus, address, value);
            return false;
        }
        if self.banks.is_locked() {
            return false;
        }

        match WriteHotspot::decode(address & 0x0FFF) {
            Some(WriteHotspot::DsWrite) => self.ram.write_stream(COMM_STREAM, value),
            Some(WriteHotspot::DsPtr) => self.ram.load_pointer_byte(COMM_STREAM, value),
            Some(WriteHotspot::SetMode) => self.mode = Mode(value),
            Some(WriteHotspot::CallFn) => {
                self.call_function(bus, value);
            }
            Some(WriteHotspot::Bank(index)) => {
                self.bank(bus, index);
            }
            None => {}
        }
        false
    }

    /// Switch to bank `index` (0-6). Fails while locked.
    pub fn bank<B: Bus + ?Sized>(&mut self, bus: &mut B, index: u8) -> bool {
        self.banks.select(bus, index)
    }

    #[must_use]
    pub fn current_bank(&self) -> u8 {
        self.banks.current()
    }

    #[must_use]
    pub fn bank_count(&self) -> u8 {
        BANK_COUNT
    }

    /// Change one ROM byte in the active bank (debugger). The hotspot
    /// window is not patchable.
    pub fn patch(&mut self, address: u16, value: u8) -> bool {
        let offset = address & 0x0FFF;
        if offset < PROTECTED_LIMIT || self.banks.is_locked() {
            return false;
        }
        let at = self.banks.image_offset(offset);
        self.image[at] = value;
        self.banks.mark_changed();
        true
    }

    /// Freeze the cartridge for the debugger: reads have no side effects and
    /// writes are ignored until unlocked.
    pub fn lock_bank(&mut self) {
        self.banks.lock();
    }

    pub fn unlock_bank(&mut self) {
        self.banks.unlock();
    }

    #[must_use]
    pub fn is_bank_locked(&self) -> bool {
        self.banks.is_locked()
    }

    /// Read and clear the flag set whenever the visible ROM changed.
    pub fn take_bank_changed(&mut self) -> bool {
        self.banks.take_changed()
    }

    #[must_use]
    pub fn image(&self) -> &[u8] {
        &self.image[..]
    }

    #[must_use]
    pub fn ram(&self) -> &ChipRam {
        &self.ram
    }

    pub fn ram_mut(&mut self) -> &mut ChipRam {
        &mut self.ram
    }

    #[must_use]
    pub fn music(&self) -> &MusicFetchers {
        &self.music
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Outcome of the most recent `CALLFN` write.
    #[must_use]
    pub fn last_call_outcome(&self) -> Option<&CallOutcome> {
        self.bridge.last_outcome()
    }

    /// The console switched video standard.
    pub fn console_changed(&mut self, timing: ConsoleTiming) {
        self.config.timing = timing;
        self.bridge.set_console_timing(timing);
    }

    /// Call before the host zeroes its cycle counter. Recorded counts become
    /// relative so elapsed time stays correct across the reset.
    pub fn system_cycles_reset<B: Bus>(&mut self, bus: &B) {
        let now = bus.cycles();
        self.system_cycles = self.system_cycles.wrapping_sub(now);
        self.bridge
            .set_arm_cycles(self.bridge.arm_cycles().wrapping_sub(now));
    }

    fn jmp_operand_is_zero(&self, offset: u16) -> bool {
        let at = self.banks.image_offset(offset);
        self.image.get(at + 1) == Some(&0) && self.image.get(at + 2) == Some(&0)
    }

    fn update_music(&mut self, now: u32) {
        let elapsed = now.wrapping_sub(self.system_cycles);
        self.system_cycles = now;
        self.music.tick(elapsed);
    }

    fn call_function<B: Bus>(&mut self, bus: &B, code: u8) -> CallOutcome {
        let memory = CoprocessorMemory {
            rom: &self.image[..],
            ram: self.ram.as_bytes_mut(),
        };
        self.bridge.call(
            code,
            bus.cycles(),
            bus.autodetect_mode(),
            memory,
            &mut self.music,
        )
    }
}

fn delegate_peek<B: VcsBus>(bus: &mut B, address: u16) -> u8 {
    let low = address & 0x03FF;
    if low & 0x0080 != 0 {
        bus.riot().peek(address)
    } else if low & 0x0200 == 0 {
        bus.tia().peek(address)
    } else {
        0
    }
}

fn delegate_poke<B: VcsBus>(bus: &mut B, address: u16, value: u8) {
    let low = address & 0x03FF;
    if low & 0x0080 != 0 {
        bus.riot().poke(address, value);
    } else if low & 0x0200 == 0 {
        bus.tia().poke(address, value);
    }
}
