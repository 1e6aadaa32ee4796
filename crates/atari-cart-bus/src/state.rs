//! Save states.
//!
//! Field order and widths are fixed; states written by one build load in
//! any other. The ROM image is not saved.

use emu_core::{Bus, Serializer, StateError};

use crate::bank::BANK_COUNT;
use crate::cartridge::Cartridge;
use crate::hotspot::{FastJump, Mode};
use crate::ram::RAM_SIZE;

/// Tag written at the start of every BUS state.
pub const STATE_TAG: &str = "CartridgeBUS";
/// The music clock fraction is stored as an integer in these units.
const FRACTION_SCALE: u64 = 100_000_000;

/// Everything `load` applies, decoded up front so that a bad record leaves
/// the cartridge untouched.
struct Staged {
    bank: u8,
    ram: Box<[u8; RAM_SIZE]>,
    override_pending: u16,
    sty_operand: u16,
    jmp_operand: u16,
    system_cycles: u32,
    fraction: u32,
    arm_cycles: u32,
    counters: [u32; 3],
    frequencies: [u32; 3],
    waveform_sizes: [u8; 3],
    mode: u8,
    fast_jump_armed: u8,
}

impl Staged {
    fn read(input: &mut Serializer) -> Result<Self, StateError> {
        input.expect_tag(STATE_TAG)?;

        let bank = input.get_short()?;
        if bank >= u16::from(BANK_COUNT) {
            return Err(StateError::OutOfRange {
                field: "bank",
                value: u32::from(bank),
            });
        }
        let mut ram = Box::new([0u8; RAM_SIZE]);
        input.get_byte_array(&mut ram[..])?;

        let override_pending = input.get_short()?;
        let sty_operand = input.get_short()?;
        let jmp_operand = input.get_short()?;
        let system_cycles = input.get_int()?;
        let fraction = input.get_int()?;
        let arm_cycles = input.get_int()?;

        let mut counters = [0; 3];
        input.get_int_array(&mut counters)?;
        let mut frequencies = [0; 3];
        input.get_int_array(&mut frequencies)?;
        let mut waveform_sizes = [0; 3];
        input.get_byte_array(&mut waveform_sizes)?;

        let mode = input.get_byte()?;
        let fast_jump_armed = input.get_byte()?;

        Ok(Self {
            bank: bank as u8,
            ram,
            override_pending,
            sty_operand,
            jmp_operand,
            system_cycles,
            fraction,
            arm_cycles,
            counters,
            frequencies,
            waveform_sizes,
            mode,
            fast_jump_armed,
        })
    }
}

impl Cartridge {
    /// Append the cartridge's state to `out`.
    pub fn save(&self, out: &mut Serializer) {
        out.put_string(STATE_TAG);
        out.put_short(u16::from(self.banks.current()));
        out.put_byte_array(self.ram.as_bytes());

        out.put_short(self.overdrive.pending());
        out.put_short(self.sty_operand);
        out.put_short(self.fast_jump.operand);

        out.put_int(self.system_cycles);
        out.put_int(self.music.clock().fraction_scaled(FRACTION_SCALE) as u32);
        out.put_int(self.bridge.arm_cycles());

        let voices = self.music.voices();
        for voice in voices {
            out.put_int(voice.counter);
        }
        for voice in voices {
            out.put_int(voice.frequency);
        }
        for voice in voices {
            out.put_byte(voice.waveform_size);
        }

        out.put_byte(self.mode.0);
        out.put_byte(self.fast_jump.armed);
    }

    /// Restore state written by [`save`](Self::save) and remap the saved
    /// bank. On error nothing is changed.
    pub fn load<B: Bus>(&mut self, input: &mut Serializer, bus: &mut B) -> Result<(), StateError> {
        let staged = Staged::read(input)?;

        self.ram.as_bytes_mut().copy_from_slice(&staged.ram[..]);
        self.overdrive.arm(staged.override_pending);
        self.sty_operand = staged.sty_operand;
        self.fast_jump = FastJump {
            armed: staged.fast_jump_armed,
            operand: staged.jmp_operand,
        };
        self.system_cycles = staged.system_cycles;
        self.music
            .clock_mut()
            .set_fraction_scaled(u64::from(staged.fraction), FRACTION_SCALE);
        self.bridge.set_arm_cycles(staged.arm_cycles);
        for (i, voice) in self.music.voices_mut().iter_mut().enumerate() {
            voice.counter = staged.counters[i];
            voice.frequency = staged.frequencies[i];
            voice.waveform_size = staged.waveform_sizes[i];
        }
        self.mode = Mode(staged.mode);
        self.banks.restore(bus, staged.bank);

        log::trace!("BUS state loaded, bank {}", staged.bank);
        Ok(())
    }

    /// Save into a fresh buffer.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        let mut out = Serializer::new();
        self.save(&mut out);
        out.into_bytes()
    }

    /// Load a buffer produced by [`snapshot`](Self::snapshot).
    pub fn restore<B: Bus>(&mut self, state: &[u8], bus: &mut B) -> Result<(), StateError> {
        self.load(&mut Serializer::from_bytes(state.to_vec()), bus)
    }
}
