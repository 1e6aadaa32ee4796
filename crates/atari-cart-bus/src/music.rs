//! Music mode data fetchers.
//!
//! Three oscillators clocked at 20 kHz. Each counter gains its frequency
//! once per music clock; the amplitude register turns the counters into a
//! sample, either from packed 4-bit digital audio in ROM or by summing one
//! waveform byte per voice from display RAM.

use emu_core::{FractionalClock, MasterClock};

use crate::coprocessor::{CallbackOp, Callbacks};
use crate::ram::ChipRam;

/// Music oscillator clock.
pub const MUSIC_CLOCK_HZ: u64 = 20_000;
/// ARM address of display RAM; waveform pointers are stored relative to it.
pub const WAVEFORM_ORIGIN: u32 = 0x4000_0800;
/// Waveform size shift on reset: the counter's top 5 bits index the wave.
pub const DEFAULT_WAVEFORM_SIZE: u8 = 27;

/// One oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub counter: u32,
    pub frequency: u32,
    /// Right shift applied to `counter` to index the waveform.
    pub waveform_size: u8,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            counter: 0,
            frequency: 0,
            waveform_size: DEFAULT_WAVEFORM_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MusicFetchers {
    voices: [Voice; 3],
    clock: FractionalClock,
}

impl MusicFetchers {
    #[must_use]
    pub fn new(cpu_clock: MasterClock) -> Self {
        Self {
            voices: [Voice::default(); 3],
            clock: FractionalClock::new(cpu_clock, MUSIC_CLOCK_HZ),
        }
    }

    pub fn reset(&mut self) {
        self.voices = [Voice::default(); 3];
        self.clock.clear();
    }

    #[must_use]
    pub fn voices(&self) -> &[Voice; 3] {
        &self.voices
    }

    pub fn voices_mut(&mut self) -> &mut [Voice; 3] {
        &mut self.voices
    }

    #[must_use]
    pub fn clock(&self) -> &FractionalClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FractionalClock {
        &mut self.clock
    }

    /// Advance the oscillators by `elapsed` CPU cycles.
    pub fn tick(&mut self, elapsed: u32) {
        let whole = self.clock.advance(elapsed);
        if whole == 0 {
            return;
        }
        for voice in &mut self.voices {
            voice.counter = voice
                .counter
                .wrapping_add(voice.frequency.wrapping_mul(whole));
        }
    }

    /// Current amplitude. Pure read: does not advance anything.
    #[must_use]
    pub fn sample(&self, ram: &ChipRam, rom: &[u8], digital: bool) -> u8 {
        if digital {
            // Two samples per byte; counter bit 20 picks the nibble.
            let counter = self.voices[0].counter;
            let index = ram.waveform_pointer(0).wrapping_add(counter >> 21) as usize;
            let packed = rom.get(index).copied().unwrap_or(0);
            let value = if counter & (1 << 20) == 0 {
                packed >> 4
            } else {
                packed
            };
            value & 0x0F
        } else {
            let display = ram.display();
            let sum: u32 = (0u8..3)
                .map(|v| {
                    let voice = &self.voices[usize::from(v)];
                    let step = voice
                        .counter
                        .checked_shr(u32::from(voice.waveform_size))
                        .unwrap_or(0);
                    let index = waveform_base(ram, v).wrapping_add(step) as usize;
                    u32::from(display.get(index).copied().unwrap_or(0))
                })
                .sum();
            sum as u8
        }
    }
}

/// Start of a voice's waveform within display RAM.
///
/// Pointers that do not land in the first 4K of display RAM (including
/// uninitialized ones) read from offset 0.
#[must_use]
pub fn waveform_base(ram: &ChipRam, voice: u8) -> u32 {
    let offset = ram.waveform_pointer(voice).wrapping_sub(WAVEFORM_ORIGIN);
    if offset >= 4096 { 0 } else { offset }
}

impl Callbacks for MusicFetchers {
    fn callback(&mut self, op: CallbackOp, voice: u32, value: u32) -> u32 {
        let Some(v) = usize::try_from(voice)
            .ok()
            .and_then(|i| self.voices.get_mut(i))
        else {
            log::debug!("ARM callback {op:?} for missing voice {voice}");
            return 0;
        };
        match op {
            CallbackOp::SetNote => v.frequency = value,
            CallbackOp::ResetWave => v.counter = 0,
            CallbackOp::GetWavePtr => return v.counter,
            CallbackOp::SetWaveSize => v.waveform_size = value as u8,
        }
        0
    }
}
