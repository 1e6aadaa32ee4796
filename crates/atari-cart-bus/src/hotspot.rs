//! Hotspot decoding and the fetch detectors' state.

/// Sample of the music fetchers.
pub const AMPLITUDE: u16 = 0xFEE;
/// Read the command stream.
pub const DSREAD: u16 = 0xFEF;
/// Write the command stream.
pub const DSWRITE: u16 = 0xFF0;
/// Shift a byte into the command stream's pointer.
pub const DSPTR: u16 = 0xFF1;
pub const SETMODE: u16 = 0xFF2;
/// Run the ARM code.
pub const CALLFN: u16 = 0xFF3;
/// First bank-switch hotspot (bank 0). Banks 0-6 are consecutive.
pub const BANK0: u16 = 0xFF5;
/// Last bank-switch hotspot (bank 6).
pub const BANK6: u16 = 0xFFB;

/// Offsets below this always read ROM: the 6507 boot code and vectors for
/// the ARM live here and must never trigger a detector.
pub const PROTECTED_LIMIT: u16 = 0x40;

/// `JMP abs`. `JMP $0000` is the fast-jump idiom.
pub const JMP_ABS: u8 = 0x4C;
/// `STY zp`. Arms bus stuffing for the store that follows.
pub const STY_ZP: u8 = 0x84;

/// Window registers with an effect on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadHotspot {
    Amplitude,
    DsRead,
    Bank(u8),
}

impl ReadHotspot {
    #[must_use]
    pub const fn decode(offset: u16) -> Option<Self> {
        match offset {
            AMPLITUDE => Some(Self::Amplitude),
            DSREAD => Some(Self::DsRead),
            BANK0..=BANK6 => Some(Self::Bank((offset - BANK0) as u8)),
            _ => None,
        }
    }
}

/// Window registers with an effect on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteHotspot {
    DsWrite,
    DsPtr,
    SetMode,
    CallFn,
    Bank(u8),
}

impl WriteHotspot {
    #[must_use]
    pub const fn decode(offset: u16) -> Option<Self> {
        match offset {
            DSWRITE => Some(Self::DsWrite),
            DSPTR => Some(Self::DsPtr),
            SETMODE => Some(Self::SetMode),
            CALLFN => Some(Self::CallFn),
            BANK0..=BANK6 => Some(Self::Bank((offset - BANK0) as u8)),
            _ => None,
        }
    }
}

/// The `SETMODE` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode(pub u8);

impl Mode {
    /// Everything off. Hardware power-on value is undocumented; drivers
    /// always write `SETMODE` before relying on it.
    pub const RESET: Self = Self(0xFF);

    /// Low nibble 0: fast jump and bus stuffing detectors enabled.
    #[must_use]
    pub const fn bus_stuffing(self) -> bool {
        self.0 & 0x0F == 0
    }

    /// High nibble 0: `AMPLITUDE` plays 4-bit digital samples from ROM.
    #[must_use]
    pub const fn digital_audio(self) -> bool {
        self.0 & 0xF0 == 0
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::RESET
    }
}

/// `JMP FASTJMP` detector. Once a `JMP $0000` opcode fetch is seen, the
/// next two operand fetches are supplied by the jump stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FastJump {
    /// Operand bytes still to be supplied (0-2).
    pub armed: u8,
    /// Offset of the next operand fetch.
    pub operand: u16,
}

impl FastJump {
    /// Arm for an opcode fetched at `offset`.
    pub fn arm(&mut self, offset: u16) {
        self.armed = 2;
        self.operand = offset + 1;
    }

    /// Consume one armed fetch if `offset` is the expected operand.
    pub fn take(&mut self, offset: u16) -> bool {
        if self.armed == 0 || self.operand != offset {
            return false;
        }
        self.armed -= 1;
        self.operand += 1;
        true
    }
}
