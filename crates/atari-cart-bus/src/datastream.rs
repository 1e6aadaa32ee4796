//! Datastream fetchers.
//!
//! A datastream is a 32-bit fixed-point cursor into display RAM: the top 12
//! bits address a byte, the low 20 bits are fraction. Reads step by the
//! stream's increment, of which only the low 16 bits (`IIFF`) are wired;
//! writes and jump fetches always step by one whole byte.

use crate::ram::ChipRam;

/// Stream used by `DSREAD`, `DSWRITE` and `DSPTR`.
pub const COMM_STREAM: u8 = 0x10;
/// Stream that supplies `JMP FASTJMP` operands.
pub const JUMP_STREAM: u8 = 0x11;

/// One whole display byte in fixed point.
pub const UNIT_STEP: u32 = 0x0010_0000;

impl ChipRam {
    /// Fetch the byte under a stream's cursor and advance by its increment.
    pub fn read_stream(&mut self, stream: u8) -> u8 {
        let pointer = self.pointer(stream);
        let increment = self.increment(stream) as u16;
        let value = self.display()[(pointer >> 20) as usize];
        self.set_pointer(stream, pointer.wrapping_add(u32::from(increment) << 12));
        value
    }

    /// Fetch the byte under a stream's cursor and advance by one byte.
    pub fn read_stream_unit(&mut self, stream: u8) -> u8 {
        let pointer = self.pointer(stream);
        let value = self.display()[(pointer >> 20) as usize];
        self.set_pointer(stream, pointer.wrapping_add(UNIT_STEP));
        value
    }

    /// Store a byte under a stream's cursor and advance by one byte.
    pub fn write_stream(&mut self, stream: u8, value: u8) {
        let pointer = self.pointer(stream);
        self.display_mut()[(pointer >> 20) as usize] = value;
        self.set_pointer(stream, pointer.wrapping_add(UNIT_STEP));
    }

    /// Shift one more byte into a stream's integer position.
    ///
    /// The pointer register is loaded a byte at a time: each write moves the
    /// previous low integer byte up into the top nibble and drops the
    /// fraction.
    pub fn load_pointer_byte(&mut self, stream: u8, value: u8) {
        let pointer = (self.pointer(stream) << 8) & 0xF000_0000;
        self.set_pointer(stream, pointer | (u32::from(value) << 20));
    }
}
