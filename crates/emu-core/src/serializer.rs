//! Typed byte stream for save states.
//!
//! Fields are written in a fixed order with fixed widths, little-endian.
//! Strings carry a `u32` length prefix. Readers consume fields in the same
//! order and fail on the first field that runs past the end of the data.

use thiserror::Error;

/// Errors raised while decoding a saved state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("state truncated: needed {needed} bytes at offset {offset}, {remaining} left")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("state belongs to {found:?}, expected {expected:?}")]
    TagMismatch { expected: String, found: String },
    #[error("state string at offset {offset} is not valid UTF-8")]
    InvalidString { offset: usize },
    #[error("state field {field} holds out-of-range value {value}")]
    OutOfRange { field: &'static str, value: u32 },
}

/// An in-memory save-state stream with a read cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Serializer {
    data: Vec<u8>,
    pos: usize,
}

impl Serializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap previously saved bytes for reading.
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn put_byte(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn put_short(&mut self, value: u16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_int(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_string(&mut self, value: &str) {
        self.put_int(value.len() as u32);
        self.data.extend_from_slice(value.as_bytes());
    }

    pub fn put_byte_array(&mut self, values: &[u8]) {
        self.data.extend_from_slice(values);
    }

    pub fn put_int_array(&mut self, values: &[u32]) {
        for &v in values {
            self.put_int(v);
        }
    }

    fn take(&mut self, needed: usize) -> Result<&[u8], StateError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(StateError::Truncated {
                offset: self.pos,
                needed,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += needed;
        Ok(&self.data[start..self.pos])
    }

    pub fn get_byte(&mut self) -> Result<u8, StateError> {
        Ok(self.take(1)?[0])
    }

    pub fn get_short(&mut self) -> Result<u16, StateError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn get_int(&mut self) -> Result<u32, StateError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn get_string(&mut self) -> Result<String, StateError> {
        let len = self.get_int()? as usize;
        let offset = self.pos;
        let bytes = self.take(len)?.to_vec();
        String::from_utf8(bytes).map_err(|_| StateError::InvalidString { offset })
    }

    pub fn get_byte_array(&mut self, out: &mut [u8]) -> Result<(), StateError> {
        let b = self.take(out.len())?;
        out.copy_from_slice(b);
        Ok(())
    }

    pub fn get_int_array(&mut self, out: &mut [u32]) -> Result<(), StateError> {
        for v in out.iter_mut() {
            *v = self.get_int()?;
        }
        Ok(())
    }

    /// Read a string and check it against the expected type tag.
    pub fn expect_tag(&mut self, expected: &str) -> Result<(), StateError> {
        let found = self.get_string()?;
        if found == expected {
            Ok(())
        } else {
            Err(StateError::TagMismatch {
                expected: expected.to_string(),
                found,
            })
        }
    }
}
