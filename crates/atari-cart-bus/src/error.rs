//! Cartridge construction errors.

use thiserror::Error;

use crate::cartridge::IMAGE_SIZE;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("BUS image is empty")]
    EmptyImage,
    #[error("BUS image is {0} bytes, at most {IMAGE_SIZE} are addressable")]
    ImageTooLarge(usize),
}
