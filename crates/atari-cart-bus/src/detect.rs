//! Format detection.

use crate::ram::DRIVER_SIZE;

const SIGNATURE: &[u8] = b"BUS";

/// True if `image` looks like a BUS cartridge: the C code and banks carry
/// the scheme name at least twice. The driver is skipped because it is
/// shared with other Harmony schemes.
#[must_use]
pub fn is_probably_bus(image: &[u8]) -> bool {
    let Some(body) = image.get(DRIVER_SIZE..) else {
        return false;
    };
    body.windows(SIGNATURE.len())
        .filter(|w| *w == SIGNATURE)
        .take(2)
        .count()
        == 2
}
