//! Core traits and types for cycle-accurate emulation.
//!
//! Devices never own the bus they sit on. The host passes itself in on every
//! access, and devices ask it for the cycle count, for page remapping, and
//! for the peripherals they shadow.

mod bus;
mod clock;
mod observable;
mod rewind;
mod serializer;

pub use bus::{Bus, Device, PageAccess};
pub use clock::{FractionalClock, MasterClock};
pub use observable::{Observable, Value};
pub use rewind::RewindBuffer;
pub use serializer::{Serializer, StateError};
