//! DSHOT frame encoding, checksum and throttle mapping.
//!
//! This crate contains everything about the DSHOT wire format that does not
//! touch hardware:
//!
//! - [`throttle`]: Map an operator command (1000-2000 us) onto the DSHOT
//!   throttle range (48-2047) with [`ThrottleMapper`]
//! - [`frame`]: Build, inspect and parse 16-bit [`Frame`]s
//! - [`checksum`]: The 4-bit nibble-XOR checksum
//! - [`timing`]: Pulse widths in timer ticks ([`PulseTiming`])
//!
//! # Frame Format
//!
//! ```text
//! | 11 bits throttle | 1 bit telemetry request | 4 bits checksum |
//! ```
//!
//! Bits go out most-significant first, one timer period per bit. A one is
//! high for 75 % of the period, a zero for 37.5 %.
//!
//! # Example
//!
//! ```
//! use dshot_proto::{Frame, DEFAULT_MAPPER, REFERENCE_TIMING};
//!
//! let native = DEFAULT_MAPPER.map(2000);
//! assert_eq!(native, 2047);
//!
//! let frame = Frame::encode(native, false);
//! assert!(frame.is_valid());
//!
//! let widths = frame.pulse_widths(&REFERENCE_TIMING);
//! assert_eq!(widths[0], 180);
//! assert_eq!(widths[11], 90);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod checksum;
pub mod frame;
pub mod throttle;
pub mod timing;

pub use checksum::{checksum, packet, PACKET_MASK};
pub use frame::{
    Frame, FrameParseError, Symbol, DSHOT_MAX, DSHOT_MIN, FRAME_LENGTH, VALUE_BITS, VALUE_MASK,
};
pub use throttle::{ThrottleMapper, COMMAND_MAX, COMMAND_MIN, DEFAULT_MAPPER};
pub use timing::{BitRate, PulseTiming, REFERENCE_PERIOD, REFERENCE_TIMING};
