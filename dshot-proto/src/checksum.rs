//! DSHOT frame checksum.
//!
//! The checksum covers the 12-bit packet made of the 11 value bits and the
//! telemetry request bit. It is the XOR of the packet's three nibbles.

use crate::frame::VALUE_MASK;

/// Mask for the 12-bit packet covered by the checksum.
pub const PACKET_MASK: u16 = 0x0FFF;

/// Build the 12-bit packet `(value << 1) | telemetry`.
///
/// Bits of `value` above bit 10 are dropped.
#[inline]
#[must_use]
pub const fn packet(value: u16, telemetry: bool) -> u16 {
    ((value & VALUE_MASK) << 1) | telemetry as u16
}

/// Calculate the 4-bit checksum of a 12-bit packet.
#[inline]
#[must_use]
pub const fn checksum(packet: u16) -> u8 {
    let packet = packet & PACKET_MASK;
    ((packet ^ (packet >> 4) ^ (packet >> 8)) & 0x0F) as u8
}
