//! DSHOT frame encoding and decoding.
//!
//! A frame is 16 bits sent most-significant first:
//!
//! ```text
//! | 15 ........ 5 |   4   | 3 .. 0 |
//! | value (11 b)  | telem | crc    |
//! ```

use core::fmt;
use core::str::FromStr;

use crate::checksum::{checksum, packet};
use crate::timing::PulseTiming;

/// Number of symbols in a frame.
pub const FRAME_LENGTH: usize = 16;

/// Number of value bits.
pub const VALUE_BITS: u32 = 11;

/// Mask for the 11 value bits.
pub const VALUE_MASK: u16 = (1 << VALUE_BITS) - 1;

/// Lowest throttle value. Values below are reserved for ESC commands.
pub const DSHOT_MIN: u16 = 48;

/// Highest throttle value.
pub const DSHOT_MAX: u16 = 2047;

/// One frame symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    /// Short pulse (logical zero).
    Zero,
    /// Long pulse (logical one).
    One,
}

/// A 16-bit DSHOT frame.
///
/// # Example
///
/// ```
/// use dshot_proto::{Frame, Symbol};
///
/// let frame = Frame::encode(1048, false);
/// assert_eq!(frame.raw(), 0x830B);
/// assert!(frame.is_valid());
/// assert_eq!(frame.symbols().next(), Some(Symbol::One));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame(u16);

impl Frame {
    /// Arming frame: every symbol is a zero.
    pub const IDLE: Self = Self(0);

    /// Encode a throttle value and the telemetry request bit.
    ///
    /// `value` is clamped into `DSHOT_MIN..=DSHOT_MAX`.
    #[must_use]
    pub const fn encode(value: u16, telemetry: bool) -> Self {
        let value = if value < DSHOT_MIN {
            DSHOT_MIN
        } else if value > DSHOT_MAX {
            DSHOT_MAX
        } else {
            value
        };
        let packet = packet(value, telemetry);
        Self((packet << 4) | checksum(packet) as u16)
    }

    /// Wrap a raw 16-bit pattern without validation.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw 16-bit pattern.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// The 11-bit value field.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0 >> 5
    }

    /// The telemetry request bit.
    #[inline]
    #[must_use]
    pub const fn telemetry(self) -> bool {
        (self.0 >> 4) & 1 == 1
    }

    /// The checksum carried in the last four bits.
    #[inline]
    #[must_use]
    pub const fn checksum(self) -> u8 {
        (self.0 & 0x0F) as u8
    }

    /// Recompute the checksum over the first 12 bits and compare.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        checksum(self.0 >> 4) == self.checksum()
    }

    /// Whether this is the all-zero arming frame.
    #[inline]
    #[must_use]
    pub const fn is_idle(self) -> bool {
        self.0 == 0
    }

    /// Symbol at `index`, 0 being the first one on the wire.
    ///
    /// # Panics
    ///
    /// Panics if `index >= FRAME_LENGTH`.
    #[inline]
    #[must_use]
    pub fn symbol(self, index: usize) -> Symbol {
        assert!(index < FRAME_LENGTH, "symbol index out of range");
        if self.0 & (0x8000 >> index) != 0 {
            Symbol::One
        } else {
            Symbol::Zero
        }
    }

    /// Symbols in transmission order.
    pub fn symbols(self) -> impl ExactSizeIterator<Item = Symbol> {
        (0..FRAME_LENGTH).map(move |i| self.symbol(i))
    }

    /// Compare values for every symbol, in transmission order.
    #[must_use]
    pub fn pulse_widths(self, timing: &PulseTiming) -> [u16; FRAME_LENGTH] {
        let mut widths = [0u16; FRAME_LENGTH];
        for (width, symbol) in widths.iter_mut().zip(self.symbols()) {
            *width = timing.width(symbol);
        }
        widths
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)
    }
}

impl fmt::Binary for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

/// Error parsing a frame from its bit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameParseError {
    /// Not 16 symbols (or 16 plus a trailing `0` reset slot).
    Length,
    /// A character other than `0` or `1`.
    Digit,
}

/// Parse a captured bit string such as `"0001000011001101"`.
///
/// Captures that include the trailing reset slot (17 characters ending in
/// `0`) are accepted. The checksum is not verified; use [`Frame::is_valid`].
impl FromStr for Frame {
    type Err = FrameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s.trim().as_bytes();
        let bits = match bits.len() {
            FRAME_LENGTH => bits,
            n if n == FRAME_LENGTH + 1 && bits[FRAME_LENGTH] == b'0' => &bits[..FRAME_LENGTH],
            _ => return Err(FrameParseError::Length),
        };

        let mut raw = 0u16;
        for &b in bits {
            let bit = match b {
                b'0' => 0,
                b'1' => 1,
                _ => return Err(FrameParseError::Digit),
            };
            raw = (raw << 1) | bit;
        }
        Ok(Self(raw))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::timing::REFERENCE_TIMING;
    use std::string::ToString;

    #[test]
    fn test_idle_frame_all_zero_symbols() {
        assert!(Frame::IDLE.symbols().all(|s| s == Symbol::Zero));
        assert!(Frame::IDLE
            .pulse_widths(&REFERENCE_TIMING)
            .iter()
            .all(|&w| w == REFERENCE_TIMING.zero));
    }

    #[test]
    fn test_idle_frame_is_valid() {
        // value 0 is the ESC "stop" command and has a zero checksum
        assert!(Frame::IDLE.is_valid());
        assert!(Frame::IDLE.is_idle());
    }

    #[test]
    fn test_encode_min() {
        let frame = Frame::encode(DSHOT_MIN, false);
        assert_eq!(frame.value(), 48);
        assert!(!frame.telemetry());
        assert!(frame.is_valid());
        assert!(!frame.is_idle());
    }

    #[test]
    fn test_encode_max_value_bits_all_one() {
        let frame = Frame::encode(DSHOT_MAX, false);
        assert!(frame.symbols().take(11).all(|s| s == Symbol::One));
        assert_eq!(frame.symbol(11), Symbol::Zero);
        assert_eq!(frame.checksum(), 0xE);
        assert_eq!(frame.raw(), 0xFFEE);
    }

    #[test]
    fn test_encode_mid_range() {
        // 1048 = 0b100_0001_1000, packet 0x830, crc 8 ^ 3 ^ 0 = 0xB
        let frame = Frame::encode(1048, false);
        assert_eq!(frame.raw(), 0b1000_0011_0000_1011);
        assert_eq!(frame.to_string(), "1000001100001011");
        assert_eq!(std::format!("{:#018b}", frame), "0b1000001100001011");
    }

    #[test]
    fn test_encode_telemetry_bit() {
        let frame = Frame::encode(1048, true);
        assert!(frame.telemetry());
        assert_eq!(frame.symbol(11), Symbol::One);
        assert_eq!(frame.checksum(), 0xA);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_encode_clamps_out_of_range() {
        assert_eq!(Frame::encode(0, false), Frame::encode(DSHOT_MIN, false));
        assert_eq!(Frame::encode(47, false), Frame::encode(DSHOT_MIN, false));
        assert_eq!(Frame::encode(4000, true), Frame::encode(DSHOT_MAX, true));
    }

    #[test]
    fn test_encode_deterministic() {
        for value in [DSHOT_MIN, 500, 1048, DSHOT_MAX] {
            assert_eq!(Frame::encode(value, false), Frame::encode(value, false));
            assert_eq!(Frame::encode(value, true), Frame::encode(value, true));
        }
    }

    #[test]
    fn test_checksum_holds_for_every_value() {
        for value in DSHOT_MIN..=DSHOT_MAX {
            for telemetry in [false, true] {
                let frame = Frame::encode(value, telemetry);
                assert!(frame.is_valid(), "bad checksum for {value}");
                assert_eq!(frame.value(), value);
                assert_eq!(frame.telemetry(), telemetry);
            }
        }
    }

    #[test]
    fn test_corrupted_frame_is_invalid() {
        let frame = Frame::encode(1048, false);
        assert!(!Frame::from_raw(frame.raw() ^ 0x0001).is_valid());
        assert!(!Frame::from_raw(frame.raw() ^ 0x0100).is_valid());
    }

    #[test]
    fn test_pulse_widths_follow_bits() {
        let widths = Frame::encode(1048, false).pulse_widths(&REFERENCE_TIMING);
        let expected = [
            180, 90, 90, 90, 90, 90, 180, 180, 90, 90, 90, 90, 180, 90, 180, 180,
        ];
        assert_eq!(widths, expected);
    }

    #[test]
    fn test_symbols_len() {
        assert_eq!(Frame::IDLE.symbols().len(), FRAME_LENGTH);
    }

    #[test]
    #[should_panic]
    fn test_symbol_out_of_range() {
        let _ = Frame::IDLE.symbol(FRAME_LENGTH);
    }

    #[test]
    fn test_parse_capture() {
        let frame: Frame = "0001000011001101".parse().unwrap();
        assert_eq!(frame.value(), 134);
        assert!(!frame.telemetry());
        assert!(frame.is_valid());
    }

    #[test]
    fn test_parse_capture_with_reset_slot() {
        let frame: Frame = "00010010100010110".parse().unwrap();
        assert_eq!(frame.value(), 148);
        assert_eq!(frame.checksum(), 0b1011);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("0101".parse::<Frame>(), Err(FrameParseError::Length));
        assert_eq!(
            "00010000110011011".parse::<Frame>(),
            Err(FrameParseError::Length)
        );
        assert_eq!(
            "000100001100110x".parse::<Frame>(),
            Err(FrameParseError::Digit)
        );
    }
}
