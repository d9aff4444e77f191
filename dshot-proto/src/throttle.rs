//! Command-to-DSHOT throttle mapping.
//!
//! Operators send throttle as a servo-style pulse width (1000-2000 us). The
//! mapper clamps that into range and rescales it linearly onto the DSHOT
//! throttle range (48-2047), rounding half up.

use crate::frame::{DSHOT_MAX, DSHOT_MIN};

/// Lowest command value (motor stopped, ESC armed).
pub const COMMAND_MIN: u16 = 1000;

/// Highest command value (full throttle).
pub const COMMAND_MAX: u16 = 2000;

/// Mapping used by the reference rig: 1000-2000 us onto 48-2047.
pub const DEFAULT_MAPPER: ThrottleMapper =
    ThrottleMapper::new(COMMAND_MIN, COMMAND_MAX, DSHOT_MIN, DSHOT_MAX);

/// Affine rescale between a command range and a native DSHOT range.
///
/// All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThrottleMapper {
    /// Lowest command value, also the disarmed level.
    pub command_min: u16,
    /// Highest command value.
    pub command_max: u16,
    /// DSHOT value sent for `command_min`.
    pub native_min: u16,
    /// DSHOT value sent for `command_max`.
    pub native_max: u16,
}

impl ThrottleMapper {
    /// Create a mapper. Reversed bounds are swapped.
    #[must_use]
    pub const fn new(command_min: u16, command_max: u16, native_min: u16, native_max: u16) -> Self {
        let (command_min, command_max) = if command_min <= command_max {
            (command_min, command_max)
        } else {
            (command_max, command_min)
        };
        let (native_min, native_max) = if native_min <= native_max {
            (native_min, native_max)
        } else {
            (native_max, native_min)
        };
        Self {
            command_min,
            command_max,
            native_min,
            native_max,
        }
    }

    /// Clip a raw command into the command range.
    #[inline]
    #[must_use]
    pub fn clamp(&self, command: i32) -> u16 {
        command.clamp(self.command_min as i32, self.command_max as i32) as u16
    }

    /// Whether `command` sits at (or below) the command minimum.
    #[inline]
    #[must_use]
    pub fn is_minimum(&self, command: i32) -> bool {
        self.clamp(command) == self.command_min
    }

    /// Map a raw command onto the native range.
    ///
    /// Total: any input yields a value in `native_min..=native_max`.
    #[must_use]
    pub fn map(&self, command: i32) -> u16 {
        let offset = (self.clamp(command) - self.command_min) as u64;
        let scaled = rescale(
            offset,
            (self.command_max - self.command_min) as u64,
            (self.native_max - self.native_min) as u64,
        );
        self.native_min + scaled
    }

    /// Map a native value back onto the command range.
    ///
    /// Out-of-range native values are clamped first.
    #[must_use]
    pub fn unmap(&self, native: u16) -> u16 {
        let native = native.clamp(self.native_min, self.native_max);
        let scaled = rescale(
            (native - self.native_min) as u64,
            (self.native_max - self.native_min) as u64,
            (self.command_max - self.command_min) as u64,
        );
        self.command_min + scaled
    }
}

impl Default for ThrottleMapper {
    fn default() -> Self {
        DEFAULT_MAPPER
    }
}

/// `round(offset / from_span * to_span)` with halves rounded up.
///
/// `offset <= from_span`, so the result never exceeds `to_span`.
#[inline]
fn rescale(offset: u64, from_span: u64, to_span: u64) -> u16 {
    if from_span == 0 {
        return 0;
    }
    ((2 * offset * to_span + from_span) / (2 * from_span)) as u16
}
