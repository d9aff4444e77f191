//! Pulse widths for the DSHOT wire format.
//!
//! Every symbol occupies one timer period. A "one" is high for 75 % of the
//! period and a "zero" for 37.5 %; the ratios are fixed by the protocol, the
//! period in ticks depends on the timer clock and the bit rate.

use crate::frame::Symbol;

/// Period used by the reference rig, in timer ticks (72 MHz / 300 kbit/s).
pub const REFERENCE_PERIOD: u16 = 240;

/// Pulse timing of the reference rig: 180/240 for a one, 90/240 for a zero.
pub const REFERENCE_TIMING: PulseTiming = PulseTiming::from_period(REFERENCE_PERIOD);

/// DSHOT bit rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitRate {
    /// 150 kbit/s
    Dshot150,
    /// 300 kbit/s
    Dshot300,
    /// 600 kbit/s
    Dshot600,
}

impl BitRate {
    /// Bits per second on the wire.
    #[inline]
    #[must_use]
    pub const fn bits_per_second(self) -> u32 {
        match self {
            BitRate::Dshot150 => 150_000,
            BitRate::Dshot300 => 300_000,
            BitRate::Dshot600 => 600_000,
        }
    }
}

/// Timer values for one symbol slot, all in timer ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTiming {
    /// Length of one symbol slot.
    pub period: u16,
    /// High time of a "one" symbol.
    pub one: u16,
    /// High time of a "zero" symbol.
    pub zero: u16,
}

impl PulseTiming {
    /// Derive the symbol widths from a period.
    #[must_use]
    pub const fn from_period(period: u16) -> Self {
        let p = period as u32;
        Self {
            period,
            one: (p * 3 / 4) as u16,
            zero: (p * 3 / 8) as u16,
        }
    }

    /// Derive the timing for a timer counting at `timer_hz`.
    ///
    /// The period always fits 16 bits: even `u32::MAX` Hz at 150 kbit/s is
    /// under 29k ticks.
    #[must_use]
    pub const fn from_clock(timer_hz: u32, rate: BitRate) -> Self {
        Self::from_period((timer_hz / rate.bits_per_second()) as u16)
    }

    /// Compare value for a symbol.
    #[inline]
    #[must_use]
    pub const fn width(&self, symbol: Symbol) -> u16 {
        match symbol {
            Symbol::One => self.one,
            Symbol::Zero => self.zero,
        }
    }

    /// Duration of a whole frame in timer ticks.
    #[inline]
    #[must_use]
    pub const fn frame_ticks(&self) -> u32 {
        self.period as u32 * crate::frame::FRAME_LENGTH as u32
    }
}

impl Default for PulseTiming {
    fn default() -> Self {
        REFERENCE_TIMING
    }
}
