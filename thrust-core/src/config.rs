//! Rig configuration.

use dshot_proto::{ThrottleMapper, DEFAULT_MAPPER};

use crate::load_cell::Gain;
use crate::scheduler::TransmissionScheduler;

/// Control loop period in milliseconds.
pub const LOOP_PERIOD_MS: u32 = 10;

/// Operator serial link baud rate.
pub const SERIAL_BAUDRATE: u32 = 921_600;

/// Time the load cell gets to settle before taring, in milliseconds.
pub const LOAD_CELL_SETTLE_MS: u32 = 2_000;

/// Reference rig: raw HX711 counts, uncalibrated.
pub const DEFAULT_CONFIG: RigConfig = RigConfig {
    loop_period_ms: LOOP_PERIOD_MS,
    baudrate: SERIAL_BAUDRATE,
    mapper: DEFAULT_MAPPER,
    load_cell_settle_ms: LOAD_CELL_SETTLE_MS,
    calibration_factor: 1.0,
    load_cell_gain: Gain::ChannelA128,
};

/// Everything the control loop needs to know about the rig.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RigConfig {
    /// One frame and one telemetry line per period.
    pub loop_period_ms: u32,
    pub baudrate: u32,
    /// Operator command range and DSHOT throttle range.
    pub mapper: ThrottleMapper,
    pub load_cell_settle_ms: u32,
    /// Raw counts per reported thrust unit.
    pub calibration_factor: f32,
    pub load_cell_gain: Gain,
}

impl RigConfig {
    /// Scheduler for this rig's throttle range.
    #[must_use]
    pub const fn scheduler(&self) -> TransmissionScheduler {
        TransmissionScheduler::new(self.mapper)
    }

    /// Control cycles spent settling the load cell, at least one.
    #[must_use]
    pub const fn settle_cycles(&self) -> u32 {
        if self.loop_period_ms == 0 {
            return 1;
        }
        let cycles = self.load_cell_settle_ms / self.loop_period_ms;
        if cycles == 0 {
            1
        } else {
            cycles
        }
    }
}

impl Default for RigConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}
