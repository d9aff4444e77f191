//! Telemetry line sent to the host once per control cycle.
//!
//! ```text
//! <timestamp_ms>, <throttle_us>, <thrust>\n
//! ```
//!
//! The thrust column is the raw load cell reading truncated to an integer;
//! the host applies its own calibration.

use core::fmt::Write;

use heapless::String;

use crate::scheduler::RigState;

/// Longest possible line: `4294967295, 65535, -2147483648\n`.
pub const MAX_TELEMETRY_LINE: usize = 32;

/// Error type for telemetry formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryError {
    /// The line did not fit the output buffer.
    BufferFull,
}

/// One telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryRecord {
    /// Milliseconds since boot, wrapping.
    pub timestamp_ms: u32,
    /// Commanded throttle in microseconds.
    pub throttle_us: u16,
    /// Load cell reading.
    pub thrust: f32,
}

impl TelemetryRecord {
    /// Snapshot the rig state.
    #[must_use]
    pub fn from_state(timestamp_ms: u32, state: &RigState) -> Self {
        Self {
            timestamp_ms,
            throttle_us: state.throttle_us,
            thrust: state.thrust,
        }
    }

    /// Format the record as one newline-terminated line.
    pub fn write_line(&self) -> Result<String<MAX_TELEMETRY_LINE>, TelemetryError> {
        let mut line = String::new();
        writeln!(
            line,
            "{}, {}, {}",
            self.timestamp_ms, self.throttle_us, self.thrust as i32
        )
        .map_err(|_| TelemetryError::BufferFull)?;
        Ok(line)
    }
}
