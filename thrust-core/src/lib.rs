//! Platform-agnostic thrust stand control.
//!
//! This crate drives an ESC with DSHOT frames from operator throttle
//! commands and reports load cell thrust, without touching any specific
//! chip. Firmware crates supply a [`TimerPeripheral`], a [`CommandSource`]
//! and the HX711 pins; everything else lives here and runs on the host
//! for testing.
//!
//! - [`command`]: Operator line protocol ([`CommandParser`], [`CommandSource`])
//! - [`scheduler`]: One frame per control cycle ([`TransmissionScheduler`], [`RigState`])
//! - [`emitter`]: Frame to timer compare writes ([`PulseEmitter`])
//! - [`timer`]: Hardware timer abstraction ([`TimerPeripheral`])
//! - [`load_cell`]: HX711 driver and averaging ([`Hx711`], [`LoadCell`])
//! - [`telemetry`]: Per-cycle report line ([`TelemetryRecord`])
//! - [`config`]: Rig parameters ([`RigConfig`])
//!
//! # Example
//!
//! ```rust
//! use thrust_core::{parse_command, Phase, RigConfig};
//!
//! let config = RigConfig::default();
//! let scheduler = config.scheduler();
//! let mut state = scheduler.initial_state();
//!
//! assert!(scheduler.apply(&mut state, parse_command(b"1500\n")));
//! assert_eq!(scheduler.phase(&state), Phase::Active);
//! assert_eq!(scheduler.frame(&state).raw(), 0x830B);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//! - **`log`**: Log through the `log` facade instead

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod command;
pub mod config;
pub mod emitter;
pub mod load_cell;
pub mod scheduler;
pub mod telemetry;
pub mod timer;

pub use command::{
    next_command, parse_command, Command, CommandParser, CommandSource, InputError,
    MAX_LINE_LENGTH, REBOOT_KEYWORD,
};
pub use config::{RigConfig, DEFAULT_CONFIG, LOOP_PERIOD_MS, SERIAL_BAUDRATE};
pub use emitter::PulseEmitter;
pub use load_cell::{Gain, Hx711, LoadCell, LoadCellError, RawSensor, SMOOTHING_SAMPLES};
pub use scheduler::{Phase, RigState, TransmissionScheduler};
pub use telemetry::{TelemetryError, TelemetryRecord, MAX_TELEMETRY_LINE};
pub use timer::TimerPeripheral;
