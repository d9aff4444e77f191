//! DSHOT thrust stand firmware for RP2040.
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives throttle commands over UART (921600 baud, 8N1, one per line)
//! 2. Sends one DSHOT frame to the ESC every 10 ms
//! 3. Samples an HX711 load cell and reports `ms, throttle, thrust` lines
//!
//! # Hardware Configuration
//!
//! | Function  | GPIO | Description |
//! |-----------|------|-------------|
//! | UART1 TX  | 8    | Telemetry output |
//! | UART1 RX  | 9    | Command input |
//! | ESC       | 14   | DSHOT signal (PWM slice 7, channel A) |
//! | HX711 DOUT| 2    | Load cell data |
//! | HX711 SCK | 3    | Load cell clock |
//!
//! # Architecture
//!
//! Two Embassy tasks:
//!
//! - **Command Task**: Reads UART lines, resets on `reboot`, signals throttle
//! - **Control Task**: 10 ms ticker; applies the latest throttle, samples the
//!   load cell, emits one frame and writes the telemetry line
//!
//! The tasks share a [`Signal`](embassy_sync::signal::Signal) with "latest
//! value wins" semantics: commands arriving faster than the loop only keep
//! the newest.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent reset)
//! - **`dshot150`** / **`dshot300`** (default) / **`dshot600`**: DSHOT bit rate

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

#[cfg(any(
    all(feature = "dshot150", feature = "dshot300"),
    all(feature = "dshot150", feature = "dshot600"),
    all(feature = "dshot300", feature = "dshot600"),
))]
compile_error!("Select exactly one of `dshot150`, `dshot300` and `dshot600`");

#[cfg(not(any(feature = "dshot150", feature = "dshot300", feature = "dshot600")))]
compile_error!("No DSHOT bit rate selected, enable one of `dshot150`, `dshot300` and `dshot600`");

use dshot_proto::{BitRate, PulseTiming};

pub mod esc;
pub mod uart_command;

pub use esc::RpPwmTimer;
pub use uart_command::UartCommandSource;

/// Bit rate selected at build time.
#[cfg(feature = "dshot150")]
pub const BIT_RATE: BitRate = BitRate::Dshot150;
#[cfg(feature = "dshot300")]
pub const BIT_RATE: BitRate = BitRate::Dshot300;
#[cfg(feature = "dshot600")]
pub const BIT_RATE: BitRate = BitRate::Dshot600;

/// Pulse timing for the PWM clock (system clock, divider 1).
pub fn pulse_timing() -> PulseTiming {
    PulseTiming::from_clock(embassy_rp::clocks::clk_sys_freq(), BIT_RATE)
}
