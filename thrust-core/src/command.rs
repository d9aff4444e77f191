//! Operator command line protocol.
//!
//! The host sends one command per line (`\n` terminated, `\r` ignored):
//!
//! ```text
//! 1500\n      -> Command::Throttle(1500)
//! reboot\n    -> Command::Reboot
//! ```
//!
//! Anything that is not a reboot is read like C `atoi`: optional sign,
//! leading digits, the first other character ends the number and a line
//! without digits reads as `0`. Range checking is left to the throttle
//! mapper, which clamps.

use core::future::Future;

use dshot_proto::ThrottleMapper;
use heapless::Vec;

/// Maximum line length, excluding the newline.
pub const MAX_LINE_LENGTH: usize = 32;

/// Prefix of the reset command.
pub const REBOOT_KEYWORD: &[u8] = b"reboot";

/// A parsed operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// New throttle value in microseconds, not yet clamped.
    Throttle(i32),
    /// Reset the device.
    Reboot,
}

impl Command {
    /// The command that returns the rig to the arming phase.
    #[must_use]
    pub const fn disarm(mapper: &ThrottleMapper) -> Self {
        Command::Throttle(mapper.command_min as i32)
    }
}

/// Error type for command input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// UART/communication I/O error.
    Io,
    /// Line longer than [`MAX_LINE_LENGTH`].
    BufferOverflow,
    /// UART framing error.
    Framing,
}

/// Parse one line (line ending optional).
pub fn parse_command(line: &[u8]) -> Command {
    let line = trim(line);
    if line.starts_with(REBOOT_KEYWORD) {
        Command::Reboot
    } else {
        Command::Throttle(parse_int(line))
    }
}

fn trim(mut line: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = line {
        if !first.is_ascii_whitespace() {
            break;
        }
        line = rest;
    }
    while let [rest @ .., last] = line {
        if !last.is_ascii_whitespace() {
            break;
        }
        line = rest;
    }
    line
}

/// `atoi`, saturating instead of overflowing.
fn parse_int(s: &[u8]) -> i32 {
    let (negative, digits) = match s {
        [b'-', rest @ ..] => (true, rest),
        [b'+', rest @ ..] => (false, rest),
        _ => (false, s),
    };

    let mut value: i32 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = (b - b'0') as i32;
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Assembles command lines from a byte stream.
///
/// Over-long lines are dropped up to the next newline and reported once,
/// so one bad line does not corrupt the following ones.
#[derive(Debug, Default)]
pub struct CommandParser {
    buffer: Vec<u8, MAX_LINE_LENGTH>,
    discarding: bool,
}

impl CommandParser {
    /// Create an empty parser.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Feed one byte. Returns a command when a line completes.
    pub fn push_byte(&mut self, byte: u8) -> Result<Option<Command>, InputError> {
        match byte {
            b'\n' => {
                let overflowed = core::mem::take(&mut self.discarding);
                let result = if overflowed {
                    Err(InputError::BufferOverflow)
                } else {
                    Ok(Some(parse_command(&self.buffer)))
                };
                self.buffer.clear();
                result
            }
            b'\r' => Ok(None),
            _ => {
                if !self.discarding && self.buffer.push(byte).is_err() {
                    self.discarding = true;
                }
                Ok(None)
            }
        }
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }
}

/// Async trait for operator command sources.
///
/// Implemented by the firmware over its UART; tests use a scripted mock.
pub trait CommandSource {
    /// Wait for and receive the next command.
    fn receive(&mut self) -> impl Future<Output = Result<Command, InputError>>;
}

/// Receive the next command, turning input errors into a disarm.
///
/// A garbled line must never leave the motor running on a stale throttle.
pub async fn next_command<S: CommandSource>(source: &mut S, mapper: &ThrottleMapper) -> Command {
    match source.receive().await {
        Ok(command) => {
            debug!("command: {:?}", command);
            command
        }
        Err(e) => {
            warn!("command input error: {:?}, disarming", e);
            Command::disarm(mapper)
        }
    }
}
