//! UART command source.
//!
//! Reads newline-terminated operator commands from UART1 RX (GPIO 9) and
//! hands them to [`CommandParser`].

use embassy_rp::uart::{Async, Error as UartError, UartRx};
use thrust_core::{Command, CommandParser, CommandSource, InputError};

/// Convert UART errors to [`InputError`].
///
/// This is a helper function instead of a `From` impl to avoid orphan rule issues
/// (both `UartError` and `InputError` are defined in external crates).
#[inline]
fn uart_error_to_input_error(e: UartError) -> InputError {
    match e {
        UartError::Framing => InputError::Framing,
        UartError::Overrun => InputError::BufferOverflow,
        _ => InputError::Io,
    }
}

/// Operator commands from a UART receiver.
pub struct UartCommandSource<'d> {
    rx: UartRx<'d, Async>,
    parser: CommandParser,
}

impl<'d> UartCommandSource<'d> {
    #[must_use]
    pub fn new(rx: UartRx<'d, Async>) -> Self {
        Self {
            rx,
            parser: CommandParser::new(),
        }
    }
}

impl CommandSource for UartCommandSource<'_> {
    async fn receive(&mut self) -> Result<Command, InputError> {
        let mut byte = [0u8; 1];

        loop {
            if let Err(e) = self.rx.read(&mut byte).await {
                // The partial line is unreliable after a receive error
                self.parser.reset();
                return Err(uart_error_to_input_error(e));
            }

            if let Some(command) = self.parser.push_byte(byte[0])? {
                return Ok(command);
            }
        }
    }
}
