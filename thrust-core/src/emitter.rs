//! PulseEmitter: reproduces a DSHOT frame on a timer channel.

use dshot_proto::{Frame, PulseTiming};

use crate::timer::TimerPeripheral;

/// Drives a [`TimerPeripheral`] to put frames on the wire.
///
/// The counter runs continuously with a zero compare value between frames.
/// A frame starts on a period boundary; each symbol's width is queued one
/// period ahead and latched by the counter on the boundary, so software
/// latency never stretches a symbol. After the last symbol a zero compare
/// value is latched the same way and the line stays low.
///
/// The emitter owns the timer; nothing else writes to it while a frame is
/// going out. Interrupts must not delay the emitter by a full period, so
/// callers on a target run [`emit`](PulseEmitter::emit) in a critical section.
pub struct PulseEmitter<T> {
    timer: T,
    timing: PulseTiming,
}

impl<T: TimerPeripheral> PulseEmitter<T> {
    /// Program the period, park the line low and start the counter.
    pub fn new(mut timer: T, timing: PulseTiming) -> Self {
        timer.set_period(timing.period);
        timer.set_compare(0);
        timer.force_reload();
        timer.enable_output();
        Self { timer, timing }
    }

    /// Transmit one frame.
    ///
    /// Blocks for `FRAME_LENGTH + 2` periods at most: one to align with a
    /// boundary, one while the first width is pending, then the symbols.
    pub fn emit(&mut self, frame: Frame) {
        self.timer.wait_period();

        for symbol in frame.symbols() {
            self.timer.set_compare(self.timing.width(symbol));
            self.timer.wait_period();
        }

        self.timer.set_compare(0);
        self.timer.wait_period();
    }

    /// Get a reference to the timer.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Get a mutable reference to the timer.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}
