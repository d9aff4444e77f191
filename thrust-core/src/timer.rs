//! Timer peripheral trait for DSHOT pulse generation.

/// A free-running counter with one compare channel driving the ESC line.
///
/// All values are in timer ticks. The output is high from the start of each
/// period until the counter reaches the compare value, so the compare value
/// is the pulse width.
///
/// Period and compare values are double-buffered: while the counter runs,
/// a new value is latched at the next period boundary, never mid-period.
///
/// Implementations exist per target (see the RP2040 firmware); tests use a
/// recording fake and a tick-level model of a counter.
pub trait TimerPeripheral {
    /// Program the period (one symbol slot).
    fn set_period(&mut self, ticks: u16);

    /// Program the compare value for the next period.
    fn set_compare(&mut self, ticks: u16);

    /// Stop the counter, apply pending period and compare values now and
    /// restart the count at zero. Only used while the output is idle.
    fn force_reload(&mut self);

    /// Connect the timer channel to the output pin and start counting.
    fn enable_output(&mut self);

    /// Block until the next period boundary.
    ///
    /// Boundaries that passed before the call do not count.
    fn wait_period(&mut self);
}

impl<T: TimerPeripheral + ?Sized> TimerPeripheral for &mut T {
    #[inline]
    fn set_period(&mut self, ticks: u16) {
        (**self).set_period(ticks);
    }

    #[inline]
    fn set_compare(&mut self, ticks: u16) {
        (**self).set_compare(ticks);
    }

    #[inline]
    fn force_reload(&mut self) {
        (**self).force_reload();
    }

    #[inline]
    fn enable_output(&mut self) {
        (**self).enable_output();
    }

    #[inline]
    fn wait_period(&mut self) {
        (**self).wait_period();
    }
}
