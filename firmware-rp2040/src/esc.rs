//! DSHOT output on an RP2040 PWM slice.
//!
//! The slice counts `0..=top` at the system clock and drives channel A high
//! while the counter is below `compare_a`, so `top + 1` is the bit period
//! and `compare_a` the pulse width. CC and TOP are double-buffered while the
//! slice runs and latch on the wrap, which is what lets the emitter queue
//! each width one period ahead. They latch immediately while the slice is
//! stopped; only a reload from idle stops it.

use embassy_rp::pwm::{Config, Pwm};
use fixed::types::U12F4;
use fixed_macro::fixed;
use thrust_core::TimerPeripheral;

/// PWM runs at the full system clock.
pub const PWM_DIVIDER: U12F4 = fixed!(1: U12F4);

/// [`TimerPeripheral`] over channel A of one PWM slice.
pub struct RpPwmTimer<'d> {
    pwm: Pwm<'d>,
    config: Config,
}

impl<'d> RpPwmTimer<'d> {
    /// Stopped slice, output low. Pass this to `Pwm::new_output_a`.
    pub fn idle_config() -> Config {
        let mut config = Config::default();
        config.divider = PWM_DIVIDER;
        config.compare_a = 0;
        config.enable = false;
        config
    }

    /// Take over a slice created with [`RpPwmTimer::idle_config`].
    pub fn new(pwm: Pwm<'d>) -> Self {
        Self {
            pwm,
            config: Self::idle_config(),
        }
    }
}

impl TimerPeripheral for RpPwmTimer<'_> {
    fn set_period(&mut self, ticks: u16) {
        self.config.top = ticks.saturating_sub(1);
    }

    fn set_compare(&mut self, ticks: u16) {
        self.config.compare_a = ticks;
        // Buffered until the next wrap while running
        self.pwm.set_config(&self.config);
    }

    fn force_reload(&mut self) {
        let enable = self.config.enable;

        self.config.enable = false;
        self.pwm.set_config(&self.config);
        self.pwm.set_counter(0);
        self.pwm.clear_wrapped();

        if enable {
            self.config.enable = true;
            self.pwm.set_config(&self.config);
        }
    }

    fn enable_output(&mut self) {
        self.config.enable = true;
        self.pwm.set_config(&self.config);
    }

    fn wait_period(&mut self) {
        self.pwm.clear_wrapped();
        while !self.pwm.wrapped() {
            core::hint::spin_loop();
        }
    }
}
