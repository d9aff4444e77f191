//! Per-cycle transmission scheduling.
//!
//! Every control cycle sends exactly one frame. While the commanded
//! throttle sits at the command minimum the ESC gets the all-zero arming
//! frame; above it, the mapped throttle goes out as a live frame with the
//! telemetry bit clear. There is no acknowledgement on the wire, so a lost
//! frame is simply replaced by the next cycle's.

use dshot_proto::{Frame, ThrottleMapper};

use crate::command::Command;
use crate::emitter::PulseEmitter;
use crate::timer::TimerPeripheral;

/// Which kind of frame a cycle sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Throttle at minimum: hold the ESC armed with idle frames.
    Arming,
    /// Throttle above minimum: send live throttle frames.
    Active,
}

/// Cycle-level state of the rig.
///
/// Owned by the control loop and passed by reference to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RigState {
    /// Commanded throttle in microseconds, already clamped.
    pub throttle_us: u16,
    /// Latest load cell reading.
    pub thrust: f32,
    /// Phase of the last transmitted frame (`None` before the first cycle).
    pub phase: Option<Phase>,
}

impl RigState {
    /// Store the latest load cell reading.
    pub fn record_thrust(&mut self, thrust: f32) {
        self.thrust = thrust;
    }
}

/// Chooses and transmits the frame for each control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmissionScheduler {
    mapper: ThrottleMapper,
}

impl TransmissionScheduler {
    /// Create a scheduler for the given command range.
    #[must_use]
    pub const fn new(mapper: ThrottleMapper) -> Self {
        Self { mapper }
    }

    /// Initial rig state: disarmed, no thrust reading, nothing sent yet.
    #[must_use]
    pub fn initial_state(&self) -> RigState {
        RigState {
            throttle_us: self.mapper.command_min,
            thrust: 0.0,
            phase: None,
        }
    }

    /// Store a throttle command, clamped into the command range.
    pub fn set_throttle(&self, state: &mut RigState, command: i32) {
        state.throttle_us = self.mapper.clamp(command);
    }

    /// Apply an operator command to the rig state.
    ///
    /// Returns `false` for commands the scheduler does not handle
    /// ([`Command::Reboot`]), which are left to the caller.
    pub fn apply(&self, state: &mut RigState, command: Command) -> bool {
        match command {
            Command::Throttle(value) => {
                self.set_throttle(state, value);
                true
            }
            Command::Reboot => false,
        }
    }

    /// Phase for the current state. Level-triggered, no hysteresis.
    #[must_use]
    pub fn phase(&self, state: &RigState) -> Phase {
        if self.mapper.is_minimum(state.throttle_us as i32) {
            Phase::Arming
        } else {
            Phase::Active
        }
    }

    /// Frame for the current state.
    #[must_use]
    pub fn frame(&self, state: &RigState) -> Frame {
        match self.phase(state) {
            Phase::Arming => Frame::IDLE,
            Phase::Active => Frame::encode(self.mapper.map(state.throttle_us as i32), false),
        }
    }

    /// Run one cycle: pick the frame, emit it and record the phase.
    ///
    /// Blocks for one frame time plus up to two periods of alignment.
    pub fn run_cycle<T: TimerPeripheral>(
        &self,
        state: &mut RigState,
        emitter: &mut PulseEmitter<T>,
    ) -> Frame {
        let phase = self.phase(state);
        if state.phase != Some(phase) {
            info!("DSHOT phase {:?} -> {:?}", state.phase, phase);
            state.phase = Some(phase);
        }

        let frame = self.frame(state);
        trace!("throttle {} us -> frame {:?}", state.throttle_us, frame);
        emitter.emit(frame);
        frame
    }
}

impl Default for TransmissionScheduler {
    fn default() -> Self {
        Self::new(ThrottleMapper::default())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::emitter::tests::FakeTimer;
    use dshot_proto::{FRAME_LENGTH, REFERENCE_TIMING};
    use std::vec::Vec;

    fn setup() -> (TransmissionScheduler, RigState, PulseEmitter<FakeTimer>) {
        let scheduler = TransmissionScheduler::default();
        let state = scheduler.initial_state();
        let emitter = PulseEmitter::new(FakeTimer::default(), REFERENCE_TIMING);
        (scheduler, state, emitter)
    }

    #[test]
    fn test_initial_state_is_disarmed() {
        let (scheduler, state, _) = setup();
        assert_eq!(state.throttle_us, 1000);
        assert_eq!(state.phase, None);
        assert_eq!(scheduler.phase(&state), Phase::Arming);
    }

    #[test]
    fn test_minimum_sends_idle_frame() {
        let (scheduler, mut state, mut emitter) = setup();
        emitter.timer_mut().clear();

        let frame = scheduler.run_cycle(&mut state, &mut emitter);

        assert_eq!(frame, Frame::IDLE);
        assert_eq!(state.phase, Some(Phase::Arming));
        let writes = emitter.timer().compare_writes();
        assert!(writes[..FRAME_LENGTH].iter().all(|&w| w == REFERENCE_TIMING.zero));
    }

    #[test]
    fn test_above_minimum_sends_live_frame() {
        let (scheduler, mut state, mut emitter) = setup();
        scheduler.set_throttle(&mut state, 1500);

        let frame = scheduler.run_cycle(&mut state, &mut emitter);

        assert_eq!(frame, Frame::encode(1048, false));
        assert!(!frame.telemetry());
        assert_eq!(state.phase, Some(Phase::Active));
    }

    #[test]
    fn test_full_throttle() {
        let (scheduler, mut state, mut emitter) = setup();
        scheduler.set_throttle(&mut state, 2000);
        let frame = scheduler.run_cycle(&mut state, &mut emitter);
        assert_eq!(frame.value(), 2047);
    }

    #[test]
    fn test_out_of_range_commands_are_clamped() {
        let (scheduler, mut state, _) = setup();

        scheduler.set_throttle(&mut state, 5000);
        assert_eq!(state.throttle_us, 2000);

        scheduler.set_throttle(&mut state, -20);
        assert_eq!(state.throttle_us, 1000);
        assert_eq!(scheduler.frame(&state), Frame::IDLE);
    }

    #[test]
    fn test_just_above_minimum_is_active() {
        let (scheduler, mut state, _) = setup();
        scheduler.set_throttle(&mut state, 1001);
        assert_eq!(scheduler.phase(&state), Phase::Active);
        assert_eq!(scheduler.frame(&state).value(), 50);
    }

    #[test]
    fn test_transitions_are_level_triggered() {
        let (scheduler, mut state, mut emitter) = setup();
        let mut phases = Vec::new();

        for command in [1000, 1200, 1200, 1000, 1001, 1000] {
            scheduler.set_throttle(&mut state, command);
            scheduler.run_cycle(&mut state, &mut emitter);
            phases.push(state.phase);
        }

        assert_eq!(
            phases,
            [
                Some(Phase::Arming),
                Some(Phase::Active),
                Some(Phase::Active),
                Some(Phase::Arming),
                Some(Phase::Active),
                Some(Phase::Arming),
            ]
        );
    }

    #[test]
    fn test_unchanged_command_repeats_frame() {
        let (scheduler, mut state, mut emitter) = setup();
        scheduler.set_throttle(&mut state, 1337);

        let first = scheduler.run_cycle(&mut state, &mut emitter);
        for _ in 0..10 {
            assert_eq!(scheduler.run_cycle(&mut state, &mut emitter), first);
        }
    }

    #[test]
    fn test_each_cycle_takes_one_frame_time_plus_alignment() {
        let (scheduler, mut state, mut emitter) = setup();
        emitter.timer_mut().clear();
        scheduler.set_throttle(&mut state, 1750);

        for _ in 0..3 {
            scheduler.run_cycle(&mut state, &mut emitter);
        }

        assert_eq!(
            emitter.timer().elapsed_ticks,
            3 * (REFERENCE_TIMING.frame_ticks() + 2 * REFERENCE_TIMING.period as u32)
        );
    }

    #[test]
    fn test_record_thrust_keeps_throttle() {
        let (scheduler, mut state, _) = setup();
        scheduler.set_throttle(&mut state, 1300);
        state.record_thrust(-42.5);
        assert_eq!(state.thrust, -42.5);
        assert_eq!(state.throttle_us, 1300);
    }

    #[test]
    fn test_apply_commands() {
        let (scheduler, mut state, _) = setup();

        assert!(scheduler.apply(&mut state, Command::Throttle(1600)));
        assert_eq!(state.throttle_us, 1600);

        assert!(!scheduler.apply(&mut state, Command::Reboot));
        assert_eq!(state.throttle_us, 1600);
    }
}
