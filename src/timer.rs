//! Pomodoro phase controller
//!
//! `PhaseController` owns the countdown and the phase cycle. It does not own
//! a clock: an external scheduler calls [`PhaseController::tick`] once per
//! second while [`PhaseController::is_running`] is true.

use crate::config_file::TimerConfig;
use crate::constants::{MSG_LONG_BREAK, MSG_SHORT_BREAK, MSG_WORK};
use crate::utils::format_mm_ss;
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_work(self) -> bool {
        self == Phase::Work
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    /// Message announcing that this phase has begun
    pub fn message(self) -> &'static str {
        match self {
            Phase::Work => MSG_WORK,
            Phase::ShortBreak => MSG_SHORT_BREAK,
            Phase::LongBreak => MSG_LONG_BREAK,
        }
    }
}

/// Whether the tick source should be driving the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not started, reset, or stopped by a phase change awaiting the user
    Idle,
    Running,
    /// Stopped by the user
    Paused,
}

/// Countdown state owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    /// Seconds remaining in the current phase
    pub current_seconds: u32,
    pub phase: Phase,
    /// Work sessions completed since the last long break
    pub work_sessions_count: u32,
}

impl TimerState {
    fn initial(durations: &PhaseDurations) -> Self {
        Self {
            current_seconds: durations.work,
            phase: Phase::Work,
            work_sessions_count: 0,
        }
    }

    pub fn is_work_time(&self) -> bool {
        self.phase.is_work()
    }
}

/// Phase lengths in seconds, copied out of a `TimerConfig`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub work: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub cycles_before_long_break: u32,
}

impl PhaseDurations {
    pub fn of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work,
            Phase::ShortBreak => self.short_break,
            Phase::LongBreak => self.long_break,
        }
    }
}

impl From<&TimerConfig> for PhaseDurations {
    fn from(config: &TimerConfig) -> Self {
        Self {
            work: config.work_seconds(),
            short_break: config.short_break_seconds(),
            long_break: config.long_break_seconds(),
            cycles_before_long_break: config.cycles(),
        }
    }
}

/// A completed phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    /// Message for the user-facing notification
    pub message: &'static str,
    /// Length of the new phase in seconds
    pub seconds: u32,
    pub work_sessions_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The controller is not running; nothing changed
    Stopped,
    Counting { remaining: u32 },
    /// The phase expired on this tick. The controller is now Idle.
    PhaseChanged(Transition),
}

pub struct PhaseController {
    durations: PhaseDurations,
    state: TimerState,
    run_state: RunState,
}

impl PhaseController {
    pub fn new(config: &TimerConfig) -> Self {
        let durations = PhaseDurations::from(config);
        Self {
            durations,
            state: TimerState::initial(&durations),
            run_state: RunState::Idle,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.state.current_seconds
    }

    /// Remaining time as "MM:SS"
    pub fn remaining_display(&self) -> String {
        format_mm_ss(self.state.current_seconds)
    }

    /// Start or resume the countdown
    pub fn start(&mut self) {
        if self.state.current_seconds == 0 {
            self.state.current_seconds = self.durations.of(self.state.phase);
        }
        if self.run_state != RunState::Running {
            info!(
                "{} started with {} remaining",
                self.state.phase.label(),
                self.remaining_display()
            );
        }
        self.run_state = RunState::Running;
    }

    /// Stop the countdown, keeping the remaining time and phase
    pub fn pause(&mut self) {
        if self.run_state == RunState::Running {
            self.run_state = RunState::Paused;
            info!(
                "{} paused at {}",
                self.state.phase.label(),
                self.remaining_display()
            );
        }
    }

    /// Back to the first work phase with a cleared session counter
    pub fn reset(&mut self) {
        self.state = TimerState::initial(&self.durations);
        self.run_state = RunState::Idle;
        info!("Timer reset to {}", self.remaining_display());
    }

    /// Replace the durations and reset
    pub fn apply_config(&mut self, config: &TimerConfig) {
        self.durations = PhaseDurations::from(config);
        debug!("Applied durations: {:?}", self.durations);
        self.reset();
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if self.run_state != RunState::Running {
            return TickOutcome::Stopped;
        }

        self.state.current_seconds = self.state.current_seconds.saturating_sub(1);
        if self.state.current_seconds > 0 {
            return TickOutcome::Counting {
                remaining: self.state.current_seconds,
            };
        }

        TickOutcome::PhaseChanged(self.advance())
    }

    fn advance(&mut self) -> Transition {
        let from = self.state.phase;
        let to = match from {
            Phase::Work => {
                if self.state.work_sessions_count + 1 >= self.durations.cycles_before_long_break {
                    self.state.work_sessions_count = 0;
                    Phase::LongBreak
                } else {
                    self.state.work_sessions_count += 1;
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };

        self.state.phase = to;
        self.state.current_seconds = self.durations.of(to);
        // The tick source stays stopped until the user acknowledges
        self.run_state = RunState::Idle;

        info!(
            "{} finished, {} begins ({} sessions since long break)",
            from.label(),
            to.label(),
            self.state.work_sessions_count
        );

        Transition {
            from,
            to,
            message: to.message(),
            seconds: self.state.current_seconds,
            work_sessions_count: self.state.work_sessions_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debug_config(work: i64, short: i64, long: i64, cycles: i64) -> TimerConfig {
        TimerConfig::new(work, short, long, cycles, true).unwrap()
    }

    /// Tick until the phase changes, returning the transition
    fn run_phase(controller: &mut PhaseController) -> Transition {
        controller.start();
        loop {
            match controller.tick() {
                TickOutcome::PhaseChanged(t) => return t,
                TickOutcome::Counting { .. } => continue,
                TickOutcome::Stopped => panic!("Controller stopped unexpectedly"),
            }
        }
    }

    #[test]
    fn test_initial_state() {
        let controller = PhaseController::new(&TimerConfig::default());
        let state = controller.state();
        assert_eq!(state.current_seconds, 1500);
        assert_eq!(state.phase, Phase::Work);
        assert!(state.is_work_time());
        assert_eq!(state.work_sessions_count, 0);
        assert_eq!(controller.run_state(), RunState::Idle);
        assert_eq!(controller.remaining_display(), "25:00");
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        let mut controller = PhaseController::new(&debug_config(5, 1, 1, 4));
        assert_eq!(controller.tick(), TickOutcome::Stopped);
        assert_eq!(controller.remaining_seconds(), 5);

        controller.start();
        assert_eq!(controller.tick(), TickOutcome::Counting { remaining: 4 });

        controller.pause();
        assert_eq!(controller.tick(), TickOutcome::Stopped);
        assert_eq!(controller.remaining_seconds(), 4);
    }

    #[test]
    fn test_transition_stops_tick_source() {
        let mut controller = PhaseController::new(&debug_config(1, 3, 5, 4));
        let transition = run_phase(&mut controller);

        assert_eq!(transition.from, Phase::Work);
        assert_eq!(transition.to, Phase::ShortBreak);
        assert_eq!(transition.message, "Break time");
        assert_eq!(transition.seconds, 3);
        assert!(!controller.is_running());
        assert_eq!(controller.run_state(), RunState::Idle);

        // No further countdown until started again
        assert_eq!(controller.tick(), TickOutcome::Stopped);
        assert_eq!(controller.remaining_seconds(), 3);
    }

    #[test]
    fn test_long_break_after_configured_cycles() {
        let mut controller = PhaseController::new(&debug_config(2, 1, 3, 4));

        for completed in 1..=3 {
            let to_break = run_phase(&mut controller);
            assert_eq!(to_break.to, Phase::ShortBreak);
            assert_eq!(to_break.work_sessions_count, completed);

            let to_work = run_phase(&mut controller);
            assert_eq!(to_work.to, Phase::Work);
            assert_eq!(to_work.message, "Work time");
        }

        let fourth = run_phase(&mut controller);
        assert_eq!(fourth.to, Phase::LongBreak);
        assert_eq!(fourth.message, "Long break time");
        assert_eq!(fourth.seconds, 3);
        assert_eq!(controller.state().work_sessions_count, 0);
    }

    #[test]
    fn test_single_cycle_always_long_break() {
        let mut controller = PhaseController::new(&debug_config(1, 1, 2, 1));
        assert_eq!(run_phase(&mut controller).to, Phase::LongBreak);
        assert_eq!(run_phase(&mut controller).to, Phase::Work);
        assert_eq!(run_phase(&mut controller).to, Phase::LongBreak);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut controller = PhaseController::new(&debug_config(10, 1, 1, 4));
        controller.start();
        controller.tick();
        controller.tick();

        controller.pause();
        let after_first = controller.state();
        controller.pause();

        assert_eq!(controller.state(), after_first);
        assert_eq!(controller.remaining_seconds(), 8);
        assert_eq!(controller.phase(), Phase::Work);
        assert_eq!(controller.run_state(), RunState::Paused);
    }

    #[test]
    fn test_pause_when_idle_stays_idle() {
        let mut controller = PhaseController::new(&TimerConfig::default());
        controller.pause();
        assert_eq!(controller.run_state(), RunState::Idle);
    }

    #[test]
    fn test_reset_returns_to_work() {
        let mut controller = PhaseController::new(&debug_config(1, 4, 6, 4));
        run_phase(&mut controller);
        controller.start();
        controller.tick();

        controller.reset();

        let state = controller.state();
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.current_seconds, 1);
        assert_eq!(state.work_sessions_count, 0);
        assert_eq!(controller.run_state(), RunState::Idle);
    }

    #[test]
    fn test_apply_config_resets_with_new_durations() {
        let mut controller = PhaseController::new(&TimerConfig::default());
        controller.start();
        controller.tick();

        controller.apply_config(&TimerConfig::new(50, 10, 30, 2, false).unwrap());

        assert_eq!(controller.remaining_seconds(), 3000);
        assert_eq!(controller.durations().cycles_before_long_break, 2);
        assert!(!controller.is_running());
    }

    #[test]
    fn test_start_reloads_empty_phase() {
        let mut controller = PhaseController::new(&debug_config(3, 1, 1, 4));
        controller.state.current_seconds = 0;
        controller.start();
        assert_eq!(controller.remaining_seconds(), 3);
    }
}
