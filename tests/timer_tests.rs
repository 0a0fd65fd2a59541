use tomato::config_file::TimerConfig;
use tomato::timer::{Phase, PhaseController, RunState, TickOutcome};

fn debug_config(work: i64, short: i64, long: i64, cycles: i64) -> TimerConfig {
    TimerConfig::new(work, short, long, cycles, true).unwrap()
}

/// Tick until the phase changes, restarting as an accepted notification would
fn run_phase(controller: &mut PhaseController) -> Phase {
    controller.start();
    loop {
        match controller.tick() {
            TickOutcome::PhaseChanged(transition) => return transition.to,
            TickOutcome::Counting { .. } => {}
            TickOutcome::Stopped => panic!("Controller stopped while running"),
        }
    }
}

#[test]
fn test_one_second_phases_with_two_cycles() {
    let mut controller = PhaseController::new(&debug_config(1, 1, 1, 2));
    assert_eq!(controller.phase(), Phase::Work);
    assert_eq!(controller.remaining_display(), "00:01");

    controller.start();
    match controller.tick() {
        TickOutcome::PhaseChanged(transition) => {
            assert_eq!(transition.from, Phase::Work);
            assert_eq!(transition.to, Phase::ShortBreak);
            assert_eq!(transition.message, "Break time");
            assert_eq!(transition.work_sessions_count, 1);
        }
        other => panic!("Expected a phase change, got {:?}", other),
    }
    assert_eq!(controller.run_state(), RunState::Idle);
    assert_eq!(controller.remaining_seconds(), 1);

    assert_eq!(run_phase(&mut controller), Phase::Work);
    assert_eq!(run_phase(&mut controller), Phase::LongBreak);
    assert_eq!(controller.state().work_sessions_count, 0);
    assert_eq!(run_phase(&mut controller), Phase::Work);
}

#[test]
fn test_four_cycles_long_break_after_fourth_work_session() {
    let mut controller = PhaseController::new(&debug_config(2, 1, 3, 4));

    let mut breaks = Vec::new();
    for _ in 0..4 {
        breaks.push(run_phase(&mut controller));
        assert_eq!(run_phase(&mut controller), Phase::Work);
    }

    assert_eq!(
        breaks,
        vec![
            Phase::ShortBreak,
            Phase::ShortBreak,
            Phase::ShortBreak,
            Phase::LongBreak
        ]
    );
    assert_eq!(controller.state().work_sessions_count, 0);
}

#[test]
fn test_minutes_mode_durations() {
    let config = TimerConfig::new(25, 5, 15, 4, false).unwrap();
    let controller = PhaseController::new(&config);
    assert_eq!(controller.remaining_seconds(), 1500);
    assert_eq!(controller.remaining_display(), "25:00");
}

#[test]
fn test_pause_twice_is_same_as_once() {
    let mut controller = PhaseController::new(&debug_config(10, 1, 1, 4));
    controller.start();
    controller.tick();
    controller.tick();

    controller.pause();
    let after_one = (controller.run_state(), controller.state());
    controller.pause();
    assert_eq!((controller.run_state(), controller.state()), after_one);
    assert_eq!(controller.run_state(), RunState::Paused);
    assert_eq!(controller.remaining_seconds(), 8);

    // Ticks while paused change nothing
    assert_eq!(controller.tick(), TickOutcome::Stopped);
    assert_eq!(controller.remaining_seconds(), 8);
}

#[test]
fn test_resume_after_pause_keeps_remaining_time() {
    let mut controller = PhaseController::new(&debug_config(5, 1, 1, 4));
    controller.start();
    controller.tick();
    controller.pause();
    controller.start();
    assert_eq!(controller.tick(), TickOutcome::Counting { remaining: 3 });
}

#[test]
fn test_reset_mid_break() {
    let mut controller = PhaseController::new(&debug_config(1, 5, 5, 4));
    assert_eq!(run_phase(&mut controller), Phase::ShortBreak);
    controller.start();
    controller.tick();

    controller.reset();
    assert_eq!(controller.phase(), Phase::Work);
    assert_eq!(controller.remaining_seconds(), 1);
    assert_eq!(controller.state().work_sessions_count, 0);
    assert_eq!(controller.run_state(), RunState::Idle);
}

#[test]
fn test_apply_config_resets_with_new_durations() {
    let mut controller = PhaseController::new(&debug_config(3, 1, 1, 4));
    controller.start();
    controller.tick();

    controller.apply_config(&TimerConfig::new(50, 10, 20, 2, false).unwrap());
    assert_eq!(controller.run_state(), RunState::Idle);
    assert_eq!(controller.remaining_display(), "50:00");
    assert_eq!(controller.durations().cycles_before_long_break, 2);
}
