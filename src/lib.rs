// Library interface for Tomato
// Shared by the terminal binary, the tray binary and the integration tests

pub mod alarm;
pub mod assets;
pub mod config;
pub mod config_file;
pub mod constants;
pub mod settings;
pub mod timer;
pub mod ui;
pub mod utils;

use alarm::Alarm;
use config_file::TimerConfig;
use log::{error, info};
use settings::SettingsStore;
use timer::{Phase, PhaseController, RunState, TickOutcome, Transition};
use ui::{dispatch_notification, Acknowledgement, Notifier};

/// Result of driving the core by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReport {
    /// Timer not running
    Stopped,
    Counting { remaining: u32 },
    /// A phase ended, the user was notified and answered
    PhaseChanged {
        transition: Transition,
        acknowledgement: Acknowledgement,
    },
}

/// Core Tomato functionality shared between the CLI and the tray app
pub struct TomatoCore {
    store: SettingsStore,
    config: TimerConfig,
    controller: PhaseController,
    notifier: Box<dyn Notifier>,
    alarm: Box<dyn Alarm>,
}

impl TomatoCore {
    /// Load settings from `store` and build an idle controller
    pub fn new(store: SettingsStore, notifier: Box<dyn Notifier>, alarm: Box<dyn Alarm>) -> Self {
        let config = store.load();
        info!(
            "Settings: work={}, short_break={}, long_break={} ({}), cycles={}",
            config.work(),
            config.short_break(),
            config.long_break(),
            config.unit_label(),
            config.cycles()
        );

        Self {
            controller: PhaseController::new(&config),
            store,
            config,
            notifier,
            alarm,
        }
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn run_state(&self) -> RunState {
        self.controller.run_state()
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Remaining time as "MM:SS"
    pub fn remaining_display(&self) -> String {
        self.controller.remaining_display()
    }

    pub fn start(&mut self) {
        self.controller.start();
    }

    pub fn pause(&mut self) {
        self.controller.pause();
    }

    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// Advance the countdown by one second
    ///
    /// When the phase expires the controller stops itself before the blocking
    /// notification is shown, and only restarts if the user accepts it.
    pub fn tick(&mut self) -> TickReport {
        match self.controller.tick() {
            TickOutcome::Stopped => TickReport::Stopped,
            TickOutcome::Counting { remaining } => TickReport::Counting { remaining },
            TickOutcome::PhaseChanged(transition) => {
                let acknowledgement = dispatch_notification(
                    self.alarm.as_ref(),
                    self.notifier.as_ref(),
                    transition.message,
                );
                if acknowledgement == Acknowledgement::Continue {
                    self.controller.start();
                }
                TickReport::PhaseChanged {
                    transition,
                    acknowledgement,
                }
            }
        }
    }

    /// Persist new settings and reset the timer with them
    ///
    /// A failed save is logged; the new settings still apply to this session.
    pub fn update_settings(&mut self, config: TimerConfig) {
        if let Err(e) = self.store.save(&config) {
            error!("Failed to save settings: {}", e);
        }
        self.config = config;
        self.controller.apply_config(&config);
    }
}
