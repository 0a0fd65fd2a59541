//! Phase-change notification dispatch
//!
//! The alarm and the confirmation are acquired separately and composed here:
//! the alarm guard lives for exactly the duration of the confirmation, so the
//! sound stops on every way out of [`dispatch_notification`].

use crate::alarm::{Alarm, AlarmGuard};
use anyhow::Result;
use log::{error, info, warn};

/// User's answer to a phase-change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// Restart the countdown in the new phase
    Continue,
    /// Leave the timer stopped
    Pause,
}

/// Blocking, user-acknowledged confirmation
///
/// There is no timeout: `confirm` returns only once the user has answered.
pub trait Notifier {
    /// Show `message`; Ok(true) when accepted, Ok(false) when dismissed
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Play the alarm, ask the user, and stop the alarm again
///
/// A failure to start the alarm is logged and the question is still asked. A
/// failing notifier counts as a dismissal, so the timer never keeps counting
/// without the user's consent.
pub fn dispatch_notification(
    alarm: &dyn Alarm,
    notifier: &dyn Notifier,
    message: &str,
) -> Acknowledgement {
    let _sound: AlarmGuard = alarm.start_loop().unwrap_or_else(|e| {
        warn!("Alarm unavailable: {}", e);
        AlarmGuard::silent()
    });

    match notifier.confirm(message) {
        Ok(true) => {
            info!("Notification \"{}\" accepted", message);
            Acknowledgement::Continue
        }
        Ok(false) => {
            info!("Notification \"{}\" dismissed, timer paused", message);
            Acknowledgement::Pause
        }
        Err(e) => {
            error!("Notification error: {:#}", e);
            Acknowledgement::Pause
        }
    }
}
