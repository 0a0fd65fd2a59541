use crate::constants::{APP_NAME, NOTIFICATION_TIMEOUT_MS};
use crate::timer::Transition;
use log::debug;

/// Show a non-blocking desktop banner for a phase change
pub fn show_phase_banner(transition: &Transition) {
    let result = notify_rust::Notification::new()
        .summary(APP_NAME)
        .body(&format!(
            "{}\n{} finished, {} begins",
            transition.message,
            transition.from.label(),
            transition.to.label()
        ))
        .timeout(notify_rust::Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS))
        .show();

    // Banners are cosmetic; the blocking dialog is what the user answers
    if let Err(e) = result {
        debug!("Failed to show banner: {}", e);
    }
}
