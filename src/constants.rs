//! Centralized constants for the Tomato application
//!
//! This module contains the numerical bounds, defaults, file names and user
//! facing strings used throughout the application. Each constant documents its
//! purpose and unit.

// ============================================================================
// APPLICATION
// ============================================================================

/// Application name used for window titles, dialog titles and banners.
pub const APP_NAME: &str = "Tomato";

// ============================================================================
// SETTINGS BOUNDS
// ============================================================================

/// Minimum duration accepted for work, short break and long break.
/// Unit: minutes (seconds in debug mode)
pub const DURATION_MIN: i64 = 1;

/// Maximum duration accepted for work, short break and long break.
/// Unit: minutes (seconds in debug mode)
pub const DURATION_MAX: i64 = 59;

/// Minimum number of work sessions before a long break.
pub const CYCLES_MIN: i64 = 1;

/// Maximum number of work sessions before a long break.
pub const CYCLES_MAX: i64 = 9;

// ============================================================================
// SETTINGS DEFAULTS
// ============================================================================

/// Default work phase length.
/// Unit: minutes
pub const DEFAULT_WORK: u32 = 25;

/// Default short break length.
/// Unit: minutes
pub const DEFAULT_SHORT_BREAK: u32 = 5;

/// Default long break length.
/// Unit: minutes
pub const DEFAULT_LONG_BREAK: u32 = 15;

/// Default number of work sessions before a long break.
pub const DEFAULT_CYCLES: u32 = 4;

/// Default debug flag (durations read as minutes).
pub const DEFAULT_DEBUG: bool = false;

/// Multiplier applied to durations outside debug mode.
/// Unit: seconds per minute
pub const SECONDS_PER_MINUTE: u32 = 60;

// ============================================================================
// SETTINGS FILE
// ============================================================================

/// Directory created under the per-user config directory.
pub const SETTINGS_DIR_NAME: &str = "Tomato";

/// Settings file name (five positional lines).
pub const SETTINGS_FILE_NAME: &str = "Settings.cfg";

/// Suffix of the sibling file written before the atomic rename.
pub const SETTINGS_TEMP_SUFFIX: &str = "tmp";

// ============================================================================
// TICK & POLLING INTERVALS
// ============================================================================

/// Period of the tick source driving the countdown.
/// Unit: milliseconds
pub const TICK_INTERVAL_MS: u64 = 1000;

/// How often the alarm loop checks the player process and the stop flag.
/// Unit: milliseconds
/// Recommended range: 20-200 (bounds how long releasing the alarm can take)
pub const ALARM_POLL_INTERVAL_MS: u64 = 50;

// ============================================================================
// NOTIFICATIONS
// ============================================================================

/// Banner display duration for phase changes.
/// Unit: milliseconds
pub const NOTIFICATION_TIMEOUT_MS: u32 = 5000;

/// Message shown when a work phase ends and a short break begins.
pub const MSG_SHORT_BREAK: &str = "Break time";

/// Message shown when a work phase ends and a long break begins.
pub const MSG_LONG_BREAK: &str = "Long break time";

/// Message shown when a break ends.
pub const MSG_WORK: &str = "Work time";

// ============================================================================
// SETTINGS FORM
// ============================================================================

/// Error shown when a settings field is not a number.
pub const FORM_INVALID_NUMBER: &str = "Please enter valid numbers";

/// Dialog title for FORM_INVALID_NUMBER.
pub const FORM_INVALID_NUMBER_TITLE: &str = "Input Error";

/// Error shown when settings are outside their bounds.
pub const FORM_OUT_OF_RANGE: &str = "Values must be between 1-59 for times and 1-9 for cycles";

/// Dialog title for FORM_OUT_OF_RANGE.
pub const FORM_OUT_OF_RANGE_TITLE: &str = "Invalid Settings";

// ============================================================================
// ASSETS
// ============================================================================

/// Directory holding the assets, relative to the executable or working dir.
pub const ASSETS_DIR_NAME: &str = "assets";

/// Work phase icon.
pub const WORK_ICON_FILE: &str = "Tomato.png";

/// Break phase icon (short and long break).
pub const BREAK_ICON_FILE: &str = "Green tomato.png";

/// Alarm clip looped while a phase-change dialog is open.
pub const ALARM_CLIP_FILE: &str = "Alarm.wav";

/// Edge length of the tray icon.
/// Unit: pixels
pub const TRAY_ICON_SIZE: u32 = 32;
