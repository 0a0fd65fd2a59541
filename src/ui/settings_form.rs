//! Settings form shared by the terminal and tray front ends
//!
//! The form holds the raw text the user typed. [`SettingsForm::submit`]
//! either yields a valid `TimerConfig` or a [`FormError`] whose message is
//! shown while the form stays open. The debug flag is an ordinary field: it
//! is only persisted when the whole form is submitted and saved.

use crate::config_file::TimerConfig;
use crate::constants::{
    FORM_INVALID_NUMBER, FORM_INVALID_NUMBER_TITLE, FORM_OUT_OF_RANGE, FORM_OUT_OF_RANGE_TITLE,
};
use crate::settings::SettingsStore;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Work,
    ShortBreak,
    LongBreak,
    Cycles,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Work,
        FormField::ShortBreak,
        FormField::LongBreak,
        FormField::Cycles,
    ];

    /// Label shown next to the field; durations carry their unit
    pub fn label(self, debug: bool) -> String {
        let unit = if debug { "sec" } else { "min" };
        match self {
            FormField::Work => format!("Work time ({}):", unit),
            FormField::ShortBreak => format!("Short break ({}):", unit),
            FormField::LongBreak => format!("Long break ({}):", unit),
            FormField::Cycles => "Cycles:".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter valid numbers")]
    InvalidNumber { field: FormField, value: String },

    #[error("Values must be between 1-59 for times and 1-9 for cycles")]
    OutOfRange,
}

impl FormError {
    /// Dialog title for this error
    pub fn title(&self) -> &'static str {
        match self {
            FormError::InvalidNumber { .. } => FORM_INVALID_NUMBER_TITLE,
            FormError::OutOfRange => FORM_OUT_OF_RANGE_TITLE,
        }
    }

    /// Dialog body for this error
    pub fn message(&self) -> &'static str {
        match self {
            FormError::InvalidNumber { .. } => FORM_INVALID_NUMBER,
            FormError::OutOfRange => FORM_OUT_OF_RANGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub work: String,
    pub short_break: String,
    pub long_break: String,
    pub cycles: String,
    pub debug: bool,
}

impl SettingsForm {
    /// Form pre-filled with the current settings
    pub fn from_config(config: &TimerConfig) -> Self {
        Self {
            work: config.work().to_string(),
            short_break: config.short_break().to_string(),
            long_break: config.long_break().to_string(),
            cycles: config.cycles().to_string(),
            debug: config.debug(),
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Work => &self.work,
            FormField::ShortBreak => &self.short_break,
            FormField::LongBreak => &self.long_break,
            FormField::Cycles => &self.cycles,
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Work => self.work = value,
            FormField::ShortBreak => self.short_break = value,
            FormField::LongBreak => self.long_break = value,
            FormField::Cycles => self.cycles = value,
        }
    }

    /// Flip the debug flag in the form only
    pub fn toggle_debug(&mut self) -> bool {
        self.debug = !self.debug;
        self.debug
    }

    /// Parse and validate every field
    ///
    /// All four numbers are parsed before any bounds are checked, so a typo
    /// is always reported as such.
    pub fn submit(&self) -> Result<TimerConfig, FormError> {
        let work = parse_field(FormField::Work, &self.work)?;
        let short_break = parse_field(FormField::ShortBreak, &self.short_break)?;
        let long_break = parse_field(FormField::LongBreak, &self.long_break)?;
        let cycles = parse_field(FormField::Cycles, &self.cycles)?;

        if !SettingsStore::validate(work, short_break, long_break, cycles) {
            return Err(FormError::OutOfRange);
        }

        TimerConfig::new(work, short_break, long_break, cycles, self.debug)
            .map_err(|_| FormError::OutOfRange)
    }
}

fn parse_field(field: FormField, value: &str) -> Result<i64, FormError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| FormError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(work: &str, short: &str, long: &str, cycles: &str) -> SettingsForm {
        SettingsForm {
            work: work.to_string(),
            short_break: short.to_string(),
            long_break: long.to_string(),
            cycles: cycles.to_string(),
            debug: false,
        }
    }

    #[test]
    fn test_from_config_roundtrip() {
        let config = TimerConfig::new(40, 8, 20, 3, true).unwrap();
        let form = SettingsForm::from_config(&config);
        assert_eq!(form.work, "40");
        assert!(form.debug);
        assert_eq!(form.submit(), Ok(config));
    }

    #[test]
    fn test_submit_non_numeric() {
        let result = form("25", "five", "15", "4").submit();
        match result {
            Err(e) => {
                assert_eq!(e.title(), "Input Error");
                assert_eq!(e.message(), "Please enter valid numbers");
                assert!(matches!(
                    e,
                    FormError::InvalidNumber {
                        field: FormField::ShortBreak,
                        ..
                    }
                ));
            }
            Ok(_) => panic!("Non-numeric input should be rejected"),
        }
    }

    #[test]
    fn test_submit_out_of_range() {
        let result = form("25", "5", "60", "4").submit();
        assert_eq!(result, Err(FormError::OutOfRange));
        assert_eq!(FormError::OutOfRange.title(), "Invalid Settings");
        assert_eq!(
            FormError::OutOfRange.to_string(),
            "Values must be between 1-59 for times and 1-9 for cycles"
        );
    }

    #[test]
    fn test_typo_reported_before_range() {
        // Cycles is a typo, work is out of range: the typo wins
        let result = form("99", "5", "15", "x").submit();
        assert!(matches!(result, Err(FormError::InvalidNumber { .. })));
    }

    #[test]
    fn test_submit_trims_whitespace() {
        let config = form(" 30", "5 ", "15", "2").submit().unwrap();
        assert_eq!(config.work(), 30);
        assert_eq!(config.cycles(), 2);
    }

    #[test]
    fn test_toggle_debug_is_form_local() {
        let mut form = SettingsForm::from_config(&TimerConfig::default());
        assert!(form.toggle_debug());
        assert!(form.submit().unwrap().debug());
        assert!(!form.toggle_debug());
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(FormField::Work.label(false), "Work time (min):");
        assert_eq!(FormField::LongBreak.label(true), "Long break (sec):");
        assert_eq!(FormField::Cycles.label(true), "Cycles:");
    }

    #[test]
    fn test_set_field() {
        let mut form = SettingsForm::from_config(&TimerConfig::default());
        for field in FormField::ALL {
            form.set_field(field, "7");
        }
        assert_eq!(form.field(FormField::LongBreak), "7");
        assert_eq!(form.submit().unwrap().short_break(), 7);
    }
}
