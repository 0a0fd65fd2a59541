//! Timer settings record and its on-disk encodings
//!
//! `TimerConfig` can only be built through [`TimerConfig::new`] (or
//! `Default`), so every value in circulation satisfies the bounds. The
//! encodings live behind [`SettingsFormat`]; the five-line positional record
//! is the default and TOML is available as an alternative.

use crate::constants::{
    CYCLES_MAX, CYCLES_MIN, DEFAULT_CYCLES, DEFAULT_DEBUG, DEFAULT_LONG_BREAK,
    DEFAULT_SHORT_BREAK, DEFAULT_WORK, DURATION_MAX, DURATION_MIN, SECONDS_PER_MINUTE,
};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Names of the positional lines, in file order
pub const FIELD_NAMES: [&str; 5] = ["work", "short_break", "long_break", "cycles", "debug"];

/// Errors raised while reading, validating or writing settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file not found at {0:?}")]
    NotFound(PathBuf),

    #[error("settings line {line} ({field}) is missing")]
    MissingField { line: usize, field: &'static str },

    #[error("settings line {line} ({field}) has invalid value {value:?}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("malformed settings: {0}")]
    Malformed(String),

    #[error(
        "settings out of range (work={work}, short_break={short_break}, long_break={long_break}, cycles={cycles}); times must be 1-59 and cycles 1-9"
    )]
    OutOfRange {
        work: i64,
        short_break: i64,
        long_break: i64,
        cycles: i64,
    },

    #[error("failed to {action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SettingsError {
    /// True for a missing, truncated or unparsable record
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::MissingField { .. }
                | Self::InvalidField { .. }
                | Self::Malformed(_)
        )
    }

    /// True for a well-formed record with out-of-bounds values
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

/// Check the bounds of the four integer settings
///
/// Work, short break and long break must be within 1-59 and cycles within
/// 1-9. The debug flag has no bounds.
pub fn validate(work: i64, short_break: i64, long_break: i64, cycles: i64) -> bool {
    let duration_ok = |value: i64| (DURATION_MIN..=DURATION_MAX).contains(&value);
    duration_ok(work)
        && duration_ok(short_break)
        && duration_ok(long_break)
        && (CYCLES_MIN..=CYCLES_MAX).contains(&cycles)
}

/// Validated timer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    work: u32,
    short_break: u32,
    long_break: u32,
    cycles: u32,
    debug: bool,
}

impl TimerConfig {
    /// Build a config, rejecting the whole record if any value is out of range
    pub fn new(
        work: i64,
        short_break: i64,
        long_break: i64,
        cycles: i64,
        debug: bool,
    ) -> Result<Self, SettingsError> {
        if !validate(work, short_break, long_break, cycles) {
            return Err(SettingsError::OutOfRange {
                work,
                short_break,
                long_break,
                cycles,
            });
        }

        // Bounds checked above, all values fit in u32
        Ok(Self {
            work: work as u32,
            short_break: short_break as u32,
            long_break: long_break as u32,
            cycles: cycles as u32,
            debug,
        })
    }

    pub fn work(&self) -> u32 {
        self.work
    }

    pub fn short_break(&self) -> u32 {
        self.short_break
    }

    pub fn long_break(&self) -> u32 {
        self.long_break
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Work phase length in seconds
    pub fn work_seconds(&self) -> u32 {
        self.to_seconds(self.work)
    }

    /// Short break length in seconds
    pub fn short_break_seconds(&self) -> u32 {
        self.to_seconds(self.short_break)
    }

    /// Long break length in seconds
    pub fn long_break_seconds(&self) -> u32 {
        self.to_seconds(self.long_break)
    }

    /// Unit of the stored durations, for labels
    pub fn unit_label(&self) -> &'static str {
        if self.debug {
            "sec"
        } else {
            "min"
        }
    }

    fn to_seconds(&self, value: u32) -> u32 {
        if self.debug {
            value
        } else {
            value * SECONDS_PER_MINUTE
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK,
            short_break: DEFAULT_SHORT_BREAK,
            long_break: DEFAULT_LONG_BREAK,
            cycles: DEFAULT_CYCLES,
            debug: DEFAULT_DEBUG,
        }
    }
}

/// Settings as read from disk, before bounds validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSettings {
    pub work: i64,
    pub short_break: i64,
    pub long_break: i64,
    pub cycles: i64,
    pub debug: bool,
}

impl RawSettings {
    /// Validate into a `TimerConfig`
    pub fn into_config(self) -> Result<TimerConfig, SettingsError> {
        TimerConfig::new(
            self.work,
            self.short_break,
            self.long_break,
            self.cycles,
            self.debug,
        )
    }
}

impl From<&TimerConfig> for RawSettings {
    fn from(config: &TimerConfig) -> Self {
        Self {
            work: i64::from(config.work),
            short_break: i64::from(config.short_break),
            long_break: i64::from(config.long_break),
            cycles: i64::from(config.cycles),
            debug: config.debug,
        }
    }
}

/// On-disk shape of the settings record
pub trait SettingsFormat: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Parse file contents. Bounds are checked by the caller.
    fn decode(&self, contents: &str) -> Result<RawSettings, SettingsError>;

    /// Render file contents
    fn encode(&self, config: &TimerConfig) -> String;
}

/// Five newline-separated values in fixed order: work, short break, long
/// break, cycles, debug. Values are trimmed and lines after the fifth are
/// ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineFormat;

impl LineFormat {
    fn int_field(lines: &[&str], index: usize) -> Result<i64, SettingsError> {
        let raw = Self::line(lines, index)?;
        raw.parse::<i64>().map_err(|_| SettingsError::InvalidField {
            line: index + 1,
            field: FIELD_NAMES[index],
            value: raw.to_string(),
        })
    }

    fn bool_field(lines: &[&str], index: usize) -> Result<bool, SettingsError> {
        let raw = Self::line(lines, index)?;
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(SettingsError::InvalidField {
                line: index + 1,
                field: FIELD_NAMES[index],
                value: raw.to_string(),
            })
        }
    }

    fn line<'a>(lines: &[&'a str], index: usize) -> Result<&'a str, SettingsError> {
        match lines.get(index).map(|line| line.trim()) {
            Some(line) if !line.is_empty() => Ok(line),
            _ => Err(SettingsError::MissingField {
                line: index + 1,
                field: FIELD_NAMES[index],
            }),
        }
    }
}

impl SettingsFormat for LineFormat {
    fn name(&self) -> &'static str {
        "lines"
    }

    fn decode(&self, contents: &str) -> Result<RawSettings, SettingsError> {
        let lines: Vec<&str> = contents.lines().take(FIELD_NAMES.len()).collect();

        Ok(RawSettings {
            work: Self::int_field(&lines, 0)?,
            short_break: Self::int_field(&lines, 1)?,
            long_break: Self::int_field(&lines, 2)?,
            cycles: Self::int_field(&lines, 3)?,
            debug: Self::bool_field(&lines, 4)?,
        })
    }

    fn encode(&self, config: &TimerConfig) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n",
            config.work, config.short_break, config.long_break, config.cycles, config.debug
        )
    }
}

/// Keyed TOML record using the `RawSettings` field names
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlFormat;

impl SettingsFormat for TomlFormat {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn decode(&self, contents: &str) -> Result<RawSettings, SettingsError> {
        toml::from_str(contents).map_err(|e| SettingsError::Malformed(e.to_string()))
    }

    fn encode(&self, config: &TimerConfig) -> String {
        // RawSettings holds only integers and a bool, serialization cannot fail
        toml::to_string_pretty(&RawSettings::from(config)).unwrap_or_default()
    }
}
