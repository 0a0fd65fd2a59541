//! Settings store: load, validate and persist the timer settings
//!
//! The store never surfaces a broken settings file to the user. Anything that
//! cannot be read, parsed or validated is replaced by the defaults, and the
//! defaults are written back so the next start sees a clean record.

use crate::config::{self, SettingsFormatKind};
use crate::config_file::{self, LineFormat, SettingsError, SettingsFormat, TimerConfig};
use crate::constants::{SETTINGS_DIR_NAME, SETTINGS_FILE_NAME, SETTINGS_TEMP_SUFFIX};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct SettingsStore {
    path: PathBuf,
    format: Box<dyn SettingsFormat>,
}

impl SettingsStore {
    /// Store using the five-line format at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_format(path, Box::new(LineFormat))
    }

    /// Store using a specific on-disk format
    pub fn with_format(path: impl Into<PathBuf>, format: Box<dyn SettingsFormat>) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Store at the standard per-user location
    ///
    /// - macOS: `~/Library/Application Support/Tomato/Settings.cfg`
    /// - Linux: `~/.config/Tomato/Settings.cfg`
    /// - Windows: `%APPDATA%\Tomato\Settings.cfg`
    ///
    /// TOMATO_SETTINGS_DIR replaces the directory and TOMATO_SETTINGS_FORMAT
    /// selects the format (see the `config` module).
    pub fn default_location() -> Result<Self> {
        let dir = match config::parse_settings_dir() {
            Some(dir) => dir,
            None => dirs::config_dir()
                .context("Failed to determine config directory")?
                .join(SETTINGS_DIR_NAME),
        };

        let kind = config::parse_settings_format();
        let file_name = match kind {
            SettingsFormatKind::Lines => PathBuf::from(SETTINGS_FILE_NAME),
            SettingsFormatKind::Toml => {
                PathBuf::from(SETTINGS_FILE_NAME).with_extension(kind.extension())
            }
        };

        Ok(Self::with_format(dir.join(file_name), kind.build()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bounds check shared with the settings form
    pub fn validate(work: i64, short_break: i64, long_break: i64, cycles: i64) -> bool {
        config_file::validate(work, short_break, long_break, cycles)
    }

    /// Load settings, falling back to (and persisting) the defaults
    ///
    /// A missing file, a missing or unparsable line, or out-of-range values all
    /// discard the record in full. The defaults are written back; a failure to
    /// write them is logged and the defaults still apply.
    pub fn load(&self) -> TimerConfig {
        match self.try_load() {
            Ok(config) => {
                debug!("Settings loaded from: {}", self.path.display());
                config
            }
            Err(e) => {
                match &e {
                    SettingsError::NotFound(_) => {
                        info!("No settings file at {}, writing defaults", self.path.display())
                    }
                    e if e.is_validation_error() => {
                        warn!("Discarding invalid settings: {}. Using defaults.", e)
                    }
                    e if e.is_parse_error() => {
                        warn!("Discarding malformed settings: {}. Using defaults.", e)
                    }
                    e => warn!("Failed to read settings: {}. Using defaults.", e),
                }

                let defaults = TimerConfig::default();
                if let Err(e) = self.save(&defaults) {
                    error!("Failed to write default settings: {}", e);
                }
                defaults
            }
        }
    }

    /// Read, parse and validate the settings file
    pub fn try_load(&self) -> Result<TimerConfig, SettingsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SettingsError::NotFound(self.path.clone()));
            }
            Err(e) => {
                return Err(SettingsError::Io {
                    action: "read",
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        self.format.decode(&contents)?.into_config()
    }

    /// Persist settings
    ///
    /// Creates the settings directory if needed. The record is written to a
    /// sibling temporary file and renamed over the old one, so readers see
    /// either the previous or the new record.
    pub fn save(&self, config: &TimerConfig) -> Result<(), SettingsError> {
        // Re-check so a record that bypassed the constructor never hits disk
        if !Self::validate(
            i64::from(config.work()),
            i64::from(config.short_break()),
            i64::from(config.long_break()),
            i64::from(config.cycles()),
        ) {
            return Err(SettingsError::OutOfRange {
                work: i64::from(config.work()),
                short_break: i64::from(config.short_break()),
                long_break: i64::from(config.long_break()),
                cycles: i64::from(config.cycles()),
            });
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| SettingsError::Io {
                    action: "create directory",
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let temp_path = self.temp_path();
        let contents = self.format.encode(config);

        fs::write(&temp_path, contents).map_err(|e| SettingsError::Io {
            action: "write",
            path: temp_path.clone(),
            source: e,
        })?;

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(SettingsError::Io {
                action: "replace",
                path: self.path.clone(),
                source: e,
            });
        }

        info!(
            "Settings saved to: {} ({} format)",
            self.path.display(),
            self.format.name()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from(SETTINGS_FILE_NAME));
        name.push(".");
        name.push(SETTINGS_TEMP_SUFFIX);
        self.path.with_file_name(name)
    }
}
