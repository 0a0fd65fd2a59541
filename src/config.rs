//! Environment overrides for Tomato
//!
//! The settings file is the primary configuration source (see the
//! `settings` module). These environment variables relocate it, pick its
//! on-disk format, or point at a different asset directory:
//!
//! - TOMATO_SETTINGS_DIR: directory holding the settings file
//! - TOMATO_SETTINGS_FORMAT: `lines` (default) or `toml`
//! - TOMATO_ASSETS_DIR: directory holding icons and the alarm clip

use crate::config_file::{LineFormat, SettingsFormat, TomlFormat};
use log::{debug, info, warn};
use std::env;
use std::path::PathBuf;

pub const SETTINGS_DIR_VAR: &str = "TOMATO_SETTINGS_DIR";
pub const SETTINGS_FORMAT_VAR: &str = "TOMATO_SETTINGS_FORMAT";
pub const ASSETS_DIR_VAR: &str = "TOMATO_ASSETS_DIR";

/// Which on-disk shape the settings store reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsFormatKind {
    #[default]
    Lines,
    Toml,
}

impl SettingsFormatKind {
    pub fn build(self) -> Box<dyn SettingsFormat> {
        match self {
            Self::Lines => Box::new(LineFormat),
            Self::Toml => Box::new(TomlFormat),
        }
    }

    /// File extension used for the settings file in this format
    pub fn extension(self) -> &'static str {
        match self {
            Self::Lines => "cfg",
            Self::Toml => "toml",
        }
    }
}

/// Parse the TOMATO_SETTINGS_DIR environment variable
///
/// Returns None when unset or empty
pub fn parse_settings_dir() -> Option<PathBuf> {
    parse_dir_var(SETTINGS_DIR_VAR)
}

/// Parse the TOMATO_ASSETS_DIR environment variable
///
/// Returns None when unset or empty
pub fn parse_assets_dir() -> Option<PathBuf> {
    parse_dir_var(ASSETS_DIR_VAR)
}

/// Parse the TOMATO_SETTINGS_FORMAT environment variable
///
/// Unknown values fall back to the line format with a warning
pub fn parse_settings_format() -> SettingsFormatKind {
    match env::var(SETTINGS_FORMAT_VAR) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "" | "lines" | "cfg" => SettingsFormatKind::Lines,
            "toml" => {
                info!("Settings format set via environment variable: toml");
                SettingsFormatKind::Toml
            }
            other => {
                warn!(
                    "Invalid {}: {:?} (must be 'lines' or 'toml'). Using lines.",
                    SETTINGS_FORMAT_VAR, other
                );
                SettingsFormatKind::Lines
            }
        },
        Err(_) => {
            debug!("{} not set. Using lines.", SETTINGS_FORMAT_VAR);
            SettingsFormatKind::Lines
        }
    }
}

fn parse_dir_var(name: &str) -> Option<PathBuf> {
    match env::var(name) {
        Ok(val) if !val.trim().is_empty() => {
            info!("{} set: {}", name, val.trim());
            Some(PathBuf::from(val.trim()))
        }
        Ok(_) => {
            warn!("{} is set but empty. Ignoring.", name);
            None
        }
        Err(_) => {
            debug!("{} not set.", name);
            None
        }
    }
}
