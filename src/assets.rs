//! Phase icons and the alarm clip
//!
//! Missing or undecodable assets are never fatal: callers log the
//! [`AssetError`] and fall back to a generated icon or a silent alarm.

use crate::config;
use crate::constants::{ALARM_CLIP_FILE, ASSETS_DIR_NAME, BREAK_ICON_FILE, WORK_ICON_FILE};
use crate::timer::Phase;
use image::imageops::{self, FilterType};
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0:?}")]
    Missing(PathBuf),

    #[error("failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to start {program}: {source}")]
    Player {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Location of the asset files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    dir: PathBuf,
}

impl AssetPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Find the asset directory
    ///
    /// Order: TOMATO_ASSETS_DIR, `assets/` next to the executable, then
    /// `assets/` in the working directory.
    pub fn locate() -> Self {
        if let Some(dir) = config::parse_assets_dir() {
            return Self::new(dir);
        }

        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(ASSETS_DIR_NAME)));

        match beside_exe {
            Some(dir) if dir.is_dir() => {
                debug!("Using assets next to executable: {}", dir.display());
                Self::new(dir)
            }
            _ => Self::new(ASSETS_DIR_NAME),
        }
    }

    pub fn work_icon(&self) -> PathBuf {
        self.dir.join(WORK_ICON_FILE)
    }

    pub fn break_icon(&self) -> PathBuf {
        self.dir.join(BREAK_ICON_FILE)
    }

    pub fn alarm_clip(&self) -> PathBuf {
        self.dir.join(ALARM_CLIP_FILE)
    }

    /// Icon shown during `phase`; both breaks share the break icon
    pub fn icon_for(&self, phase: Phase) -> PathBuf {
        if phase.is_work() {
            self.work_icon()
        } else {
            self.break_icon()
        }
    }
}

/// Square RGBA image ready for a tray icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPixels {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode a PNG and scale it to `size` x `size`
pub fn load_icon(path: &Path, size: u32) -> Result<IconPixels, AssetError> {
    if !path.is_file() {
        return Err(AssetError::Missing(path.to_path_buf()));
    }

    let image = image::open(path)
        .map_err(|e| AssetError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    let scaled = imageops::resize(&image, size, size, FilterType::Triangle);
    debug!(
        "Loaded icon {} ({}x{} -> {}x{})",
        path.display(),
        image.width(),
        image.height(),
        size,
        size
    );

    Ok(IconPixels {
        width: scaled.width(),
        height: scaled.height(),
        rgba: scaled.into_raw(),
    })
}

/// Solid disc in the phase colour: red for work, green for breaks
pub fn fallback_icon(phase: Phase, size: u32) -> IconPixels {
    let color: [u8; 4] = if phase.is_work() {
        [205, 60, 50, 255]
    } else {
        [82, 190, 128, 255]
    };

    let radius = size as f32 / 2.0;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - radius;
            let dy = y as f32 + 0.5 - radius;
            if dx * dx + dy * dy <= radius * radius {
                rgba.extend_from_slice(&color);
            } else {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }

    IconPixels {
        rgba,
        width: size,
        height: size,
    }
}
