//! Looping alarm sound with scoped release
//!
//! [`Alarm::start_loop`] hands back an [`AlarmGuard`]. The sound plays until
//! the guard is dropped, so every exit from the caller's scope (normal
//! return, `?`, panic unwinding) stops it.

use crate::assets::AssetError;
use crate::constants::ALARM_POLL_INTERVAL_MS;
use log::{debug, warn};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A source of looping alarm sound
pub trait Alarm {
    fn start_loop(&self) -> Result<AlarmGuard, AssetError>;
}

/// Keeps the alarm playing while alive
#[must_use = "the alarm stops as soon as the guard is dropped"]
pub struct AlarmGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl AlarmGuard {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Guard with nothing to release (alarm disabled or unavailable)
    pub fn silent() -> Self {
        Self { release: None }
    }

    /// Stop the alarm now
    pub fn stop(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for AlarmGuard {
    fn drop(&mut self) {
        self.release_now();
    }
}

/// Alarm that never makes a sound
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlarm;

impl Alarm for SilentAlarm {
    fn start_loop(&self) -> Result<AlarmGuard, AssetError> {
        Ok(AlarmGuard::silent())
    }
}

/// External program that plays one pass of an audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlayerCommand {
    /// `afplay` on macOS, `paplay` elsewhere
    pub fn platform_default() -> Self {
        #[cfg(target_os = "macos")]
        let program = "afplay";
        #[cfg(not(target_os = "macos"))]
        let program = "paplay";

        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    fn command(&self, clip: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(clip)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

/// Loops an audio clip by re-running a player process
///
/// At most one loop is active per `CommandAlarm`: starting a new loop stops
/// the previous one.
pub struct CommandAlarm {
    clip: PathBuf,
    player: PlayerCommand,
    active: Arc<Mutex<Option<Arc<AtomicBool>>>>,
}

impl CommandAlarm {
    pub fn new(clip: impl Into<PathBuf>) -> Self {
        Self::with_player(clip, PlayerCommand::platform_default())
    }

    pub fn with_player(clip: impl Into<PathBuf>, player: PlayerCommand) -> Self {
        Self {
            clip: clip.into(),
            player,
            active: Arc::new(Mutex::new(None)),
        }
    }

    pub fn clip(&self) -> &Path {
        &self.clip
    }

    /// True while a loop started by this alarm is playing
    pub fn is_playing(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|stop| !stop.load(Ordering::SeqCst))
    }

    fn spawn_loop(&self, stop: Arc<AtomicBool>) -> Result<JoinHandle<()>, AssetError> {
        let clip = self.clip.clone();
        let player = self.player.clone();

        // Spawn the first pass here so a missing player is reported to the caller
        let first = player
            .command(&clip)
            .spawn()
            .map_err(|e| AssetError::Player {
                program: player.program.clone(),
                source: e,
            })?;

        // Handed to the thread through a slot so it can be killed if the
        // thread never starts
        let pending = Arc::new(Mutex::new(Some(first)));
        let handed_over = pending.clone();

        let spawned = thread::Builder::new()
            .name("alarm-loop".to_string())
            .spawn(move || {
                let Some(mut child) = handed_over.lock().take() else {
                    return;
                };
                loop {
                    if !wait_for_pass(&mut child, &stop) {
                        return;
                    }
                    child = match player.command(&clip).spawn() {
                        Ok(child) => child,
                        Err(e) => {
                            warn!("Alarm player {} failed to restart: {}", player.program, e);
                            return;
                        }
                    };
                }
            });

        spawned.map_err(|e| {
            if let Some(mut child) = pending.lock().take() {
                stop_child(&mut child);
            }
            AssetError::Player {
                program: "alarm-loop thread".to_string(),
                source: e,
            }
        })
    }
}

/// Kill a player process and reap it
fn stop_child(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("Alarm player already exited: {}", e);
    }
    let _ = child.wait();
}

/// Wait for one pass of the clip. Returns true if the loop should continue.
fn wait_for_pass(child: &mut Child, stop: &AtomicBool) -> bool {
    loop {
        if stop.load(Ordering::SeqCst) {
            stop_child(child);
            return false;
        }
        match child.try_wait() {
            Ok(Some(status)) if status.success() => return true,
            Ok(Some(status)) => {
                warn!("Alarm player exited with {}. Stopping alarm.", status);
                return false;
            }
            Ok(None) => thread::sleep(Duration::from_millis(ALARM_POLL_INTERVAL_MS)),
            Err(e) => {
                warn!("Failed to poll alarm player: {}", e);
                stop_child(child);
                return false;
            }
        }
    }
}

impl Alarm for CommandAlarm {
    fn start_loop(&self) -> Result<AlarmGuard, AssetError> {
        if !self.clip.is_file() {
            return Err(AssetError::Missing(self.clip.clone()));
        }

        let stop = Arc::new(AtomicBool::new(false));
        {
            let mut active = self.active.lock();
            if let Some(previous) = active.take() {
                debug!("Stopping previous alarm loop");
                previous.store(true, Ordering::SeqCst);
            }
            *active = Some(stop.clone());
        }

        let handle = match self.spawn_loop(stop.clone()) {
            Ok(handle) => handle,
            Err(e) => {
                self.active.lock().take();
                return Err(e);
            }
        };
        debug!("Alarm loop started: {}", self.clip.display());

        let active = self.active.clone();
        Ok(AlarmGuard::new(move || {
            stop.store(true, Ordering::SeqCst);
            if handle.join().is_err() {
                warn!("Alarm loop thread panicked");
            }
            let mut slot = active.lock();
            if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, &stop)) {
                *slot = None;
            }
            debug!("Alarm loop stopped");
        }))
    }
}
