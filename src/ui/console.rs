//! Terminal line input read on a background thread
//!
//! Every consumer of the terminal (phase-change prompts, the idle prompt,
//! commands typed while the countdown runs) reads from the same channel, so
//! the tick loop can wait for input and for the next tick at the same time.

use log::{debug, warn};
use parking_lot::Mutex;
use std::io::{self, BufRead, BufReader};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub type LineSender = Sender<String>;

/// Channel whose receiving end is a `ConsoleInput`
pub fn create_line_channel() -> (LineSender, ConsoleInput) {
    let (tx, rx) = mpsc::channel();
    (
        tx,
        ConsoleInput {
            lines: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Result of a non-blocking or timed read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingLine {
    Line(String),
    /// Nothing typed yet
    Empty,
    /// Input is closed and no lines remain
    Closed,
}

/// Command typed while the countdown runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunningCommand {
    Pause,
    Reset,
    Quit,
    /// Blank line
    Nothing,
    Unknown(String),
}

impl RunningCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "p" | "pause" => Self::Pause,
            "r" | "reset" => Self::Reset,
            "q" | "quit" => Self::Quit,
            "" => Self::Nothing,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Shared handle to lines typed on the terminal
#[derive(Clone)]
pub struct ConsoleInput {
    lines: Arc<Mutex<Receiver<String>>>,
}

impl ConsoleInput {
    /// Read stdin on a thread named "stdin-reader"
    pub fn stdin() -> io::Result<Self> {
        Self::from_reader(BufReader::new(io::stdin()))
    }

    pub fn from_reader(reader: impl BufRead + Send + 'static) -> io::Result<Self> {
        let (tx, input) = create_line_channel();

        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            warn!("Failed to read input: {}", e);
                            return;
                        }
                    }
                }
                debug!("Input closed");
            })?;

        Ok(input)
    }

    /// Block until a line arrives. None once input is closed.
    pub fn read_line(&self) -> Option<String> {
        self.lines.lock().recv().ok()
    }

    pub fn try_read_line(&self) -> PendingLine {
        match self.lines.lock().try_recv() {
            Ok(line) => PendingLine::Line(line),
            Err(TryRecvError::Empty) => PendingLine::Empty,
            Err(TryRecvError::Disconnected) => PendingLine::Closed,
        }
    }

    /// Wait up to `timeout` for a line
    pub fn read_line_timeout(&self, timeout: Duration) -> PendingLine {
        match self.lines.lock().recv_timeout(timeout) {
            Ok(line) => PendingLine::Line(line),
            Err(RecvTimeoutError::Timeout) => PendingLine::Empty,
            Err(RecvTimeoutError::Disconnected) => PendingLine::Closed,
        }
    }

    /// Drop lines typed before now; returns how many were dropped
    pub fn discard_pending(&self) -> usize {
        let mut discarded = 0;
        while let PendingLine::Line(_) = self.try_read_line() {
            discarded += 1;
        }
        discarded
    }
}
