//! Platform dialogs
//!
//! macOS dialogs go through `osascript`, Linux dialogs through `zenity`. The
//! terminal prompt is used by the CLI.

use super::console::ConsoleInput;
use super::dispatch::Notifier;
use crate::constants::APP_NAME;
use anyhow::{Context, Result};
use log::debug;
use std::cell::RefCell;
use std::io::{self, Write};
use std::process::Command;

/// Native modal dialog with OK / Cancel
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialog;

impl Notifier for NativeDialog {
    fn confirm(&self, message: &str) -> Result<bool> {
        confirm_dialog(APP_NAME, message)
    }
}

/// Prompt on the terminal
///
/// An empty answer, "y", "yes" or "ok" accepts; anything else dismisses.
/// Lines typed before the prompt appears are discarded, so a stray Enter
/// pressed during the countdown does not answer it.
pub struct TerminalPrompt {
    input: ConsoleInput,
    output: RefCell<Box<dyn Write>>,
}

impl TerminalPrompt {
    pub fn new(input: ConsoleInput) -> Self {
        Self::with_output(input, io::stdout())
    }

    pub fn with_output(input: ConsoleInput, output: impl Write + 'static) -> Self {
        Self {
            input,
            output: RefCell::new(Box::new(output)),
        }
    }
}

impl Notifier for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        let discarded = self.input.discard_pending();
        if discarded > 0 {
            debug!("Discarded {} line(s) typed before the prompt", discarded);
        }

        {
            let mut output = self.output.borrow_mut();
            write!(output, "\x07\n*** {} ***  [Enter] continue, [c] cancel: ", message)?;
            output.flush()?;
        }

        let answer = self
            .input
            .read_line()
            .context("Input closed while waiting for an answer")?;

        let answer = answer.trim().to_ascii_lowercase();
        Ok(matches!(answer.as_str(), "" | "y" | "yes" | "ok"))
    }
}

/// Escape a string for use inside an AppleScript string literal
pub fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Blocking OK / Cancel dialog. Ok(true) when OK was pressed.
pub fn confirm_dialog(title: &str, message: &str) -> Result<bool> {
    if cfg!(target_os = "macos") {
        let script = format!(
            r#"display dialog "{}" with title "{}" buttons {{"OK", "Cancel"}} default button "OK""#,
            escape_applescript(message),
            escape_applescript(title)
        );
        let output = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .context("Failed to run osascript")?;

        // Cancel makes osascript exit with error -128
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(output.status.success() && stdout.contains("button returned:OK"))
    } else {
        let status = Command::new("zenity")
            .args(["--question", "--title", title, "--text", message])
            .args(["--ok-label", "OK", "--cancel-label", "Cancel"])
            .status()
            .context("Failed to run zenity")?;
        Ok(status.success())
    }
}

/// Blocking text entry. None when the dialog was cancelled.
pub fn prompt_text(title: &str, label: &str, default: &str) -> Result<Option<String>> {
    if cfg!(target_os = "macos") {
        let script = format!(
            r#"display dialog "{}" with title "{}" default answer "{}" buttons {{"Cancel", "OK"}} default button "OK""#,
            escape_applescript(label),
            escape_applescript(title),
            escape_applescript(default)
        );
        let output = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .context("Failed to run osascript")?;

        if !output.status.success() {
            return Ok(None);
        }

        // Format: "button returned:OK, text returned:<text>"
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .split("text returned:")
            .nth(1)
            .map(|text| text.trim_end_matches(['\r', '\n']).to_string()))
    } else {
        let output = Command::new("zenity")
            .args(["--entry", "--title", title, "--text", label])
            .args(["--entry-text", default])
            .output()
            .context("Failed to run zenity")?;

        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(
            String::from_utf8_lossy(&output.stdout)
                .trim_end_matches(['\r', '\n'])
                .to_string(),
        ))
    }
}

/// Blocking informational or error alert with a single OK button
pub fn show_alert(title: &str, message: &str) {
    let result = if cfg!(target_os = "macos") {
        let script = format!(
            r#"display dialog "{}" with title "{}" buttons {{"OK"}} default button "OK""#,
            escape_applescript(message),
            escape_applescript(title)
        );
        Command::new("osascript").arg("-e").arg(&script).output()
    } else {
        Command::new("zenity")
            .args(["--info", "--title", title, "--text", message])
            .output()
    };

    if let Err(e) = result {
        log::error!("Failed to show alert \"{}\": {}", title, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::console::{create_line_channel, LineSender};

    /// Terminal that types the next scripted answer whenever a prompt is flushed
    struct ScriptedTerminal {
        tx: LineSender,
        answers: Vec<&'static str>,
    }

    impl Write for ScriptedTerminal {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if !self.answers.is_empty() {
                let answer = self.answers.remove(0);
                let _ = self.tx.send(answer.to_string());
            }
            Ok(())
        }
    }

    fn prompt(answers: &[&'static str]) -> TerminalPrompt {
        let (tx, input) = create_line_channel();
        TerminalPrompt::with_output(
            input,
            ScriptedTerminal {
                tx,
                answers: answers.to_vec(),
            },
        )
    }

    #[test]
    fn test_terminal_prompt_accepts_enter() {
        assert!(prompt(&[""]).confirm("Break time").unwrap());
    }

    #[test]
    fn test_terminal_prompt_accepts_yes() {
        assert!(prompt(&["YES"]).confirm("Work time").unwrap());
        assert!(prompt(&[" ok "]).confirm("Work time").unwrap());
    }

    #[test]
    fn test_terminal_prompt_cancel() {
        assert!(!prompt(&["c"]).confirm("Work time").unwrap());
        assert!(!prompt(&["no"]).confirm("Work time").unwrap());
    }

    #[test]
    fn test_terminal_prompt_closed_input_is_error() {
        let (tx, input) = create_line_channel();
        drop(tx);
        let prompt = TerminalPrompt::with_output(input, io::sink());
        assert!(prompt.confirm("Work time").is_err());
    }

    #[test]
    fn test_terminal_prompt_answers_in_order() {
        let prompt = prompt(&["", "c"]);
        assert!(prompt.confirm("Break time").unwrap());
        assert!(!prompt.confirm("Work time").unwrap());
    }

    #[test]
    fn test_enter_typed_during_countdown_does_not_answer() {
        let (tx, input) = create_line_channel();
        // Stray Enter pressed while the timer was still counting
        tx.send(String::new()).unwrap();

        let prompt = TerminalPrompt::with_output(
            input,
            ScriptedTerminal {
                tx,
                answers: vec!["c"],
            },
        );
        assert!(!prompt.confirm("Break time").unwrap());
    }

    #[test]
    fn test_escape_applescript() {
        assert_eq!(escape_applescript(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_applescript(r"a\b"), r"a\\b");
    }
}
