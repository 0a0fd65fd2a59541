// Tomato CLI - Pomodoro timer in the terminal
// Runs the countdown on the main thread and asks at every phase change

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};
use tomato::alarm::{Alarm, CommandAlarm, SilentAlarm};
use tomato::assets::AssetPaths;
use tomato::config_file::TimerConfig;
use tomato::constants::TICK_INTERVAL_MS;
use tomato::settings::SettingsStore;
use tomato::timer::RunState;
use tomato::ui::{
    Acknowledgement, ConsoleInput, FormField, NativeDialog, Notifier, PendingLine, RunningCommand,
    SettingsForm, TerminalPrompt,
};
use tomato::{TickReport, TomatoCore};

const RUNNING_HINT: &str = "Commands while counting: [p] pause, [r] reset, [q] quit";

/// Pomodoro timer: work, short breaks and long breaks
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pomodoro timer: work, short breaks and long breaks",
    long_about = "Pomodoro timer: work, short breaks and long breaks.

Each work session is followed by a short break; after the configured number of
work sessions the break is a long one. At every phase change an alarm loops
until you answer: continue to start the next phase, cancel to pause.

CONTROLS:
  While the countdown runs, type a command and press Enter:
    p  pause      r  reset      q  quit
  Anything typed before a phase-change prompt appears is discarded, so the
  prompt is only answered by what you type after it.

SETTINGS:
  Edit settings interactively with:
    tomato --settings

  Settings are stored as five lines (work, short break, long break, cycles,
  debug) at:
    ~/Library/Application Support/Tomato/Settings.cfg   (macOS)
    ~/.config/Tomato/Settings.cfg                        (Linux)

  In debug mode all durations are read as seconds instead of minutes.

ENVIRONMENT:
  TOMATO_SETTINGS_DIR      Directory holding the settings file
  TOMATO_SETTINGS_FORMAT   'lines' (default) or 'toml'
  TOMATO_ASSETS_DIR        Directory holding Tomato.png, Green tomato.png, Alarm.wav"
)]
struct Args {
    /// Edit settings interactively and exit
    #[arg(long)]
    settings: bool,

    /// Print the settings file location and values, then exit
    #[arg(long)]
    show_settings: bool,

    /// Start the countdown immediately
    #[arg(short, long)]
    start: bool,

    /// Use native dialogs instead of terminal prompts at phase changes
    #[arg(long)]
    native_dialogs: bool,

    /// Do not play the alarm sound
    #[arg(long)]
    no_sound: bool,
}

/// Print `prompt` and read one trimmed line; None when stdin is closed
fn prompt_line(console: &ConsoleInput, prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    Ok(console.read_line().map(|line| line.trim().to_string()))
}

/// Interactive settings form; keeps asking until the values are valid
fn edit_settings(console: &ConsoleInput, current: &TimerConfig) -> Result<TimerConfig> {
    println!("Tomato Settings");
    println!("===============\n");
    println!("Press Enter to keep the value shown in brackets.\n");

    let mut form = SettingsForm::from_config(current);

    loop {
        let answer = prompt_line(
            console,
            &format!(
                "Debug mode, durations in seconds [{}] (y/n): ",
                if form.debug { "y" } else { "n" }
            ),
        )?
        .context("Input closed")?;
        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" if !form.debug => {
                form.toggle_debug();
            }
            "n" | "no" if form.debug => {
                form.toggle_debug();
            }
            _ => {}
        }

        for field in FormField::ALL {
            let label = field.label(form.debug);
            let answer = prompt_line(console, &format!("{} [{}] ", label, form.field(field)))?
                .context("Input closed")?;
            if !answer.is_empty() {
                form.set_field(field, answer);
            }
        }

        match form.submit() {
            Ok(config) => return Ok(config),
            Err(e) => println!("\n{}: {}\n", e.title(), e.message()),
        }
    }
}

fn show_settings(store: &SettingsStore) {
    let config = store.load();
    println!("Settings file: {}", store.path().display());
    println!("Work time:     {} {}", config.work(), config.unit_label());
    println!("Short break:   {} {}", config.short_break(), config.unit_label());
    println!("Long break:    {} {}", config.long_break(), config.unit_label());
    println!("Cycles:        {}", config.cycles());
    println!("Debug mode:    {}", config.debug());
}

/// Ask what to do while the timer is stopped. Returns false to quit.
fn idle_prompt(console: &ConsoleInput, core: &mut TomatoCore) -> Result<bool> {
    loop {
        let state = match core.run_state() {
            RunState::Paused => "paused",
            _ => "stopped",
        };
        let answer = prompt_line(
            console,
            &format!(
                "\n{} {} ({}). [Enter] start, [r] reset, [s] settings, [q] quit: ",
                core.phase().label(),
                core.remaining_display(),
                state
            ),
        )?;

        match answer.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("q") | Some("quit") => return Ok(false),
            Some("") => {
                core.start();
                println!("{}", RUNNING_HINT);
                return Ok(true);
            }
            Some("r") | Some("reset") => core.reset(),
            Some("s") | Some("settings") => {
                let config = edit_settings(console, &core.config())?;
                core.update_settings(config);
            }
            Some(other) => println!("Unknown command: {}", other),
        }
    }
}

/// Apply a command typed while the countdown runs. Returns false to quit.
fn running_command(core: &mut TomatoCore, line: &str) -> bool {
    match RunningCommand::parse(line) {
        RunningCommand::Pause => {
            core.pause();
            println!();
        }
        RunningCommand::Reset => {
            core.reset();
            println!();
        }
        RunningCommand::Quit => return false,
        RunningCommand::Nothing => {}
        RunningCommand::Unknown(other) => {
            println!("\nUnknown command: {}. {}", other, RUNNING_HINT)
        }
    }
    true
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let store = SettingsStore::default_location().context("Failed to locate settings")?;

    if args.settings {
        let console = ConsoleInput::stdin().context("Failed to read the terminal")?;
        let config = edit_settings(&console, &store.load())?;
        match store.save(&config) {
            Ok(()) => println!("\nSettings saved to: {}", store.path().display()),
            Err(e) => error!("Failed to save settings: {}", e),
        }
        return Ok(());
    }
    if args.show_settings {
        show_settings(&store);
        return Ok(());
    }

    info!("Starting Tomato v{}", env!("CARGO_PKG_VERSION"));

    let console = ConsoleInput::stdin().context("Failed to read the terminal")?;

    let notifier: Box<dyn Notifier> = if args.native_dialogs {
        Box::new(NativeDialog)
    } else {
        Box::new(TerminalPrompt::new(console.clone()))
    };

    let alarm: Box<dyn Alarm> = if args.no_sound {
        Box::new(SilentAlarm)
    } else {
        let clip = AssetPaths::locate().alarm_clip();
        if !clip.is_file() {
            warn!("Alarm clip not found at {}. Alarm disabled.", clip.display());
        }
        Box::new(CommandAlarm::new(clip))
    };

    let mut core = TomatoCore::new(store, notifier, alarm);

    if args.start {
        core.start();
        println!("{}", RUNNING_HINT);
    } else if !idle_prompt(&console, &mut core)? {
        return Ok(());
    }

    // Tick source: one tick per interval, scheduled against the start time so
    // the countdown does not drift with prompt or print latency. Commands
    // typed while waiting are handled as soon as they arrive.
    let interval = Duration::from_millis(TICK_INTERVAL_MS);
    let mut next_tick = Instant::now() + interval;

    loop {
        let now = Instant::now();
        if next_tick > now {
            match console.read_line_timeout(next_tick - now) {
                PendingLine::Line(command) => {
                    if !running_command(&mut core, &command) {
                        break;
                    }
                    if !core.is_running() {
                        if !idle_prompt(&console, &mut core)? {
                            break;
                        }
                        next_tick = Instant::now() + interval;
                    }
                    continue;
                }
                // No more commands can arrive; keep counting
                PendingLine::Closed => thread::sleep(next_tick - now),
                PendingLine::Empty => {}
            }
        }
        next_tick += interval;

        match core.tick() {
            TickReport::Counting { .. } => {
                print!("\r{} {}   ", core.phase().label(), core.remaining_display());
                io::stdout().flush()?;
            }
            TickReport::PhaseChanged {
                transition,
                acknowledgement,
            } => {
                println!(
                    "\n{} -> {} ({})",
                    transition.from.label(),
                    transition.to.label(),
                    core.remaining_display()
                );
                if acknowledgement == Acknowledgement::Pause && !idle_prompt(&console, &mut core)? {
                    break;
                }
                next_tick = Instant::now() + interval;
            }
            TickReport::Stopped => {
                if !idle_prompt(&console, &mut core)? {
                    break;
                }
                next_tick = Instant::now() + interval;
            }
        }
    }

    info!("Tomato shutdown complete");
    Ok(())
}
