// Tomato Tray App - menu bar Pomodoro timer
// The event loop is the tick source; the tray title and tooltip show MM:SS

use anyhow::{Context, Result};
use log::{error, info, warn};
use std::time::{Duration, Instant};
use tao::event::Event;
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tomato::alarm::CommandAlarm;
use tomato::assets::{fallback_icon, load_icon, AssetPaths};
use tomato::config_file::TimerConfig;
use tomato::constants::{APP_NAME, TICK_INTERVAL_MS, TRAY_ICON_SIZE};
use tomato::settings::SettingsStore;
use tomato::timer::Phase;
use tomato::ui::dialogs::{confirm_dialog, prompt_text, show_alert};
use tomato::ui::notifications::show_phase_banner;
use tomato::ui::{FormField, NativeDialog, SettingsForm};
use tomato::{TickReport, TomatoCore};
use tray_icon::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{TrayIcon, TrayIconBuilder};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Tomato Tray App v{}", VERSION);

    let store = SettingsStore::default_location().context("Failed to locate settings")?;
    let assets = AssetPaths::locate();

    let clip = assets.alarm_clip();
    if !clip.is_file() {
        warn!("Alarm clip not found at {}. Alarm disabled.", clip.display());
    }

    let mut core = TomatoCore::new(store, Box::new(NativeDialog), Box::new(CommandAlarm::new(clip)));

    // Create event loop for tray app
    let event_loop = EventLoopBuilder::new().build();

    // Build tray menu
    let start_item = MenuItem::new("Start", true, None);
    let pause_item = MenuItem::new("Pause", false, None);
    let reset_item = MenuItem::new("Reset", true, None);
    let settings_item = MenuItem::new("Settings...", true, None);
    let separator = PredefinedMenuItem::separator();
    let version_item = MenuItem::new(format!("Version {}", VERSION), true, None);
    let quit_item = MenuItem::new("Quit", true, None);

    let menu = Menu::new();
    menu.append(&start_item).context("Failed to add start menu item")?;
    menu.append(&pause_item).context("Failed to add pause menu item")?;
    menu.append(&reset_item).context("Failed to add reset menu item")?;
    menu.append(&settings_item).context("Failed to add settings menu item")?;
    menu.append(&separator).context("Failed to add separator")?;
    menu.append(&version_item).context("Failed to add version menu item")?;
    menu.append(&quit_item).context("Failed to add quit menu item")?;

    // Create tray icon
    let tray = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip(format!("{} - {}", APP_NAME, core.remaining_display()))
        .with_title(core.remaining_display())
        .with_icon(phase_icon(&assets, core.phase()))
        .build()
        .context("Failed to create tray icon")?;

    info!("Tray icon created, running event loop");

    // Clone IDs for event handling
    let start_id = start_item.id().clone();
    let pause_id = pause_item.id().clone();
    let reset_id = reset_item.id().clone();
    let settings_id = settings_item.id().clone();
    let version_id = version_item.id().clone();
    let quit_id = quit_item.id().clone();

    let interval = Duration::from_millis(TICK_INTERVAL_MS);
    let mut next_tick: Option<Instant> = None;
    let mut shown_phase = core.phase();

    // Run event loop
    event_loop.run(move |event, _, control_flow| {
        if let Event::LoopDestroyed = event {
            info!("Tomato shutdown complete");
            return;
        }

        // Handle menu events
        if let Ok(event) = MenuEvent::receiver().try_recv() {
            let event_id = event.id;

            if event_id == start_id {
                core.start();
            } else if event_id == pause_id {
                core.pause();
            } else if event_id == reset_id {
                core.reset();
            } else if event_id == settings_id {
                if let Some(config) = run_settings_dialogs(&core.config()) {
                    core.update_settings(config);
                }
            } else if event_id == version_id {
                show_version();
            } else if event_id == quit_id {
                info!("Quit menu item clicked, exiting");
                *control_flow = ControlFlow::Exit;
                return;
            }
        }

        // Tick source: fire every interval while the timer runs
        if core.is_running() {
            let now = Instant::now();
            let due = *next_tick.get_or_insert(now + interval);
            if now >= due {
                next_tick = Some(due + interval);
                if let TickReport::PhaseChanged { transition, .. } = core.tick() {
                    show_phase_banner(&transition);
                    // The dialog blocked the loop; count the new phase from now
                    next_tick = Some(Instant::now() + interval);
                }
            }
        }

        if !core.is_running() {
            next_tick = None;
        }

        if core.phase() != shown_phase {
            shown_phase = core.phase();
            if let Err(e) = tray.set_icon(Some(phase_icon(&assets, shown_phase))) {
                error!("Failed to update tray icon: {}", e);
            }
        }
        refresh_tray(&tray, &core);
        start_item.set_enabled(!core.is_running());
        pause_item.set_enabled(core.is_running());

        *control_flow = match next_tick {
            Some(due) => ControlFlow::WaitUntil(due),
            None => ControlFlow::Wait,
        };
    });
}

/// Show the remaining time on the tray
fn refresh_tray(tray: &TrayIcon, core: &TomatoCore) {
    let remaining = core.remaining_display();
    tray.set_title(Some(&remaining));
    let tooltip = format!("{} - {} {}", APP_NAME, core.phase().label(), remaining);
    if let Err(e) = tray.set_tooltip(Some(tooltip)) {
        error!("Failed to update tray tooltip: {}", e);
    }
}

/// Tray icon for `phase`, loaded from assets or drawn when the file is unusable
fn phase_icon(assets: &AssetPaths, phase: Phase) -> tray_icon::Icon {
    let pixels = match load_icon(&assets.icon_for(phase), TRAY_ICON_SIZE) {
        Ok(pixels) => pixels,
        Err(e) => {
            warn!("{}. Using a plain icon.", e);
            fallback_icon(phase, TRAY_ICON_SIZE)
        }
    };

    match tray_icon::Icon::from_rgba(pixels.rgba, pixels.width, pixels.height) {
        Ok(icon) => icon,
        Err(e) => {
            error!("Invalid icon data: {}", e);
            let plain = fallback_icon(phase, TRAY_ICON_SIZE);
            tray_icon::Icon::from_rgba(plain.rgba, plain.width, plain.height)
                .expect("Failed to create icon")
        }
    }
}

/// Settings form as a series of dialogs
///
/// Cancelling any dialog discards the form. Invalid input shows an alert and
/// asks again, keeping what was typed.
fn run_settings_dialogs(current: &TimerConfig) -> Option<TimerConfig> {
    let title = format!("{} Settings", APP_NAME);
    let mut form = SettingsForm::from_config(current);

    let debug = match confirm_dialog(
        &title,
        "Debug mode: read durations as seconds instead of minutes?\n\nOK enables it, Cancel disables it.",
    ) {
        Ok(debug) => debug,
        Err(e) => {
            error!("Failed to show settings dialog: {}", e);
            return None;
        }
    };
    if debug != form.debug {
        form.toggle_debug();
    }

    loop {
        for field in FormField::ALL {
            let label = field.label(form.debug);
            match prompt_text(&title, &label, form.field(field)) {
                Ok(Some(value)) => form.set_field(field, value),
                Ok(None) => {
                    info!("Settings cancelled");
                    return None;
                }
                Err(e) => {
                    error!("Failed to show settings dialog: {}", e);
                    return None;
                }
            }
        }

        match form.submit() {
            Ok(config) => {
                info!("Settings submitted");
                return Some(config);
            }
            Err(e) => {
                warn!("Rejected settings: {}", e);
                show_alert(e.title(), e.message());
            }
        }
    }
}

/// Show version information
fn show_version() {
    info!("Version menu item clicked");
    show_alert(
        &format!("{} Version", APP_NAME),
        &format!(
            "{} Tray App\nVersion {}\n\nWork, short breaks and long breaks from the menu bar.",
            APP_NAME, VERSION
        ),
    );
}
