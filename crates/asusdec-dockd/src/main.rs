//! asusdec dock daemon
//!
//! Front end for the Asus keyboard dock: reports dock battery and charger
//! state, follows it over time, and switches the dock touchpad.
//!
//! Commands:
//! 1. `status` - resolve the power-supply tree once and print a snapshot
//! 2. `watch` - poll on an interval and print whenever something changes
//! 3. `touchpad on|off|toggle` - drive the touchpad and persist the choice
//! 4. `key SCANCODE` - act on a dock keyboard key, as the host key handler does

mod actions;
mod watcher;

use actions::{TouchpadAction, apply_key_event, apply_touchpad_action, report_outcome};
use anyhow::{Context, Result};
use asusdec_config::{DockConfig, UserState};
use asusdec_hal::mock::{MockDock, MockScenario};
use asusdec_hal::{
    AsusdecDevice, DockBatteryHandler, DockBatteryMonitor, DockKeyEvent, DockStatusSource,
    KeyState, TouchpadControl,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use watcher::DockWatcher;

#[derive(Debug, Parser)]
#[command(
    name = "asusdec-dockd",
    version,
    about = "Asus keyboard dock status and touchpad control"
)]
struct Cli {
    /// Configuration file (defaults to /etc/asusdec/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the power-supply enumeration root
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Override the dock controller device node
    #[arg(long, global = true)]
    device: Option<PathBuf>,

    /// Simulate a dock instead of touching hardware
    /// (undocked, battery, charging, usb; also read from ASUSDEC_MOCK_SCENARIO)
    #[arg(long, global = true, value_parser = parse_scenario)]
    mock: Option<MockScenario>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current dock status
    Status {
        /// Print the host notification record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Poll the dock and print a JSON line whenever its state changes
    Watch {
        /// Seconds between polls
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Switch the dock touchpad
    Touchpad {
        #[arg(value_enum)]
        action: TouchpadAction,
    },
    /// Handle a dock keyboard scancode the way the host key handler would
    Key {
        scancode: u16,
        /// Autorepeat count of the event
        #[arg(long, default_value_t = 0)]
        repeat: u32,
        /// Treat the event as a key release
        #[arg(long)]
        release: bool,
    },
}

fn parse_scenario(name: &str) -> Result<MockScenario, String> {
    MockScenario::from_name(name).ok_or_else(|| format!("unknown mock scenario '{name}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.mock.or_else(MockScenario::from_env) {
        Some(scenario) => {
            info!("Using mock dock ({:?})", scenario);
            let dock = MockDock::new(scenario);
            run(cli.command, &config, dock.status.clone(), dock.touchpad.clone()).await
        }
        None => {
            let monitor = DockBatteryMonitor::new(&config.power_supply_root);
            let device = AsusdecDevice::with_path(&config.device_node);
            run(cli.command, &config, monitor, device).await
        }
    }
}

/// Setup logging to stderr, leaving stdout for command output
fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Load the configuration file and apply command line overrides
fn load_config(cli: &Cli) -> Result<DockConfig> {
    let mut config = match &cli.config {
        Some(path) => DockConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => DockConfig::load_default().context("Failed to load configuration")?,
    };

    if let Some(root) = &cli.root {
        config.power_supply_root = root.clone();
    }
    if let Some(device) = &cli.device {
        config.device_node = device.clone();
    }

    Ok(config)
}

async fn run<S, C>(command: Command, config: &DockConfig, source: S, control: C) -> Result<()>
where
    S: DockStatusSource,
    C: TouchpadControl,
{
    match command {
        Command::Status { json } => print_status(source, config, json),
        Command::Watch { interval } => watch(source, control, config, interval).await,
        Command::Touchpad { action } => touchpad(control, config, action),
        Command::Key {
            scancode,
            repeat,
            release,
        } => {
            let event = DockKeyEvent {
                scancode,
                state: if release { KeyState::Up } else { KeyState::Down },
                repeat_count: repeat,
            };
            key(control, config, event)
        }
    }
}

fn print_status<S: DockStatusSource>(source: S, config: &DockConfig, json: bool) -> Result<()> {
    let mut handler = DockBatteryHandler::new(source, config.status_codes);
    handler.update();
    handler.process();

    if json {
        println!("{}", serde_json::to_string_pretty(&handler.notify_data())?);
        return Ok(());
    }

    let snapshot = handler.snapshot();
    println!("Dock battery:      {}% ({:?})", snapshot.level, snapshot.status);
    println!("Dock present:      {}", yes_no(snapshot.battery_present));
    println!("Plugged:           {:?}", handler.plugged());
    println!("Tablet AC online:  {}", yes_no(snapshot.ac_online));
    println!("Dock AC online:    {}", yes_no(snapshot.dock_ac_online));
    println!("Tablet USB online: {}", yes_no(snapshot.pad_usb_online));
    Ok(())
}

async fn watch<S, C>(
    source: S,
    control: C,
    config: &DockConfig,
    interval: Option<u64>,
) -> Result<()>
where
    S: DockStatusSource,
    C: TouchpadControl,
{
    let secs = interval.unwrap_or(config.poll_interval_secs).max(1);
    let state = UserState::load_or_default(&config.state_file);
    let mut watcher =
        DockWatcher::new(source, control, config.status_codes, state.touchpad_enabled);
    let mut ticker = tokio::time::interval(Duration::from_secs(secs));

    info!("Polling dock every {}s", secs);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(notification) = watcher.tick() {
                    println!("{}", serde_json::to_string(&notification)?);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                break;
            }
        }
    }

    Ok(())
}

fn touchpad<C: TouchpadControl>(
    control: C,
    config: &DockConfig,
    action: TouchpadAction,
) -> Result<()> {
    let outcome = apply_touchpad_action(control, &config.state_file, action)?;
    report_outcome(&outcome);
    println!(
        "Touchpad {}",
        if outcome.enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

fn key<C: TouchpadControl>(control: C, config: &DockConfig, event: DockKeyEvent) -> Result<()> {
    let handled = apply_key_event(control, &config.state_file, &event)?;
    if let Some(outcome) = &handled.touchpad {
        report_outcome(outcome);
    }

    match handled.key {
        Some(key) if handled.consumed => println!("{:?}: consumed", key),
        Some(key) => println!("{:?}: passed through", key),
        None => println!("Scancode {}: not a dock key", event.scancode),
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
