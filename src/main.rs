//! Tamo — terminal host entry point.
//!
//! Hexagonal architecture with a single-threaded event loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SystemClock   SnapshotStore<KvStore>   Scheduler   LogEventSink│
//! │  (ClockPort)   (SnapshotPort)           (TimerPort) (EventSink)│
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           SessionController (pure logic)               │    │
//! │  │  PetState · Regime · Catch-up                          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  stdin reader thread ──▶ INPUT_CHANNEL ──▶ main loop           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::io::BufRead;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tamo::adapters::kv::KvStore;
use tamo::adapters::log_sink::LogEventSink;
use tamo::adapters::snapshot::SnapshotStore;
use tamo::adapters::time::SystemClock;
use tamo::app::commands::PetCommand;
use tamo::app::events::{CatchUp, PetView, Regime};
use tamo::app::ports::ConfigPort;
use tamo::app::session::SessionController;
use tamo::config::{SessionConfig, validate_config};
use tamo::scheduler::{FiredTimers, Scheduler};

type Controller = SessionController<SystemClock, SnapshotStore<KvStore>, Scheduler, LogEventSink>;

// ── CLI ───────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "tamo")]
#[command(about = "A virtual pet that keeps living while you're away")]
#[command(version)]
struct Cli {
    /// Directory holding the saved pet and config
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Seconds per simulation tick (overrides stored config)
    #[arg(long, global = true, value_name = "SECS")]
    tick_secs: Option<f64>,

    /// Keep everything in memory; nothing is saved
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Run,

    /// Print the pet after catching up on time away, without saving
    Status,

    /// Delete the saved pet
    Forget,

    /// Print the effective configuration
    Config {
        /// Persist the effective configuration (including overrides)
        #[arg(long)]
        write: bool,
    },
}

// ── Input channel ─────────────────────────────────────────────
//
// The stdin reader thread only parses lines; every state mutation happens
// on the main loop after draining this channel.

enum HostInput {
    Command(PetCommand),
    Status,
    Quit,
}

const INPUT_DEPTH: usize = 8;

static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, HostInput, INPUT_DEPTH> = Channel::new();

const HELP: &str = "commands: feed play sleep wake reset bg fg status quit";

fn push_input(mut input: HostInput) {
    loop {
        match INPUT_CHANNEL.try_send(input) {
            Ok(()) => return,
            Err(embassy_sync::channel::TrySendError::Full(back)) => {
                input = back;
                std::thread::sleep(Duration::from_millis(10));
            }
        }
    }
}

/// Ctrl-C and EOF end the session through the same path as `quit`, so the
/// pet is always suspended and saved.
fn request_quit() {
    push_input(HostInput::Quit);
}

fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(request_quit).context("installing Ctrl-C handler")
}

fn spawn_input_reader() -> Result<()> {
    std::thread::Builder::new()
        .name("stdin".into())
        .spawn(|| {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match line.trim() {
                    "" => {}
                    "quit" | "q" | "exit" => {
                        request_quit();
                        return;
                    }
                    "status" | "?" => push_input(HostInput::Status),
                    "help" | "h" => println!("{}", HELP),
                    text => match text.parse::<PetCommand>() {
                        Ok(cmd) => push_input(HostInput::Command(cmd)),
                        Err(e) => println!("{} ({})", e, HELP),
                    },
                }
            }
            request_quit();
        })
        .context("spawning stdin reader")?;
    Ok(())
}

// ── Rendering ─────────────────────────────────────────────────

fn render(view: &PetView) {
    println!(
        "{} {:<9} | hunger {:5.1} | happiness {:5.1} | energy {:5.1} | {}",
        view.mood.glyph(),
        view.mood.label(),
        view.hunger,
        view.happiness,
        view.energy,
        view.status_message()
    );
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    pet: PetView,
    status: String,
    regime: Regime,
    catch_up: CatchUp,
}

// ── Setup ─────────────────────────────────────────────────────

fn init_logging() {
    let filter = EnvFilter::try_from_env("TAMO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_state_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".tamo"), |d| d.join("tamo"))
}

fn open_store(cli: &Cli) -> Result<KvStore> {
    if cli.ephemeral {
        return Ok(KvStore::in_memory());
    }
    let dir = cli.state_dir.clone().unwrap_or_else(default_state_dir);
    KvStore::open(&dir).with_context(|| format!("opening state directory {}", dir.display()))
}

fn resolve_config(cli: &Cli, kv: &KvStore) -> Result<SessionConfig> {
    let mut config = match kv.load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            SessionConfig::default()
        }
    };
    if let Some(secs) = cli.tick_secs {
        config.tick_interval_secs = secs;
    }
    if let Err(msg) = validate_config(&config) {
        bail!("invalid configuration: {}", msg);
    }
    Ok(config)
}

fn build_controller(config: SessionConfig, kv: KvStore) -> Controller {
    let store = SnapshotStore::new(kv, config.namespace.clone(), config.snapshot_format);
    SessionController::new(
        config,
        SystemClock::new(),
        store,
        Scheduler::new(),
        LogEventSink::new(),
    )
}

// ── Commands ──────────────────────────────────────────────────

enum Flow {
    Continue { redraw: bool },
    Exit,
}

/// Apply every queued input.  `Quit` suspends the session before exiting.
fn drain_input(ctrl: &mut Controller) -> Flow {
    let mut redraw = false;
    while let Ok(input) = INPUT_CHANNEL.try_receive() {
        match input {
            HostInput::Command(cmd) => ctrl.handle_command(cmd),
            HostInput::Status => redraw = true,
            HostInput::Quit => {
                ctrl.on_background();
                return Flow::Exit;
            }
        }
    }
    Flow::Continue { redraw }
}

fn run(ctrl: &mut Controller) -> Result<()> {
    ctrl.on_foreground();
    render(&ctrl.view());
    println!("{}", HELP);

    install_interrupt_handler()?;
    spawn_input_reader()?;

    let poll = Duration::from_millis(u64::from(ctrl.config().poll_interval_ms));
    let autosave = match ctrl.config().autosave_secs {
        0 => None,
        secs => Some(Duration::from_secs(u64::from(secs))),
    };
    let mut fired = FiredTimers::new();
    let mut last = Instant::now();
    let mut next_autosave = autosave.map(|every| last + every);

    loop {
        std::thread::sleep(poll);
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        let before = ctrl.view();

        ctrl.timer_mut().tick(dt, &mut fired);
        for handle in fired.drain() {
            ctrl.on_timer(handle);
        }

        let redraw = match drain_input(ctrl) {
            Flow::Continue { redraw } => redraw,
            Flow::Exit => {
                info!("Bye.");
                return Ok(());
            }
        };

        if next_autosave.is_some_and(|due| now >= due) {
            ctrl.checkpoint();
            next_autosave = autosave.map(|every| now + every);
        }

        if redraw || ctrl.view() != before {
            render(&ctrl.view());
        }
    }
}

fn status(ctrl: &mut Controller) -> Result<()> {
    let catch_up = ctrl.on_foreground();
    let view = ctrl.view();
    let report = StatusReport {
        pet: view,
        status: view.status_message(),
        regime: ctrl.regime(),
        catch_up,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut kv = open_store(&cli)?;
    let config = resolve_config(&cli, &kv)?;
    info!(
        "Tamo v{} (tick={}s, format={:?})",
        env!("CARGO_PKG_VERSION"),
        config.tick_interval_secs,
        config.snapshot_format
    );

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let mut ctrl = build_controller(config, kv);
            run(&mut ctrl)
        }
        Commands::Status => {
            let mut ctrl = build_controller(config, kv);
            status(&mut ctrl)
        }
        Commands::Forget => {
            let mut store = SnapshotStore::new(kv, config.namespace, config.snapshot_format);
            store.clear().context("deleting saved pet")?;
            println!("Saved pet deleted.");
            Ok(())
        }
        Commands::Config { write } => {
            if write {
                kv.save_config(&config).context("saving config")?;
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
