//! `cacamba`: terminal UI for tracking rented dumpsters (caçambas).
//!
//! # Usage
//!
//! ```
//! cacamba
//! cacamba --config ~/cacamba/config.json
//! cacamba --store /srv/planilhas/cacambas.csv
//! ```
//!
//! On first run the operator is asked where to keep the spreadsheet; the
//! answer is saved to `config.json` next to the executable. Logs go to
//! `cacamba.log` beside the settings file (`RUST_LOG` adjusts the level).

mod app;
mod console;
mod settings;
mod ui;

use std::{
  fs::OpenOptions,
  io::{self, BufRead, Write},
  path::{Path, PathBuf},
  sync::Mutex,
};

use anyhow::{Context, Result};
use app::{Action, App};
use cacamba_core::workflow::{Operator, Workflow};
use cacamba_locate::{GeoClient, LeafletMap};
use cacamba_store_csv::CsvStore;
use chrono::Local;
use clap::Parser;
use console::{Console, Tui};
use crossterm::{
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::{AppConfig, CONFIG_FILE_NAME, DEFAULT_STORE_FILE_NAME, PromptReason};
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "cacamba.log";

type Tracker = Workflow<CsvStore, GeoClient, LeafletMap>;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cacamba", version, about = "Track rented dumpsters and when to pick them up")]
struct Args {
  /// Settings file (default: config.json next to the executable).
  #[arg(short, long, value_name = "FILE", env = "CACAMBA_CONFIG")]
  config: Option<PathBuf>,

  /// Use this spreadsheet and skip the saved location.
  #[arg(short, long, value_name = "FILE")]
  store: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let config_path = args.config.unwrap_or_else(default_config_path);

  init_tracing(&config_path)?;

  // An explicit --store must open as given; a saved location may fall back.
  let (settings, store, store_path) = match args.store {
    Some(store_path) => {
      let settings = AppConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "settings unreadable, using defaults");
        AppConfig::default()
      });
      let store = CsvStore::open(store_path.clone())
        .await
        .with_context(|| format!("opening container store {}", store_path.display()))?;
      (settings, store, store_path)
    }
    None => {
      let fallback = settings::default_store_path(&config_path);
      let (mut settings, store_path) = settings::resolve_store_path(&config_path, |reason| {
        ask_store_location(reason, &fallback)
      });
      let (store, store_path) =
        settings::open_store(&config_path, &mut settings, store_path).await?;
      (settings, store, store_path)
    }
  };
  info!(store = %store_path.display(), config = %config_path.display(), "starting");

  let locator = GeoClient::new(settings.geo_config()).context("building HTTP client")?;
  let map = LeafletMap::beside(&store_path, &settings.map_file_name);
  let workflow = Workflow::new(store, locator, map);

  let mut app = App::new(store_path);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app, &workflow).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  if let Err(e) = &run_result {
    error!(error = %format!("{e:#}"), "exiting on error");
  }
  run_result
}

// ─── Startup helpers ──────────────────────────────────────────────────────────

fn default_config_path() -> PathBuf {
  std::env::current_exe()
    .ok()
    .and_then(|exe| exe.parent().map(Path::to_path_buf))
    .unwrap_or_else(|| PathBuf::from("."))
    .join(CONFIG_FILE_NAME)
}

/// Log to a file beside the settings; the terminal belongs to the UI.
fn init_tracing(config_path: &Path) -> Result<()> {
  let dir = match config_path.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
    _ => PathBuf::from("."),
  };
  std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

  let log_path = dir.join(LOG_FILE_NAME);
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(&log_path)
    .with_context(|| format!("opening log file {}", log_path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

/// Plain stdin prompt, used before the terminal UI starts.
fn ask_store_location(reason: &PromptReason, fallback: &Path) -> Option<PathBuf> {
  match reason {
    PromptReason::FirstRun => {
      println!("No settings found. Where should the container spreadsheet be kept?");
    }
    PromptReason::Relocate { missing } => {
      println!(
        "The folder holding {} no longer exists. Where should the spreadsheet be kept now?",
        missing.display()
      );
    }
  }
  print!("Spreadsheet path [{}]: ", fallback.display());
  io::stdout().flush().ok();

  let mut line = String::new();
  io::stdin().lock().read_line(&mut line).ok()?;
  let line = line.trim();
  if line.is_empty() {
    return None;
  }

  let chosen = std::path::absolute(line).unwrap_or_else(|_| PathBuf::from(line));
  if chosen.is_dir() {
    Some(chosen.join(DEFAULT_STORE_FILE_NAME))
  } else {
    Some(chosen)
  }
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(terminal: &mut Tui, app: &mut App, workflow: &Tracker) -> Result<()> {
  // Initial list, then one alert per container due for pickup.
  {
    let mut console = Console::new(terminal, app);
    let containers = workflow.containers(&mut console).await;
    console.refresh(&containers);
    workflow.notify_overdue_among(&mut console, &containers, Local::now().date_naive());
  }

  loop {
    terminal.draw(|f| ui::draw(f, &*app)).context("drawing frame")?;

    let Some(key) = console::next_key().context("reading terminal input")? else {
      continue;
    };

    let action = app.handle_key(key);
    if action == Action::Quit {
      break;
    }

    let mut console = Console::new(terminal, app);
    match action {
      Action::Register => {
        workflow.register(&mut console).await;
      }
      Action::Remove => {
        workflow.remove(&mut console).await;
      }
      Action::ShowMap => {
        workflow.show_map(&mut console).await;
      }
      Action::Reload => {
        let containers = workflow.containers(&mut console).await;
        console.refresh(&containers);
      }
      Action::None | Action::Quit => {}
    }
  }

  Ok(())
}
