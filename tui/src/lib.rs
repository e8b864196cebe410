//! Terminal front end for the accountability tracker.
//!
//! Thin presentation over `tracker-core`: the app loop applies state
//! transitions delivered over an mpsc channel, while mutations and refetches
//! run on a tokio runtime in the background.

mod app;
mod app_event;
mod app_event_sender;
mod cli;
mod forms;
mod render;

use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use tracker_backend_client::{ApiClient, resolve_base_url, store_app_password};
use tracker_core::{Config, DashboardState, Ranges, Synchronizer};

use crate::app::App;
use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
pub use crate::cli::{Cli, Command};

pub fn run_main(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(home) = cli.home {
        config.tracker_home = home;
    }
    if cli.backend_url.is_some() {
        config.backend_url = cli.backend_url;
    }

    match cli.command {
        Some(Command::SetPassword { password }) => {
            store_app_password(&config.tracker_home, &password)
                .context("failed to write auth.json")?;
            println!(
                "Password stored in {}",
                config.tracker_home.join("auth.json").display()
            );
            Ok(())
        }
        Some(Command::Reset { confirm }) => run_reset(&config, &confirm),
        None => run_tui(config),
    }
}

fn build_client(config: &Config) -> anyhow::Result<ApiClient> {
    let base = resolve_base_url(config.backend_url.as_deref())?;
    Ok(ApiClient::new(base, config.tracker_home.clone())?)
}

fn run_reset(config: &Config, confirm: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let receipt = runtime.block_on(client.admin_reset(confirm))?;
    for (collection, count) in &receipt.deleted {
        println!("{collection}: {count} deleted");
    }
    if !receipt.note.is_empty() {
        println!("{}", receipt.note);
    }
    Ok(())
}

fn init_logging(config: &Config) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = config.tracker_home.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::never(log_dir, "tracker-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn run_tui(config: Config) -> anyhow::Result<()> {
    // The terminal is occupied by the alternate screen, so logs go to a file
    // under the tracker home.
    let _log_guard = init_logging(&config)?;

    let client = build_client(&config)?;
    let sync = Synchronizer::new(Arc::new(client));

    let today = chrono::Local::now().date_naive();
    let ranges = Ranges::for_today(today, config.fitness_range_days, config.trip_history_limit);
    let state = DashboardState::new(today, ranges);

    let runtime = tokio::runtime::Runtime::new()?;
    let (tx, rx) = channel();
    let sender = AppEventSender::new(tx);

    spawn_input_thread(sender.clone());

    let mut app = App::new(state, sync, sender, runtime.handle().clone());
    app.start();

    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), EnterAlternateScreen)?;
    let restore = || {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), LeaveAlternateScreen);
    };
    // Restore the terminal even when a draw panics.
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), LeaveAlternateScreen);
        prev_hook(info);
    }));

    let result = event_loop(&mut app, &rx);
    restore();
    result
}

fn event_loop(app: &mut App, rx: &Receiver<AppEvent>) -> anyhow::Result<()> {
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;
    while !app.should_exit {
        terminal.draw(|frame| render::draw(frame, app))?;
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                app.handle_event(event);
                // Drain whatever else is queued before the next draw.
                while let Ok(event) = rx.try_recv() {
                    app.handle_event(event);
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}

/// Forwards terminal input to the app channel. Release events are dropped so
/// keys are not handled twice on Windows-style terminals.
fn spawn_input_thread(sender: AppEventSender) {
    std::thread::spawn(move || {
        loop {
            match crossterm::event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    sender.send(AppEvent::Key(key));
                }
                Ok(Event::Resize(_, _)) => sender.send(AppEvent::Resize),
                Ok(_) => {}
                Err(err) => {
                    tracing::error!("input thread terminating: {err}");
                    sender.send(AppEvent::ExitRequest);
                    break;
                }
            }
        }
    });
}
