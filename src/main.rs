//! Booking Dashboard
//!
//! Live terminal dashboard. Loads immediately, reloads on a fixed interval
//! and redraws whenever the dashboard state changes.
//!
//! Commands (type and press enter):
//! - `r` refresh now
//! - `m <id>` mark a notification read
//! - `a` mark all notifications read
//! - `f <all|unread|high>` change the notification filter
//! - `q` quit (Ctrl-C works too)

use anyhow::Context;
use booking_dashboard::{
    logging, poller, BookingApiClient, Config, Dashboard, DashboardError, NotificationFilter,
    RenderOptions, SessionContext,
};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "booking-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live booking management dashboard")]
struct Args {
    /// Config file (default: standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Booking API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token
    #[arg(long)]
    token: Option<String>,

    /// Refresh interval in seconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,
}

/// A line typed by the user
#[derive(Debug, PartialEq)]
enum Command {
    Refresh,
    MarkRead(i64),
    MarkAllRead,
    Filter(NotificationFilter),
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let command = parts.next().unwrap_or("").to_lowercase();
        let arg = parts.next();

        match command.as_str() {
            "r" | "refresh" => Ok(Command::Refresh),
            "a" | "all" => Ok(Command::MarkAllRead),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            "m" | "read" => {
                let id = arg.ok_or_else(|| "Usage: m <notification id>".to_string())?;
                id.parse()
                    .map(Command::MarkRead)
                    .map_err(|_| format!("Invalid notification id: {}", id))
            }
            "f" | "filter" => {
                let mode = arg.ok_or_else(|| "Usage: f <all|unread|high>".to_string())?;
                mode.parse().map(Command::Filter)
            }
            "" => Err(String::new()),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

/// What one read from stdin means to the main loop
#[derive(Debug, PartialEq)]
enum InputEvent {
    Command(Command),
    Invalid(String),
    Closed,
}

fn input_event(line: Option<String>) -> InputEvent {
    match line {
        Some(line) => match line.parse() {
            Ok(command) => InputEvent::Command(command),
            Err(message) => InputEvent::Invalid(message),
        },
        None => InputEvent::Closed,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    if let Some(token) = args.token {
        config.session.token = Some(token);
    }
    if let Some(secs) = args.interval {
        config.dashboard.refresh_interval_secs = secs;
    }

    // The screen belongs to the dashboard, so logs go to a file
    if config.logging.file.is_none() {
        config.logging.file = default_log_file();
    }
    logging::init(&config.logging)?;

    tracing::info!("Booking Dashboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Booking API: {}", config.api.base_url);

    let api = Arc::new(
        BookingApiClient::new(&config.api).context("Failed to create booking API client")?,
    );
    let session = SessionContext::from_config(&config.session);
    let dashboard = Arc::new(Dashboard::new(
        api,
        session,
        config.dashboard.default_filter,
    ));

    let options = RenderOptions {
        color: !args.no_color,
        interactive: true,
        recent_activity_limit: config.dashboard.recent_activity_limit,
    };

    let poller = poller::spawn(dashboard.clone(), config.refresh_interval());
    let mut revisions = dashboard.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut status: Option<String> = None;
    let mut stdin_closed = false;

    draw(&dashboard, &options, status.as_deref()).await;

    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                draw(&dashboard, &options, status.as_deref()).await;
            }
            line = lines.next_line(), if !stdin_closed => {
                match line.map(input_event) {
                    Ok(InputEvent::Command(Command::Quit)) => break,
                    Ok(InputEvent::Command(command)) => {
                        status = None;
                        dispatch(dashboard.clone(), command);
                    }
                    Ok(InputEvent::Invalid(message)) => {
                        status = if message.is_empty() { None } else { Some(message) };
                        draw(&dashboard, &options, status.as_deref()).await;
                    }
                    // Keep polling and redrawing until Ctrl-C
                    Ok(InputEvent::Closed) => {
                        tracing::info!("stdin closed, commands disabled");
                        stdin_closed = true;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read from stdin");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    tracing::info!("Shutting down...");
    poller.stop().await;
    Ok(())
}

/// Run a user action in the background so the screen stays responsive
fn dispatch(dashboard: Arc<Dashboard>, command: Command) {
    tokio::spawn(async move {
        match command {
            Command::Refresh => match dashboard.refresh().await {
                Ok(_) | Err(DashboardError::Unauthenticated) => {}
                Err(e) => tracing::debug!(error = %e, "Manual refresh failed"),
            },
            Command::MarkRead(id) => {
                dashboard.mark_read(id).await;
            }
            Command::MarkAllRead => {
                dashboard.mark_all_read().await;
            }
            Command::Filter(filter) => dashboard.set_filter(filter).await,
            Command::Quit => {}
        }
    });
}

async fn draw(dashboard: &Dashboard, options: &RenderOptions, status: Option<&str>) {
    let state = dashboard.snapshot().await;
    let screen = booking_dashboard::render(&state, options);

    let mut stdout = std::io::stdout().lock();
    // Clear screen and move the cursor home before each frame
    let _ = write!(stdout, "\x1b[2J\x1b[H{}", screen);
    if let Some(status) = status {
        let _ = writeln!(stdout, "\n{}", status);
    }
    let _ = write!(stdout, "> ");
    let _ = stdout.flush();
}

fn default_log_file() -> Option<String> {
    dirs::data_local_dir().map(|dir| {
        dir.join("booking-dashboard")
            .join("dashboard.log")
            .to_string_lossy()
            .to_string()
    })
}
