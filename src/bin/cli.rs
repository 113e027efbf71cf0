//! Booking Dashboard CLI
//!
//! One-shot commands against the booking-management API:
//! - Show the dashboard once
//! - List notifications
//! - Mark notifications read
//! - Generate a config file

use anyhow::Context;
use booking_dashboard::render::{format_timestamp, notification_icon, unread_badge};
use booking_dashboard::{
    generate_default_config, logging, BookingApiClient, Config, Dashboard, DashboardError,
    DashboardState, NotificationFilter, RenderOptions, SessionContext,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "booking-dashboard-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Booking management dashboard from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Booking API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load once and print the dashboard
    Show,

    /// List notifications
    Notifications {
        /// Filter (all, unread, high)
        #[arg(short = 'F', long)]
        filter: Option<NotificationFilter>,
    },

    /// Mark a notification read
    MarkRead {
        /// Notification ID
        id: i64,
    },

    /// Mark all notifications read
    MarkAllRead,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let json = cli.format == "json";

    match cli.command {
        Commands::Show => {
            let config = load_config(
                cli.config.as_deref(),
                cli.api_url.as_deref(),
                cli.token.as_deref(),
            )?;
            let dashboard = connect(&config, config.dashboard.default_filter)?;
            load_or_exit(&dashboard, &config.api.base_url).await;
            let state = dashboard.snapshot().await;

            if json {
                print_json(&state)?;
            } else {
                let options = RenderOptions {
                    color: false,
                    interactive: false,
                    recent_activity_limit: config.dashboard.recent_activity_limit,
                };
                print!("{}", booking_dashboard::render(&state, &options));
            }
        }

        Commands::Notifications { filter } => {
            let config = load_config(
                cli.config.as_deref(),
                cli.api_url.as_deref(),
                cli.token.as_deref(),
            )?;
            let filter = filter.unwrap_or(config.dashboard.default_filter);
            let dashboard = connect(&config, filter)?;
            load_or_exit(&dashboard, &config.api.base_url).await;
            let state = dashboard.snapshot().await;

            if json {
                let notifications = state.filtered_notifications();
                println!("{}", serde_json::to_string_pretty(&notifications)?);
            } else {
                print_notifications(&state);
            }
        }

        Commands::MarkRead { id } => {
            let config = load_config(
                cli.config.as_deref(),
                cli.api_url.as_deref(),
                cli.token.as_deref(),
            )?;
            let dashboard = connect(&config, config.dashboard.default_filter)?;
            require_session(&dashboard);
            if dashboard.mark_read(id).await {
                println!("Notification {} marked as read", id);
            } else {
                eprintln!("Failed to mark notification {} as read (see logs)", id);
                std::process::exit(1);
            }
        }

        Commands::MarkAllRead => {
            let config = load_config(
                cli.config.as_deref(),
                cli.api_url.as_deref(),
                cli.token.as_deref(),
            )?;
            let dashboard = connect(&config, config.dashboard.default_filter)?;
            require_session(&dashboard);
            if dashboard.mark_all_read().await {
                println!("All notifications marked as read");
            } else {
                eprintln!("Failed to mark all notifications as read (see logs)");
                std::process::exit(1);
            }
        }

        Commands::Config { output } => {
            write_config(output.as_deref())?;
        }
    }

    Ok(())
}

/// Resolve config, apply command-line overrides and start logging
fn load_config(
    path: Option<&Path>,
    api_url: Option<&str>,
    token: Option<&str>,
) -> anyhow::Result<Config> {
    let mut config = Config::resolve(path)?;
    if let Some(url) = api_url {
        config.api.base_url = url.to_string();
    }
    if let Some(token) = token {
        config.session.token = Some(token.to_string());
    }
    logging::init(&config.logging)?;
    Ok(config)
}

fn connect(config: &Config, filter: NotificationFilter) -> anyhow::Result<Dashboard> {
    let api = Arc::new(
        BookingApiClient::new(&config.api).context("Failed to create booking API client")?,
    );
    let session = SessionContext::from_config(&config.session);
    Ok(Dashboard::new(api, session, filter))
}

async fn load_or_exit(dashboard: &Dashboard, api_url: &str) {
    match dashboard.load().await {
        Ok(_) => {}
        Err(DashboardError::Unauthenticated) => {
            eprintln!("Please log in to view dashboard");
            eprintln!();
            eprintln!("Provide a token with --token, BOOKING_AUTH_TOKEN or [session] in the config file");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Cannot load dashboard from {}", api_url);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn require_session(dashboard: &Dashboard) {
    if !dashboard.session().is_authenticated() {
        eprintln!("Please log in first: provide a token with --token or BOOKING_AUTH_TOKEN");
        std::process::exit(1);
    }
}

fn print_notifications(state: &DashboardState) {
    let notifications = state.filtered_notifications();
    let badge = unread_badge(state.unread_count()).unwrap_or_else(|| "0".to_string());

    println!("Notifications ({}) - unread: {}", state.filter, badge);
    println!();

    if notifications.is_empty() {
        println!("No notifications found");
        return;
    }

    println!(
        "{:<8} {:<3} {:<8} {:<40} {}",
        "ID", "", "Priority", "Title", "Created"
    );
    println!("{}", "-".repeat(80));

    for n in notifications {
        let marker = if n.is_read { "" } else { " *" };
        println!(
            "{:<8} {:<3} {:<8} {:<40} {}{}",
            n.id,
            notification_icon(n.kind),
            n.priority,
            n.title,
            format_timestamp(&n.created_at),
            marker
        );
    }
}

fn print_json(state: &DashboardState) -> anyhow::Result<()> {
    let body = serde_json::json!({
        "stats": {
            "pendingApprovals": state.stats.pending_approvals,
            "activeBookings": state.stats.active_bookings,
            "revenue": state.stats.revenue,
            "overduePayments": state.stats.overdue_payments,
            "growthPercent": state.stats.growth_percent,
        },
        "unreadCount": state.unread_count(),
        "filter": state.filter,
        "notifications": state.filtered_notifications(),
        "lastLoaded": state.last_loaded,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn write_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)
                .with_context(|| format!("Failed to write config to {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from([
            "booking-dashboard-cli",
            "notifications",
            "--filter",
            "high",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, "json");
        assert!(matches!(
            cli.command,
            Commands::Notifications {
                filter: Some(NotificationFilter::High)
            }
        ));

        let cli = Cli::try_parse_from(["booking-dashboard-cli", "mark-read", "42"]).unwrap();
        assert!(matches!(cli.command, Commands::MarkRead { id: 42 }));

        assert!(
            Cli::try_parse_from(["booking-dashboard-cli", "notifications", "-F", "urgent"])
                .is_err()
        );
    }

    #[test]
    fn test_config_command_writes_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cli = Cli::try_parse_from([
            "booking-dashboard-cli",
            "config",
            "--output",
            path.to_str().unwrap(),
        ])
        .unwrap();
        match cli.command {
            Commands::Config { output } => write_config(output.as_deref()).unwrap(),
            _ => panic!("expected config command"),
        }

        let written = std::fs::read_to_string(&path).unwrap();
        let config = Config::parse(&written).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
    }
}
