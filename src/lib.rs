//! # Booking Dashboard
//!
//! Booking Management Dashboard - polls a booking-management API for pending
//! approvals and notifications, renders summary statistics and lets the user
//! mark notifications read.
//!
//! ## Features
//!
//! - **Concurrent loading**: approvals, notifications and unread count are
//!   fetched in parallel on every refresh
//! - **Race-free refresh**: superseded load cycles are discarded
//! - **Notification actions**: mark one or all notifications read
//! - **Live view**: periodic polling with a reactive text renderer
//!
//! ## Modules
//!
//! - [`api`]: REST client for the booking-management backend
//! - [`dashboard`]: Dashboard state and the operations that mutate it
//! - [`store`]: Notification list, unread counter and filtering
//! - [`render`]: Stat cards, activity feed and notification panel
//! - [`poller`]: Fixed-interval reload task
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use booking_dashboard::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let api = Arc::new(BookingApiClient::new(&config.api)?);
//!     let session = SessionContext::from_config(&config.session);
//!
//!     let dashboard = Dashboard::new(api, session, NotificationFilter::Unread);
//!     dashboard.load().await?;
//!
//!     let state = dashboard.snapshot().await;
//!     println!("{}", render(&state, &RenderOptions::default()));
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod notification;
pub mod poller;
pub mod render;
pub mod session;
pub mod store;

// Re-export top-level types for convenience
pub use api::{ApiError, ApiResult, BookingApi, BookingApiClient};

pub use config::{
    generate_default_config, ApiConfig, Config, ConfigError, DashboardConfig, LoggingConfig,
    SessionConfig,
};

pub use dashboard::{BookingStats, Dashboard, DashboardState, LoadOutcome};

pub use error::{DashboardError, DashboardResult};

pub use notification::{Notification, NotificationFilter, NotificationType, Priority};

pub use poller::PollerHandle;

pub use render::{render, DashboardView, RenderOptions};

pub use session::SessionContext;

pub use store::NotificationStore;
