//! Presentation Layer
//!
//! Pure derivations from [`DashboardState`] to what the user sees: stat
//! cards, the recent activity feed, the notification panel and the month
//! summary. Nothing here performs I/O.

use chrono::NaiveDateTime;
use std::fmt;

use crate::dashboard::{BookingStats, DashboardState};
use crate::notification::{Notification, NotificationFilter, NotificationType, Priority};

/// Placeholder for figures the backend does not provide
const NOT_AVAILABLE: &str = "—";

const CARD_WIDTH: usize = 24;

/// Icon for a notification type
pub fn notification_icon(kind: NotificationType) -> &'static str {
    match kind {
        NotificationType::BookingCreated => "📅",
        NotificationType::BookingApproved => "✅",
        NotificationType::BookingRejected => "❌",
        NotificationType::BookingCancelled => "🚫",
        NotificationType::PaymentDue => "💰",
        NotificationType::PaymentOverdue => "⚠️",
        NotificationType::PaymentReceived => "💵",
        NotificationType::LateFeeApplied => "💸",
        _ => "🔔",
    }
}

/// Visual emphasis of a notification row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Alert,
    Success,
    Info,
}

impl Tone {
    fn ansi(&self) -> &'static str {
        match self {
            Tone::Alert => "\x1b[31m",
            Tone::Success => "\x1b[32m",
            Tone::Info => "\x1b[34m",
        }
    }
}

/// Tone for a notification. High priority wins over the type.
pub fn notification_tone(priority: Priority, kind: NotificationType) -> Tone {
    if priority == Priority::High {
        return Tone::Alert;
    }
    match kind {
        NotificationType::PaymentReceived => Tone::Success,
        NotificationType::BookingApproved => Tone::Success,
        NotificationType::BookingRejected => Tone::Alert,
        _ => Tone::Info,
    }
}

/// Direction shown on a stat card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn arrow(&self) -> Option<&'static str> {
        match self {
            Trend::Up => Some("↗"),
            Trend::Down => Some("↘"),
            Trend::Neutral => None,
        }
    }
}

/// One summary card
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub caption: String,
    pub trend: Trend,
}

impl StatCard {
    /// Caption prefixed with the trend arrow, if any
    pub fn trend_line(&self) -> String {
        match self.trend.arrow() {
            Some(arrow) => format!("{} {}", arrow, self.caption),
            None => self.caption.clone(),
        }
    }
}

/// The four summary cards, in display order
pub fn stat_cards(stats: &BookingStats) -> [StatCard; 4] {
    let (overdue_caption, overdue_trend) = match stats.overdue_payments {
        Some(n) if n > 0 => ("Action needed", Trend::Down),
        Some(_) => ("All up to date", Trend::Neutral),
        None => ("Not available", Trend::Neutral),
    };

    [
        StatCard {
            label: "Active Bookings",
            value: optional_count(stats.active_bookings),
            caption: "This month".to_string(),
            trend: Trend::Up,
        },
        StatCard {
            label: "Monthly Revenue",
            value: stats
                .revenue
                .map(format_currency)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            caption: match stats.growth_percent {
                Some(growth) => format!("+{}% growth", growth),
                None => "Growth not available".to_string(),
            },
            trend: Trend::Up,
        },
        StatCard {
            label: "Pending Approvals",
            value: stats.pending_approvals.to_string(),
            caption: "Requires attention".to_string(),
            trend: Trend::Neutral,
        },
        StatCard {
            label: "Overdue Payments",
            value: optional_count(stats.overdue_payments),
            caption: overdue_caption.to_string(),
            trend: overdue_trend,
        },
    ]
}

/// Badge text for the notification bell: nothing at zero, "9+" above nine
pub fn unread_badge(count: u64) -> Option<String> {
    match count {
        0 => None,
        1..=9 => Some(count.to_string()),
        _ => Some("9+".to_string()),
    }
}

/// Format rupees the en-IN way with no fractional digits.
///
/// Rounds half away from zero and groups digits as lakh/crore
/// (`125000.0` becomes `₹1,25,000`).
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0".to_string();
    }

    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_indian(&digits);

    if rounded < 0.0 {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Short month, day and 12-hour time, e.g. `May 1, 10:30 AM`
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%b %-d, %I:%M %p").to_string()
}

fn optional_count(value: Option<u64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Rendering switches
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Emit ANSI colours
    pub color: bool,
    /// Show keyboard hints of the live dashboard
    pub interactive: bool,
    /// Entries in the recent activity feed
    pub recent_activity_limit: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: false,
            interactive: false,
            recent_activity_limit: 5,
        }
    }
}

/// Text rendering of the whole dashboard screen
pub struct DashboardView<'a> {
    state: &'a DashboardState,
    options: &'a RenderOptions,
}

impl<'a> DashboardView<'a> {
    pub fn new(state: &'a DashboardState, options: &'a RenderOptions) -> Self {
        Self { state, options }
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if self.options.color {
            format!("{}{}\x1b[0m", tone.ansi(), text)
        } else {
            text.to_string()
        }
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bell = match unread_badge(self.state.unread_count()) {
            Some(badge) => format!("🔔 {}", badge),
            None => "🔔".to_string(),
        };
        let refreshing = if self.state.refreshing {
            "  ⟳ refreshing"
        } else {
            ""
        };

        writeln!(f, "📊 Booking Management Dashboard    {}{}", bell, refreshing)?;
        writeln!(f, "Monitor and manage your property bookings in real-time")?;
        if let Some(loaded) = self.state.last_loaded {
            writeln!(
                f,
                "Last updated {}",
                loaded.with_timezone(&chrono::Local).format("%H:%M:%S")
            )?;
        }
        writeln!(f)
    }

    fn write_cards(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = stat_cards(&self.state.stats);

        for card in &cards {
            write!(f, "{:<width$}", card.label, width = CARD_WIDTH)?;
        }
        writeln!(f)?;
        for card in &cards {
            write!(f, "{:<width$}", card.value, width = CARD_WIDTH)?;
        }
        writeln!(f)?;
        for card in &cards {
            let line = format!("{:<width$}", card.trend_line(), width = CARD_WIDTH);
            match card.trend {
                Trend::Up => write!(f, "{}", self.paint(&line, Tone::Success))?,
                Trend::Down => write!(f, "{}", self.paint(&line, Tone::Alert))?,
                Trend::Neutral => write!(f, "{}", line)?,
            }
        }
        writeln!(f)?;
        writeln!(f)
    }

    fn write_recent_activity(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recent Activity")?;
        writeln!(f, "{}", "-".repeat(60))?;

        if self.state.store.is_empty() {
            writeln!(f, "  No recent activity")?;
            return writeln!(f);
        }

        let recent = self.state.filtered_notifications();
        for notification in recent.iter().take(self.options.recent_activity_limit) {
            let tone = notification_tone(notification.priority, notification.kind);
            writeln!(
                f,
                "{} {} {}",
                self.paint("┃", tone),
                notification_icon(notification.kind),
                notification.title
            )?;
            if !notification.message.is_empty() {
                writeln!(f, "{}    {}", self.paint("┃", tone), notification.message)?;
            }
            write!(
                f,
                "{}    {}",
                self.paint("┃", tone),
                format_timestamp(&notification.created_at)
            )?;
            if !notification.is_read && self.options.interactive {
                write!(f, "    [m {}] mark read", notification.id)?;
            }
            writeln!(f)?;
        }
        writeln!(f)
    }

    fn write_notifications(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unread = self.state.unread_count();

        write!(f, "Notifications")?;
        if unread > 0 && self.options.interactive {
            write!(f, "    [a] mark all read")?;
        }
        writeln!(f)?;

        let tabs: Vec<String> = NotificationFilter::ALL
            .iter()
            .map(|filter| {
                let mut tab = filter.as_str().to_string();
                if *filter == NotificationFilter::Unread && unread > 0 {
                    tab = format!("{} ({})", tab, unread);
                }
                if *filter == self.state.filter {
                    format!("[{}]", tab)
                } else {
                    format!(" {} ", tab)
                }
            })
            .collect();
        writeln!(f, "{}", tabs.join(" "))?;
        writeln!(f, "{}", "-".repeat(60))?;

        let filtered = self.state.filtered_notifications();
        if filtered.is_empty() {
            writeln!(f, "  No notifications found")?;
            return writeln!(f);
        }

        for notification in filtered {
            writeln!(f, "{}", self.panel_row(notification))?;
        }
        writeln!(f)
    }

    fn panel_row(&self, notification: &Notification) -> String {
        let unread_marker = if notification.is_read { " " } else { "•" };
        let high_marker = if notification.is_high_priority() {
            self.paint(" ●", Tone::Alert)
        } else {
            String::new()
        };

        format!(
            "{} #{:<5} {} {:<40} {}{}",
            unread_marker,
            notification.id,
            notification_icon(notification.kind),
            notification.title,
            format_timestamp(&notification.created_at),
            high_marker
        )
    }

    fn write_month_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.state.stats;

        writeln!(f, "This Month Summary")?;
        writeln!(f, "{}", "-".repeat(60))?;
        writeln!(
            f,
            "  ✅ {:<22}{}",
            "Bookings Approved",
            optional_count(stats.bookings_approved)
        )?;
        writeln!(
            f,
            "  💵 {:<22}{}",
            "Payments Received",
            stats
                .payments_received
                .map(format_currency)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        )?;
        writeln!(
            f,
            "  ⭐ {:<22}{}",
            "Avg Rating",
            stats
                .average_rating
                .map(|r| format!("{:.1}/5", r))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        )?;
        writeln!(
            f,
            "  👥 {:<22}{}",
            "Active Tenants",
            optional_count(stats.active_bookings)
        )
    }
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.state.loading {
            return writeln!(f, "Loading dashboard...");
        }

        if let Some(error) = &self.state.error {
            writeln!(f, "{}", self.paint("✖ Error", Tone::Alert))?;
            writeln!(f, "{}", error)?;
            if self.options.interactive {
                writeln!(f)?;
                writeln!(f, "Press r to retry, q to quit")?;
            }
            return Ok(());
        }

        self.write_header(f)?;
        self.write_cards(f)?;
        self.write_recent_activity(f)?;
        self.write_notifications(f)?;
        self.write_month_summary(f)?;

        if self.options.interactive {
            writeln!(f)?;
            writeln!(
                f,
                "r refresh · m <id> mark read · a mark all read · f <all|unread|high> filter · q quit"
            )?;
        }
        Ok(())
    }
}

/// Render the dashboard screen to a string
pub fn render(state: &DashboardState, options: &RenderOptions) -> String {
    DashboardView::new(state, options).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(125000.0), "₹1,25,000");
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.0), "₹999");
        assert_eq!(format_currency(1000.0), "₹1,000");
        assert_eq!(format_currency(12345678.0), "₹1,23,45,678");
        assert_eq!(format_currency(1499.5), "₹1,500");
        assert_eq!(format_currency(-2500.4), "-₹2,500");
        assert_eq!(format_currency(f64::NAN), "₹0");
    }

    #[test]
    fn test_unread_badge() {
        assert_eq!(unread_badge(0), None);
        assert_eq!(unread_badge(5).as_deref(), Some("5"));
        assert_eq!(unread_badge(9).as_deref(), Some("9"));
        assert_eq!(unread_badge(12).as_deref(), Some("9+"));
    }

    #[test]
    fn test_format_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(format_timestamp(&ts), "May 1, 10:30 AM");

        let ts = NaiveDate::from_ymd_opt(2024, 12, 24)
            .unwrap()
            .and_hms_opt(18, 5, 0)
            .unwrap();
        assert_eq!(format_timestamp(&ts), "Dec 24, 06:05 PM");
    }

    #[test]
    fn test_tone_precedence() {
        use NotificationType::*;

        assert_eq!(notification_tone(Priority::High, PaymentReceived), Tone::Alert);
        assert_eq!(notification_tone(Priority::Low, PaymentReceived), Tone::Success);
        assert_eq!(notification_tone(Priority::Medium, BookingApproved), Tone::Success);
        assert_eq!(notification_tone(Priority::Medium, BookingRejected), Tone::Alert);
        assert_eq!(notification_tone(Priority::Urgent, BookingCreated), Tone::Info);
        assert_eq!(notification_tone(Priority::Low, Other), Tone::Info);
    }

    #[test]
    fn test_icons() {
        assert_eq!(notification_icon(NotificationType::BookingCreated), "📅");
        assert_eq!(notification_icon(NotificationType::PaymentOverdue), "⚠️");
        assert_eq!(notification_icon(NotificationType::ReviewRequest), "🔔");
        assert_eq!(notification_icon(NotificationType::Other), "🔔");
    }

    #[test]
    fn test_stat_cards() {
        let stats = BookingStats {
            pending_approvals: 3,
            revenue: Some(125000.0),
            growth_percent: Some(12.0),
            overdue_payments: Some(2),
            ..Default::default()
        };

        let cards = stat_cards(&stats);
        assert_eq!(cards[0].label, "Active Bookings");
        assert_eq!(cards[0].value, "—");
        assert_eq!(cards[1].value, "₹1,25,000");
        assert_eq!(cards[1].trend_line(), "↗ +12% growth");
        assert_eq!(cards[2].value, "3");
        assert_eq!(cards[2].trend_line(), "Requires attention");
        assert_eq!(cards[3].caption, "Action needed");
        assert_eq!(cards[3].trend, Trend::Down);

        let cards = stat_cards(&BookingStats {
            overdue_payments: Some(0),
            ..Default::default()
        });
        assert_eq!(cards[3].caption, "All up to date");
        assert_eq!(cards[3].trend, Trend::Neutral);
        assert_eq!(cards[1].caption, "Growth not available");
    }

    fn loaded_state() -> DashboardState {
        use crate::notification::Notification;

        let created_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let make = |id: i64, kind, priority, is_read| Notification {
            id,
            kind,
            title: format!("Notification {}", id),
            message: String::new(),
            priority,
            is_read,
            created_at,
            action_url: None,
            expires_at: None,
        };

        let mut state = DashboardState::new(NotificationFilter::Unread);
        state.loading = false;
        state.stats.pending_approvals = 3;
        state.store.replace_notifications(vec![
            make(1, NotificationType::PaymentOverdue, Priority::High, false),
            make(2, NotificationType::BookingApproved, Priority::Low, true),
        ]);
        state.store.set_unread_count(12);
        state
    }

    #[test]
    fn test_render_loading_and_error() {
        let options = RenderOptions::default();
        let state = DashboardState::new(NotificationFilter::Unread);
        assert_eq!(render(&state, &options), "Loading dashboard...\n");

        let mut state = loaded_state();
        state.error = Some("Please log in to view dashboard".to_string());
        let screen = render(&state, &options);
        assert!(screen.contains("Please log in to view dashboard"));
        assert!(!screen.contains("Recent Activity"));
    }

    #[test]
    fn test_render_dashboard() {
        let options = RenderOptions {
            interactive: true,
            ..Default::default()
        };
        let screen = render(&loaded_state(), &options);

        assert!(screen.contains("🔔 9+"));
        assert!(screen.contains("Pending Approvals"));
        assert!(screen.contains("[unread (12)]"));
        assert!(screen.contains("Notification 1"));
        assert!(screen.contains("[m 1] mark read"));
        assert!(screen.contains("[a] mark all read"));
        // Read notification is hidden by the unread filter
        assert!(!screen.contains("Notification 2"));
        assert!(screen.contains("This Month Summary"));
        assert!(!screen.contains("\x1b["));
    }

    #[test]
    fn test_render_empty_lists() {
        let mut state = loaded_state();
        state.store.replace_notifications(Vec::new());
        state.store.set_unread_count(0);

        let screen = render(&state, &RenderOptions::default());
        assert!(screen.contains("No recent activity"));
        assert!(screen.contains("No notifications found"));
        assert!(!screen.contains("mark all read"));
    }
}
