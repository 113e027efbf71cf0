//! Notification Model
//!
//! Booking/payment events surfaced to the user, as served by
//! `/api/booking-notifications`.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A booking or payment event shown in the notification panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_read: bool,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<NaiveDateTime>,
}

impl Notification {
    pub fn is_high_priority(&self) -> bool {
        self.priority == Priority::High
    }
}

/// Kind of event a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    BookingCreated,
    BookingApproved,
    BookingRejected,
    BookingCancelled,
    BookingExtended,
    BookingTerminated,
    PaymentDue,
    PaymentOverdue,
    PaymentReceived,
    LateFeeApplied,
    ReviewRequest,
    ReviewReceived,
    MaintenanceRequest,
    ContractRenewal,
    SystemAnnouncement,
    #[serde(other)]
    Other,
}

/// Notification priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        };
        f.write_str(s)
    }
}

/// Filter applied to the notification panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFilter {
    All,
    #[default]
    Unread,
    High,
}

impl NotificationFilter {
    /// Tab order in the notification panel
    pub const ALL: [NotificationFilter; 3] = [
        NotificationFilter::All,
        NotificationFilter::Unread,
        NotificationFilter::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationFilter::All => "all",
            NotificationFilter::Unread => "unread",
            NotificationFilter::High => "high",
        }
    }
}

impl fmt::Display for NotificationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(NotificationFilter::All),
            "unread" => Ok(NotificationFilter::Unread),
            "high" => Ok(NotificationFilter::High),
            other => Err(format!(
                "Invalid notification filter: {}. Use: all, unread, high",
                other
            )),
        }
    }
}

/// Parse a backend timestamp.
///
/// The backend writes local date-times without an offset
/// (`2024-05-01T10:30:00`, optionally with fractional seconds). Values with
/// an offset are converted to local time.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
        None => Ok(None),
    }
}

fn null_as_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_deserialize_backend_notification() {
        let json = r#"{
            "id": 42,
            "type": "PAYMENT_OVERDUE",
            "title": "Rent overdue",
            "message": "Your rent for May is overdue",
            "priority": "HIGH",
            "isRead": false,
            "createdAt": "2024-05-01T10:30:15.123456",
            "actionUrl": "/bookings/7",
            "expiresAt": "2024-05-31T10:30:15"
        }"#;

        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.id, 42);
        assert_eq!(n.kind, NotificationType::PaymentOverdue);
        assert_eq!(n.priority, Priority::High);
        assert!(!n.is_read);
        assert!(n.is_high_priority());
        assert_eq!(n.created_at.month(), 5);
        assert_eq!(n.created_at.hour(), 10);
        assert_eq!(n.action_url.as_deref(), Some("/bookings/7"));
        assert!(n.expires_at.is_some());
    }

    #[test]
    fn test_unknown_type_and_defaults() {
        let json = r#"{
            "id": 1,
            "type": "SOMETHING_NEW",
            "title": "Hello",
            "message": null,
            "createdAt": "2024-01-02T03:04:05"
        }"#;

        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.kind, NotificationType::Other);
        assert_eq!(n.priority, Priority::Medium);
        assert_eq!(n.message, "");
        assert!(!n.is_read);
        assert!(n.action_url.is_none());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-05-01T10:30:00").is_some());
        assert!(parse_timestamp("2024-05-01T10:30").is_some());
        assert!(parse_timestamp("2024-05-01T10:30:00Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("ALL".parse::<NotificationFilter>().unwrap(), NotificationFilter::All);
        assert_eq!(" high ".parse::<NotificationFilter>().unwrap(), NotificationFilter::High);
        assert!("urgent".parse::<NotificationFilter>().is_err());
        assert_eq!(NotificationFilter::default(), NotificationFilter::Unread);
    }
}
