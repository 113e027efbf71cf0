//! Wire Types
//!
//! Request/response bodies of the booking-management API.

use serde::{Deserialize, Serialize};

/// Body of `GET /api/booking-management/pending-approvals`.
///
/// Only the number of bookings matters to the dashboard, so the entries are
/// kept as raw JSON.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApprovalsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rent_bookings: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pg_bookings: Vec<serde_json::Value>,
}

impl PendingApprovalsResponse {
    /// Pending approvals across both booking categories
    pub fn pending_count(&self) -> u64 {
        (self.rent_bookings.len() + self.pg_bookings.len()) as u64
    }
}

/// Body of `GET /api/booking-notifications/unread-count`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    #[serde(default)]
    pub unread_count: Option<i64>,
}

impl UnreadCountResponse {
    /// Unread count clamped to the non-negative range, missing values as 0
    pub fn count(&self) -> u64 {
        self.unread_count.unwrap_or(0).max(0) as u64
    }
}

/// Acknowledgement returned by the PATCH endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActionAck {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_count_sums_categories() {
        let body: PendingApprovalsResponse =
            serde_json::from_str(r#"{"rentBookings":[1,2],"pgBookings":[3]}"#).unwrap();
        assert_eq!(body.pending_count(), 3);
    }

    #[test]
    fn test_pending_count_missing_arrays() {
        let body: PendingApprovalsResponse =
            serde_json::from_str(r#"{"rentBookings":null,"totalElements":4}"#).unwrap();
        assert_eq!(body.pending_count(), 0);
    }

    #[test]
    fn test_unread_count() {
        let body: UnreadCountResponse = serde_json::from_str(r#"{"unreadCount":12}"#).unwrap();
        assert_eq!(body.count(), 12);

        let body: UnreadCountResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.count(), 0);

        let body: UnreadCountResponse = serde_json::from_str(r#"{"unreadCount":-2}"#).unwrap();
        assert_eq!(body.count(), 0);
    }

    #[test]
    fn test_action_ack() {
        let ack: ActionAck = serde_json::from_str(
            r#"{"status":"success","message":"Notification marked as read"}"#,
        )
        .unwrap();
        assert_eq!(ack.status, "success");
    }
}
