//! Booking API Client
//!
//! HTTP client for the booking-management REST API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{ActionAck, PendingApprovalsResponse, UnreadCountResponse};
use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::notification::Notification;

/// Operations the dashboard needs from the booking-management backend.
///
/// Every call takes the bearer token explicitly; implementations hold no
/// session state.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `GET /api/booking-management/pending-approvals`
    async fn pending_approvals(&self, token: &str) -> ApiResult<PendingApprovalsResponse>;

    /// `GET /api/booking-notifications/unread`
    async fn unread_notifications(&self, token: &str) -> ApiResult<Vec<Notification>>;

    /// `GET /api/booking-notifications/unread-count`
    async fn unread_count(&self, token: &str) -> ApiResult<UnreadCountResponse>;

    /// `PATCH /api/booking-notifications/{id}/read`
    async fn mark_read(&self, token: &str, id: i64) -> ApiResult<ActionAck>;

    /// `PATCH /api/booking-notifications/mark-all-read`
    async fn mark_all_read(&self, token: &str) -> ApiResult<ActionAck>;
}

/// reqwest-backed [`BookingApi`]
pub struct BookingApiClient {
    client: Client,
    base_url: String,
}

impl BookingApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> ApiResult<T> {
        let request = self.client.get(self.url(path));
        self.send_json(request, token).await
    }

    async fn patch_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> ApiResult<T> {
        let request = self.client.patch(self.url(path));
        self.send_json(request, token).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: &str,
    ) -> ApiResult<T> {
        let response = request.bearer_auth(token).send().await?;
        let response = check_status(response).await?;

        // Decode from bytes so a malformed body maps to ApiError::Decode
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: if message.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            message
        },
    })
}

#[async_trait]
impl BookingApi for BookingApiClient {
    async fn pending_approvals(&self, token: &str) -> ApiResult<PendingApprovalsResponse> {
        self.get_json("/api/booking-management/pending-approvals", token)
            .await
    }

    async fn unread_notifications(&self, token: &str) -> ApiResult<Vec<Notification>> {
        self.get_json("/api/booking-notifications/unread", token).await
    }

    async fn unread_count(&self, token: &str) -> ApiResult<UnreadCountResponse> {
        self.get_json("/api/booking-notifications/unread-count", token)
            .await
    }

    async fn mark_read(&self, token: &str, id: i64) -> ApiResult<ActionAck> {
        self.patch_json(&format!("/api/booking-notifications/{}/read", id), token)
            .await
    }

    async fn mark_all_read(&self, token: &str) -> ApiResult<ActionAck> {
        self.patch_json("/api/booking-notifications/mark-all-read", token)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let config = ApiConfig {
            base_url: "http://localhost:8080/".to_string(),
            request_timeout_secs: 5,
        };
        let client = BookingApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.url("/api/booking-notifications/unread"),
            "http://localhost:8080/api/booking-notifications/unread"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let config = ApiConfig {
            // Port 9 (discard) is closed on test machines
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
        };
        let client = BookingApiClient::new(&config).unwrap();

        let err = client.unread_count("token").await.unwrap_err();
        assert!(!err.is_status());
    }
}
