//! Booking-Management API
//!
//! Client side of the booking-management REST API.
//!
//! # Endpoints
//!
//! ## Approvals
//! - `GET /api/booking-management/pending-approvals` - Rent and PG bookings awaiting approval
//!
//! ## Notifications
//! - `GET /api/booking-notifications/unread` - Unread notifications
//! - `GET /api/booking-notifications/unread-count` - Unread counter
//! - `PATCH /api/booking-notifications/{id}/read` - Mark one notification read
//! - `PATCH /api/booking-notifications/mark-all-read` - Mark every notification read
//!
//! All endpoints require a bearer token.

mod client;
pub mod dto;
mod error;

pub use client::{BookingApi, BookingApiClient};
pub use dto::{ActionAck, PendingApprovalsResponse, UnreadCountResponse};
pub use error::{ApiError, ApiResult};
