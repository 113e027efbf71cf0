//! Dashboard View
//!
//! Owns the dashboard state and the operations that mutate it:
//!
//! - **Loading**: three concurrent GETs merged into state, each cycle tagged
//!   with a generation so a slow, superseded response cannot overwrite
//!   newer data
//! - **Notification actions**: mark one / all notifications read
//! - **Filter selection** for the notification panel
//!
//! Every mutation bumps a revision published on a `watch` channel so a
//! renderer can redraw when something changed.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use crate::api::{ApiError, ApiResult, BookingApi, PendingApprovalsResponse, UnreadCountResponse};
use crate::error::{DashboardError, DashboardResult, LOGIN_PROMPT};
use crate::notification::{Notification, NotificationFilter};
use crate::session::SessionContext;
use crate::store::NotificationStore;

/// Summary figures shown on the stat cards.
///
/// Only `pending_approvals` has a backend source today. The other figures
/// stay `None` until the API exposes them and render as "not available".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingStats {
    pub pending_approvals: u64,
    pub active_bookings: Option<u64>,
    pub revenue: Option<f64>,
    pub overdue_payments: Option<u64>,
    pub growth_percent: Option<f64>,
    pub bookings_approved: Option<u64>,
    pub payments_received: Option<f64>,
    pub average_rating: Option<f64>,
}

/// Everything the presentation layer needs to draw the dashboard
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub stats: BookingStats,
    pub store: NotificationStore,
    pub filter: NotificationFilter,
    /// True until the first load cycle finishes
    pub loading: bool,
    /// True while a load cycle is in flight
    pub refreshing: bool,
    /// User-visible error from the latest load cycle
    pub error: Option<String>,
    pub last_loaded: Option<DateTime<Utc>>,
    generation: u64,
}

impl DashboardState {
    /// State of a freshly mounted dashboard, before the first load
    pub fn new(filter: NotificationFilter) -> Self {
        Self {
            stats: BookingStats::default(),
            store: NotificationStore::new(),
            filter,
            loading: true,
            refreshing: false,
            error: None,
            last_loaded: None,
            generation: 0,
        }
    }

    /// Notifications visible under the current filter
    pub fn filtered_notifications(&self) -> Vec<&Notification> {
        self.store.filtered(self.filter)
    }

    pub fn unread_count(&self) -> u64 {
        self.store.unread_count()
    }

    /// Merge one cycle's responses.
    ///
    /// A transport failure on any endpoint fails the cycle before anything
    /// is merged. Otherwise every slice that decoded is merged on its own:
    /// non-success statuses skip their slice, and a malformed body skips its
    /// slice but still fails the cycle.
    fn merge(&mut self, results: LoadResults) -> ApiResult<()> {
        let LoadResults {
            approvals,
            notifications,
            unread,
        } = results;

        let approvals = non_fatal(approvals, "pending-approvals")?;
        let notifications = non_fatal(notifications, "unread")?;
        let unread = non_fatal(unread, "unread-count")?;

        let mut decode_error = None;

        match approvals {
            Slice::Ready(approvals) => self.stats.pending_approvals = approvals.pending_count(),
            Slice::Malformed(e) => decode_error = decode_error.or(Some(e)),
            Slice::Skipped => {}
        }
        match notifications {
            Slice::Ready(notifications) => self.store.replace_notifications(notifications),
            Slice::Malformed(e) => decode_error = decode_error.or(Some(e)),
            Slice::Skipped => {}
        }
        match unread {
            Slice::Ready(unread) => self.store.set_unread_count(unread.count()),
            Slice::Malformed(e) => decode_error = decode_error.or(Some(e)),
            Slice::Skipped => {}
        }

        match decode_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Abandon the load cycle in flight, if any.
    ///
    /// Local edits made while a load is pending would otherwise be
    /// overwritten by data fetched before the edit.
    fn supersede_pending_load(&mut self) {
        if self.refreshing {
            self.generation += 1;
            self.refreshing = false;
            self.loading = false;
            tracing::debug!(
                generation = self.generation,
                "Local edit supersedes pending load"
            );
        }
    }
}

/// Responses gathered by one load cycle
struct LoadResults {
    approvals: ApiResult<PendingApprovalsResponse>,
    notifications: ApiResult<Vec<Notification>>,
    unread: ApiResult<UnreadCountResponse>,
}

/// One endpoint's contribution to a load cycle
enum Slice<T> {
    Ready(T),
    /// Non-success status, previous data kept
    Skipped,
    /// Success status with a body that did not decode
    Malformed(ApiError),
}

fn non_fatal<T>(result: ApiResult<T>, endpoint: &str) -> ApiResult<Slice<T>> {
    match result {
        Ok(value) => Ok(Slice::Ready(value)),
        Err(e) if e.is_status() => {
            tracing::debug!(endpoint, error = %e, "Endpoint returned an error status, keeping previous data");
            Ok(Slice::Skipped)
        }
        Err(e @ ApiError::Decode(_)) => {
            tracing::warn!(endpoint, error = %e, "Endpoint returned a malformed body");
            Ok(Slice::Malformed(e))
        }
        Err(e) => Err(e),
    }
}

/// What happened to a completed load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Responses were merged into state
    Applied,
    /// A newer cycle started meanwhile; responses were discarded
    Stale,
}

/// The booking management dashboard
pub struct Dashboard {
    api: Arc<dyn BookingApi>,
    session: SessionContext,
    state: RwLock<DashboardState>,
    revision: watch::Sender<u64>,
}

impl Dashboard {
    /// Create a dashboard talking to `api` on behalf of `session`
    pub fn new(
        api: Arc<dyn BookingApi>,
        session: SessionContext,
        filter: NotificationFilter,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            api,
            session,
            state: RwLock::new(DashboardState::new(filter)),
            revision,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Copy of the current state for rendering
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Run one load cycle.
    ///
    /// Fails with [`DashboardError::Unauthenticated`] without touching the
    /// network when the session has no token.
    pub async fn load(&self) -> DashboardResult<LoadOutcome> {
        let generation = self.begin_cycle().await;

        let token = match self.session.token() {
            Some(token) => token,
            None => {
                tracing::warn!("No session token, dashboard load skipped");
                self.fail_unauthenticated(generation).await;
                return Err(DashboardError::Unauthenticated);
            }
        };

        let (approvals, notifications, unread) = tokio::join!(
            self.api.pending_approvals(token),
            self.api.unread_notifications(token),
            self.api.unread_count(token),
        );

        self.apply(
            generation,
            LoadResults {
                approvals,
                notifications,
                unread,
            },
        )
        .await
    }

    /// Manual refresh requested by the user
    pub async fn refresh(&self) -> DashboardResult<LoadOutcome> {
        tracing::debug!("Manual dashboard refresh");
        self.load().await
    }

    /// Mark one notification read.
    ///
    /// Local state is updated whether or not the backend accepted the
    /// request; failures are only logged. Returns whether the backend
    /// acknowledged it.
    pub async fn mark_read(&self, id: i64) -> bool {
        let acknowledged = match self.session.token() {
            Some(token) => match self.api.mark_read(token, id).await {
                Ok(ack) => {
                    tracing::debug!(id, status = %ack.status, "Notification marked as read");
                    true
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "Failed to mark notification as read");
                    false
                }
            },
            None => {
                tracing::warn!(id, "No session token, notification marked read locally only");
                false
            }
        };

        {
            let mut state = self.state.write().await;
            state.supersede_pending_load();
            state.store.mark_read(id);
        }
        self.bump();
        acknowledged
    }

    /// Mark every notification read.
    ///
    /// Same local-first behaviour as [`Dashboard::mark_read`].
    pub async fn mark_all_read(&self) -> bool {
        let acknowledged = match self.session.token() {
            Some(token) => match self.api.mark_all_read(token).await {
                Ok(ack) => {
                    tracing::debug!(status = %ack.status, "All notifications marked as read");
                    true
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to mark all notifications as read");
                    false
                }
            },
            None => {
                tracing::warn!("No session token, notifications marked read locally only");
                false
            }
        };

        {
            let mut state = self.state.write().await;
            state.supersede_pending_load();
            state.store.mark_all_read();
        }
        self.bump();
        acknowledged
    }

    /// Change the notification panel filter
    pub async fn set_filter(&self, filter: NotificationFilter) {
        self.state.write().await.filter = filter;
        self.bump();
    }

    async fn begin_cycle(&self) -> u64 {
        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.refreshing = true;
            state.generation
        };
        self.bump();
        generation
    }

    async fn fail_unauthenticated(&self, generation: u64) {
        {
            let mut state = self.state.write().await;
            if state.generation != generation {
                return;
            }
            state.error = Some(LOGIN_PROMPT.to_string());
            state.loading = false;
            state.refreshing = false;
        }
        self.bump();
    }

    async fn apply(&self, generation: u64, results: LoadResults) -> DashboardResult<LoadOutcome> {
        let merged = {
            let mut state = self.state.write().await;
            if state.generation != generation {
                tracing::debug!(
                    generation,
                    latest = state.generation,
                    "Discarding responses from superseded load"
                );
                return Ok(LoadOutcome::Stale);
            }

            let merged = state.merge(results);
            match &merged {
                Ok(()) => {
                    state.error = None;
                    tracing::info!(
                        pending_approvals = state.stats.pending_approvals,
                        notifications = state.store.notifications().len(),
                        unread = state.store.unread_count(),
                        "Dashboard data loaded"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Dashboard load failed");
                    state.error = Some(e.to_string());
                }
            }
            state.loading = false;
            state.refreshing = false;
            state.last_loaded = Some(Utc::now());
            merged
        };

        self.bump();
        merged
            .map(|()| LoadOutcome::Applied)
            .map_err(|e: ApiError| e.into())
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}
