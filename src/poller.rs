//! Dashboard Poller
//!
//! Reloads the dashboard on a fixed interval, starting immediately.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::dashboard::{Dashboard, LoadOutcome};
use crate::error::DashboardError;

/// Shortest period accepted by [`spawn`]
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running poller.
///
/// Dropping the handle stops polling, so the timer never outlives the view
/// that started it.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Stop polling and wait for the task to finish
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Dashboard poller task ended abnormally");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Start polling `dashboard` every `interval`.
///
/// The first load runs right away. Loads are not serialized against manual
/// refreshes; the dashboard discards whichever result is superseded. A load
/// still in flight when the poller is stopped is dropped and leaves the
/// dashboard untouched.
pub fn spawn(dashboard: Arc<Dashboard>, interval: Duration) -> PollerHandle {
    let interval = interval.max(MIN_INTERVAL);
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    tracing::info!(interval_secs = interval.as_secs(), "Starting dashboard poller");

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown_rx.changed() => break,
            }

            let result = tokio::select! {
                result = dashboard.load() => result,
                _ = shutdown_rx.changed() => break,
            };

            match result {
                Ok(LoadOutcome::Applied) => tracing::debug!("Scheduled dashboard load applied"),
                Ok(LoadOutcome::Stale) => tracing::debug!("Scheduled dashboard load superseded"),
                // Already surfaced through dashboard state
                Err(DashboardError::Unauthenticated) => {}
                Err(e) => tracing::debug!(error = %e, "Scheduled dashboard load failed"),
            }
        }

        tracing::info!("Dashboard poller stopped");
    });

    PollerHandle {
        shutdown,
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tests::FakeApi;
    use crate::notification::NotificationFilter;
    use crate::session::SessionContext;
    use std::time::Instant;

    #[tokio::test]
    async fn test_polls_until_stopped() {
        let api = Arc::new(FakeApi::new());
        let dashboard = Arc::new(Dashboard::new(
            api.clone(),
            SessionContext::new("token"),
            NotificationFilter::All,
        ));

        let handle = spawn(dashboard.clone(), Duration::from_millis(50));
        assert!(handle.is_running());
        tokio::time::sleep(Duration::from_millis(180)).await;
        handle.stop().await;

        // Three requests per cycle: immediate load plus at least two ticks
        let calls = api.calls();
        assert!(calls >= 9, "expected at least 3 cycles, saw {} calls", calls);
        assert_eq!(calls % 3, 0);

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(api.calls(), calls);
        assert!(!dashboard.snapshot().await.loading);
    }

    #[tokio::test]
    async fn test_drop_stops_polling() {
        let api = Arc::new(FakeApi::new());
        let dashboard = Arc::new(Dashboard::new(
            api.clone(),
            SessionContext::new("token"),
            NotificationFilter::All,
        ));

        let handle = spawn(dashboard, Duration::from_millis(30));
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let calls = api.calls();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(api.calls(), calls);
    }

    #[tokio::test]
    async fn test_stop_drops_load_in_flight() {
        let api = Arc::new(FakeApi::new());
        api.set_delay(Duration::from_millis(500));
        let dashboard = Arc::new(Dashboard::new(
            api.clone(),
            SessionContext::new("token"),
            NotificationFilter::All,
        ));
        let revisions = dashboard.subscribe();

        let handle = spawn(dashboard.clone(), Duration::from_secs(30));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = Instant::now();
        handle.stop().await;
        assert!(started.elapsed() < Duration::from_millis(250));

        let revision = *revisions.borrow();
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(*revisions.borrow(), revision);
        assert!(dashboard.snapshot().await.loading);
    }

    #[tokio::test]
    async fn test_zero_interval_is_clamped() {
        let api = Arc::new(FakeApi::new());
        let dashboard = Arc::new(Dashboard::new(
            api.clone(),
            SessionContext::new("token"),
            NotificationFilter::All,
        ));

        let handle = spawn(dashboard, Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(handle.is_running());
        handle.stop().await;
        assert!(api.calls() >= 3);
    }
}
