use std::sync::Arc;

use tracing::warn;

use crate::common::types::Seconds;
use crate::gateway::MetadataGateway;

/// Persists watch progress to the catalog.
///
/// Every call is fire-and-forget: a failed report logs at warn and never
/// touches playback.
pub struct ActivityReporter {
    gateway: Arc<dyn MetadataGateway>,
    record_history: bool,
    last_position: Option<Seconds>,
}

impl ActivityReporter {
    pub fn new(gateway: Arc<dyn MetadataGateway>, record_history: bool) -> Self {
        Self {
            gateway,
            record_history,
            last_position: None,
        }
    }

    /// Timer-driven heartbeat. Suppressed when history recording is off or
    /// the clock has not advanced since the last write.
    pub fn heartbeat(&mut self, internal_id: i64, position: Seconds) {
        if !self.record_history {
            return;
        }
        if self.last_position == Some(position) {
            return;
        }
        self.send(internal_id, position);
    }

    /// Transition flush (pause, teardown, item switch, ended). Always goes
    /// through while history recording is on.
    pub fn flush(&mut self, internal_id: i64, position: Seconds) {
        if !self.record_history {
            return;
        }
        self.send(internal_id, position);
    }

    /// Forget the advance marker when the session switches items.
    pub fn reset(&mut self) {
        self.last_position = None;
    }

    fn send(&mut self, internal_id: i64, position: Seconds) {
        self.last_position = Some(position);
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            if let Err(err) = gateway.report_activity(internal_id, position).await {
                warn!("activity report for item {} failed: {}", internal_id, err);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::FakeGateway;

    #[tokio::test]
    async fn test_heartbeat_reports_sampled_position() {
        let (gateway, mut report_rx) = FakeGateway::new();
        let gateway = Arc::new(gateway);
        let mut reporter = ActivityReporter::new(gateway.clone(), true);

        reporter.heartbeat(7, 12.5);
        assert_eq!(report_rx.recv().await, Some((7, 12.5)));
    }

    #[tokio::test]
    async fn test_heartbeat_suppressed_when_position_unchanged() {
        let (gateway, mut report_rx) = FakeGateway::new();
        let gateway = Arc::new(gateway);
        let mut reporter = ActivityReporter::new(gateway.clone(), true);

        reporter.heartbeat(7, 12.5);
        reporter.heartbeat(7, 12.5);
        reporter.heartbeat(7, 13.0);

        assert_eq!(report_rx.recv().await, Some((7, 12.5)));
        assert_eq!(report_rx.recv().await, Some((7, 13.0)));
        assert_eq!(gateway.reports.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_flush_goes_through_at_same_position() {
        let (gateway, mut report_rx) = FakeGateway::new();
        let gateway = Arc::new(gateway);
        let mut reporter = ActivityReporter::new(gateway.clone(), true);

        reporter.heartbeat(7, 12.5);
        reporter.flush(7, 12.5);

        assert_eq!(report_rx.recv().await, Some((7, 12.5)));
        assert_eq!(report_rx.recv().await, Some((7, 12.5)));
    }

    #[tokio::test]
    async fn test_disabled_history_recording_sends_nothing() {
        let (gateway, _report_rx) = FakeGateway::new();
        let gateway = Arc::new(gateway);
        let mut reporter = ActivityReporter::new(gateway.clone(), false);

        reporter.heartbeat(7, 12.5);
        reporter.flush(7, 99.0);
        tokio::task::yield_now().await;

        assert!(gateway.reports.lock().is_empty());
    }

    #[tokio::test]
    async fn test_report_failure_is_swallowed() {
        let (gateway, mut report_rx) = FakeGateway::new();
        *gateway.fail_reports.lock() = true;
        let gateway = Arc::new(gateway);
        let mut reporter = ActivityReporter::new(gateway.clone(), true);

        // The call must not panic or propagate anywhere.
        reporter.flush(7, 12.5);
        assert_eq!(report_rx.recv().await, Some((7, 12.5)));
    }
}
