use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::errors::GatewayError;
use crate::common::types::Seconds;
use crate::protocol::{ItemRef, MediaItem, SequenceContext};

pub mod http;

pub use http::HttpMetadataGateway;

/// Everything the catalog returns for one item in a single round trip: the
/// descriptor plus the sibling orderings auto-advance can use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBundle {
    pub item: MediaItem,
    #[serde(default)]
    pub sequence_contexts: Vec<SequenceContext>,
}

/// Remote catalog access.
#[async_trait]
pub trait MetadataGateway: Send + Sync {
    /// Resolve the full descriptor for one item.
    async fn fetch_item(&self, item: &ItemRef) -> Result<ItemBundle, GatewayError>;

    /// Persist watch progress. Best effort: callers log and swallow failures.
    async fn report_activity(
        &self,
        internal_id: i64,
        stop_time_sec: Seconds,
    ) -> Result<(), GatewayError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    use super::*;

    /// In-memory gateway for tests: serves pre-seeded bundles and records
    /// every activity report.
    pub(crate) struct FakeGateway {
        bundles: Mutex<HashMap<ItemRef, ItemBundle>>,
        pub reports: Mutex<Vec<(i64, Seconds)>>,
        report_tx: mpsc::UnboundedSender<(i64, Seconds)>,
        pub fail_reports: Mutex<bool>,
    }

    impl FakeGateway {
        pub fn new() -> (Self, mpsc::UnboundedReceiver<(i64, Seconds)>) {
            let (report_tx, report_rx) = mpsc::unbounded_channel();
            (
                Self {
                    bundles: Mutex::new(HashMap::new()),
                    reports: Mutex::new(Vec::new()),
                    report_tx,
                    fail_reports: Mutex::new(false),
                },
                report_rx,
            )
        }

        pub fn seed(&self, bundle: ItemBundle) {
            self.bundles
                .lock()
                .insert(bundle.item.item_ref.clone(), bundle);
        }
    }

    #[async_trait]
    impl MetadataGateway for FakeGateway {
        async fn fetch_item(&self, item: &ItemRef) -> Result<ItemBundle, GatewayError> {
            self.bundles
                .lock()
                .get(item)
                .cloned()
                .ok_or(GatewayError::Status(404))
        }

        async fn report_activity(
            &self,
            internal_id: i64,
            stop_time_sec: Seconds,
        ) -> Result<(), GatewayError> {
            let fail = *self.fail_reports.lock();
            if !fail {
                self.reports.lock().push((internal_id, stop_time_sec));
            }
            let _ = self.report_tx.send((internal_id, stop_time_sec));
            if fail {
                return Err(GatewayError::Status(500));
            }
            Ok(())
        }
    }
}
