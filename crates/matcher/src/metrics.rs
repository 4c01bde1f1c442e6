// Metrics hooks for the `matcher` crate.
//
// Callers install a global `ClassifyMetrics` implementation via
// [`set_classify_metrics`]; every [`Classifier::classify`](crate::Classifier::classify)
// call then reports its latency, neighbourhood size and outcome. The pure
// `decide` function never touches the recorder.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Metrics observer for classification calls.
pub trait ClassifyMetrics: Send + Sync {
    /// Record one classification.
    ///
    /// `neighbor_count` is the number of neighbours that voted and `accepted`
    /// tells whether a category was assigned.
    fn record_classify(&self, latency: Duration, neighbor_count: usize, accepted: bool);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn ClassifyMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn ClassifyMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn ClassifyMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global classification metrics recorder.
///
/// Typically called once during start-up so all classifiers share a backend.
pub fn set_classify_metrics(recorder: Option<Arc<dyn ClassifyMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
