use knock_core::TrialRecord;
use std::sync::{Arc, Mutex};

/// Destination for per-trial log records.
///
/// Delivery is at-most-once and fire-and-forget: implementations must never
/// block the session or surface an error to it. A dropped record is an
/// accepted data-loss mode, logged only.
pub trait TrialSink {
    fn submit(&self, record: &TrialRecord);
}

/// Discards every record. Useful when running without a backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TrialSink for NullSink {
    fn submit(&self, _record: &TrialRecord) {}
}

/// In-memory sink for tests. Clones share the same buffer, so a test can
/// keep a handle while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<TrialRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TrialRecord> {
        self.records.lock().expect("sink poisoned").clone()
    }
}

impl TrialSink for MemorySink {
    fn submit(&self, record: &TrialRecord) {
        self.records.lock().expect("sink poisoned").push(record.clone());
    }
}
