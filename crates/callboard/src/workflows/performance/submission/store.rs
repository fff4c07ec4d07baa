use chrono::{DateTime, Utc};

use super::super::domain::AggregateRecord;

/// Callback invoked with each record after it is written.
pub type RecordListener = Box<dyn Fn(&AggregateRecord) + Send + Sync>;

/// Shared document store holding one aggregate per participant name.
pub trait PerformanceStore: Send + Sync {
    fn fetch(&self, name: &str) -> Result<Option<AggregateRecord>, StoreError>;

    /// Merge `record` into the document keyed by `record.name`.
    fn upsert(&self, record: AggregateRecord) -> Result<(), StoreError>;

    fn list(&self) -> Result<Vec<AggregateRecord>, StoreError>;

    /// Store-side clock used for `lastUpdate`, so client skew never moves a
    /// reset boundary.
    fn server_time(&self) -> DateTime<Utc>;

    /// Live updates are optional; polling through `fetch`/`list` always works.
    fn subscribe(&self, _listener: RecordListener) -> Result<(), StoreError> {
        Err(StoreError::SubscriptionUnsupported)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("performance store unavailable: {0}")]
    Unavailable(String),
    #[error("performance store does not support live subscriptions")]
    SubscriptionUnsupported,
}
