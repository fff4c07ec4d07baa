use callboard::workflows::performance::{
    AggregateRecord, ArchiveError, ArchivePublisher, ArchiveRecord, PerformanceStore,
    RecordListener, ScoreEngine, StoreError,
};
use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) scoring: Arc<ScoreEngine>,
}

/// Process-local stand-in for the shared document store.
///
/// Without a pinned clock `server_time` reads the wall clock; the demo pins it
/// to walk through simulated days.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPerformanceStore {
    records: Arc<Mutex<HashMap<String, AggregateRecord>>>,
    listeners: Arc<Mutex<Vec<RecordListener>>>,
    clock: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl InMemoryPerformanceStore {
    pub(crate) fn pin_clock(&self, now: DateTime<Utc>) {
        *self.clock.lock().unwrap_or_else(PoisonError::into_inner) = Some(now);
    }

    fn poisoned<T>(_: PoisonError<T>) -> StoreError {
        StoreError::Unavailable("in-memory store mutex poisoned".to_string())
    }
}

impl PerformanceStore for InMemoryPerformanceStore {
    fn fetch(&self, name: &str) -> Result<Option<AggregateRecord>, StoreError> {
        let guard = self.records.lock().map_err(Self::poisoned)?;
        Ok(guard.get(name).cloned())
    }

    fn upsert(&self, record: AggregateRecord) -> Result<(), StoreError> {
        {
            let mut guard = self.records.lock().map_err(Self::poisoned)?;
            guard.insert(record.name.clone(), record.clone());
        }
        let listeners = self.listeners.lock().map_err(Self::poisoned)?;
        for listener in listeners.iter() {
            listener(&record);
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<AggregateRecord>, StoreError> {
        let guard = self.records.lock().map_err(Self::poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    fn server_time(&self) -> DateTime<Utc> {
        let pinned = *self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        pinned.unwrap_or_else(Utc::now)
    }

    fn subscribe(&self, listener: RecordListener) -> Result<(), StoreError> {
        self.listeners
            .lock()
            .map_err(Self::poisoned)?
            .push(listener);
        Ok(())
    }
}

/// Archive sink that keeps every row in memory for later display.
#[derive(Default, Clone)]
pub(crate) struct InMemoryArchiveLog {
    rows: Arc<Mutex<Vec<ArchiveRecord>>>,
}

impl ArchivePublisher for InMemoryArchiveLog {
    fn publish(&self, record: &ArchiveRecord) -> Result<(), ArchiveError> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

impl InMemoryArchiveLog {
    pub(crate) fn rows(&self) -> Vec<ArchiveRecord> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
