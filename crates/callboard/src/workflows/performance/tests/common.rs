use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::performance::archive::{ArchiveError, ArchivePublisher, ArchiveRecord};
use crate::workflows::performance::domain::{
    AggregateRecord, RawDaily, ResubmissionPolicy, TargetSet,
};
use crate::workflows::performance::rollup::RollupEngine;
use crate::workflows::performance::scoring::{FixedPhrasePicker, ScoreEngine};
use crate::workflows::performance::submission::{
    PerformanceService, PerformanceStore, StoreError, SubmissionSettings,
};

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn raw(calls: u64, bookings: u64, attendance: u64) -> RawDaily {
    RawDaily {
        calls,
        bookings,
        attendance,
    }
}

pub(super) fn roster() -> Vec<String> {
    vec!["Bayan".to_string(), "Salma".to_string(), "Sahar".to_string()]
}

pub(super) fn settings(resubmission: ResubmissionPolicy) -> SubmissionSettings {
    SubmissionSettings {
        roster: roster(),
        targets: TargetSet::standard(),
        resubmission,
    }
}

pub(super) fn scoring() -> Arc<ScoreEngine> {
    Arc::new(ScoreEngine::with_picker(Arc::new(FixedPhrasePicker(0))))
}

pub(super) fn stored(name: &str, last_update: DateTime<Utc>) -> AggregateRecord {
    AggregateRecord {
        last_update: Some(last_update),
        ..AggregateRecord::empty(name)
    }
}

/// Store with a settable clock standing in for server time.
#[derive(Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<HashMap<String, AggregateRecord>>>,
    clock: Arc<Mutex<DateTime<Utc>>>,
    upserts: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub(super) fn at(now: DateTime<Utc>) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            clock: Arc::new(Mutex::new(now)),
            upserts: Arc::new(Mutex::new(0)),
        }
    }

    pub(super) fn set_time(&self, now: DateTime<Utc>) {
        *self.clock.lock().expect("clock mutex poisoned") = now;
    }

    pub(super) fn seed(&self, record: AggregateRecord) {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .insert(record.name.clone(), record);
    }

    pub(super) fn get(&self, name: &str) -> Option<AggregateRecord> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(name)
            .cloned()
    }

    pub(super) fn upsert_count(&self) -> usize {
        *self.upserts.lock().expect("counter mutex poisoned")
    }
}

impl PerformanceStore for MemoryStore {
    fn fetch(&self, name: &str) -> Result<Option<AggregateRecord>, StoreError> {
        Ok(self.get(name))
    }

    fn upsert(&self, record: AggregateRecord) -> Result<(), StoreError> {
        *self.upserts.lock().expect("counter mutex poisoned") += 1;
        self.seed(record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<AggregateRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect())
    }

    fn server_time(&self) -> DateTime<Utc> {
        *self.clock.lock().expect("clock mutex poisoned")
    }
}

/// Reads succeed, writes fail.
pub(super) struct ReadOnlyStore;

impl PerformanceStore for ReadOnlyStore {
    fn fetch(&self, _name: &str) -> Result<Option<AggregateRecord>, StoreError> {
        Ok(None)
    }

    fn upsert(&self, _record: AggregateRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("write quota exceeded".to_string()))
    }

    fn list(&self) -> Result<Vec<AggregateRecord>, StoreError> {
        Ok(Vec::new())
    }

    fn server_time(&self) -> DateTime<Utc> {
        at(2025, 3, 12, 9)
    }
}

pub(super) struct OfflineStore;

impl PerformanceStore for OfflineStore {
    fn fetch(&self, _name: &str) -> Result<Option<AggregateRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _record: AggregateRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<AggregateRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn server_time(&self) -> DateTime<Utc> {
        at(2025, 3, 12, 9)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryArchive {
    rows: Arc<Mutex<Vec<ArchiveRecord>>>,
}

impl MemoryArchive {
    pub(super) fn rows(&self) -> Vec<ArchiveRecord> {
        self.rows.lock().expect("archive mutex poisoned").clone()
    }
}

impl ArchivePublisher for MemoryArchive {
    fn publish(&self, record: &ArchiveRecord) -> Result<(), ArchiveError> {
        self.rows
            .lock()
            .expect("archive mutex poisoned")
            .push(record.clone());
        Ok(())
    }
}

pub(super) struct FailingArchive;

impl ArchivePublisher for FailingArchive {
    fn publish(&self, _record: &ArchiveRecord) -> Result<(), ArchiveError> {
        Err(ArchiveError::Transport("webhook timed out".to_string()))
    }
}

pub(super) fn build_service(
    store: MemoryStore,
    resubmission: ResubmissionPolicy,
) -> (
    PerformanceService<MemoryStore, MemoryArchive>,
    Arc<MemoryStore>,
    Arc<MemoryArchive>,
) {
    let store = Arc::new(store);
    let archive = Arc::new(MemoryArchive::default());
    let service = PerformanceService::new(
        store.clone(),
        archive.clone(),
        RollupEngine::utc(),
        scoring(),
        settings(resubmission),
    );
    (service, store, archive)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
