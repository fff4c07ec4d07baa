use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::super::archive::{ArchivePublisher, ArchiveRecord};
use super::super::dashboard::{ParticipantDashboard, TeamSummary};
use super::super::domain::{AggregateRecord, DailyCounts, ResubmissionPolicy, TargetSet};
use super::super::rates::{attendance_rate, conversion_rate};
use super::super::rollup::{ResetDecision, RollupEngine};
use super::super::scoring::{ScoreEngine, StatusResult};
use super::store::{PerformanceStore, StoreError};

/// Largest count accepted for a single day. Keeps monthly running totals far
/// from integer overflow.
pub const MAX_DAILY_COUNT: u64 = 1_000_000;

/// One count field as entered. Form clients send numbers or numeric strings;
/// anything else is kept so the rejection can quote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountInput {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl From<i64> for CountInput {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Raw daily form as entered. Missing or blank fields count as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub calls: Option<CountInput>,
    #[serde(default)]
    pub bookings: Option<CountInput>,
    #[serde(default)]
    pub attendance: Option<CountInput>,
    #[serde(default)]
    pub leads: Option<CountInput>,
}

impl SubmissionRequest {
    pub fn new(
        name: impl Into<String>,
        calls: i64,
        bookings: i64,
        attendance: i64,
        leads: i64,
    ) -> Self {
        Self {
            name: name.into(),
            calls: Some(calls.into()),
            bookings: Some(bookings.into()),
            attendance: Some(attendance.into()),
            leads: Some(leads.into()),
        }
    }

    pub fn counts(&self) -> Result<DailyCounts, SubmissionError> {
        Ok(DailyCounts {
            calls: daily_count("calls", self.calls.as_ref())?,
            bookings: daily_count("bookings", self.bookings.as_ref())?,
            attendance: daily_count("attendance", self.attendance.as_ref())?,
            leads: daily_count("leads", self.leads.as_ref())?,
        })
    }
}

fn daily_count(field: &'static str, value: Option<&CountInput>) -> Result<u64, SubmissionError> {
    let invalid = |value: String| SubmissionError::InvalidInput { field, value };
    let number = match value {
        None => return Ok(0),
        Some(CountInput::Number(number)) => *number,
        Some(CountInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(0);
            }
            text.parse::<i64>().map_err(|_| invalid(text.to_string()))?
        }
        Some(CountInput::Other(other)) => return Err(invalid(other.to_string())),
    };

    u64::try_from(number)
        .ok()
        .filter(|count| *count <= MAX_DAILY_COUNT)
        .ok_or_else(|| invalid(number.to_string()))
}

/// Startup settings for the submission workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionSettings {
    pub roster: Vec<String>,
    pub targets: TargetSet,
    pub resubmission: ResubmissionPolicy,
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub record: AggregateRecord,
    pub reset: ResetDecision,
    pub archive_triggered: bool,
    pub archive: ArchiveRecord,
    pub daily_status: StatusResult,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("no participant selected")]
    MissingIdentity,
    #[error("'{0}' is not on the team roster")]
    UnknownParticipant(String),
    #[error("{field} must be a whole number from 0 to {max} (got {value})", max = MAX_DAILY_COUNT)]
    InvalidInput { field: &'static str, value: String },
    #[error("no performance record for '{0}'")]
    NoRecord(String),
    #[error("{name} already submitted an entry for {day}")]
    AlreadySubmitted { name: String, day: NaiveDate },
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Submission handler: validates the form, rolls it into the stored
/// aggregate, persists it, and hands the archive row off.
pub struct PerformanceService<S, A> {
    store: Arc<S>,
    archive: Arc<A>,
    rollup: RollupEngine,
    scoring: Arc<ScoreEngine>,
    settings: SubmissionSettings,
    participant_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S, A> PerformanceService<S, A>
where
    S: PerformanceStore + 'static,
    A: ArchivePublisher + 'static,
{
    pub fn new(
        store: Arc<S>,
        archive: Arc<A>,
        rollup: RollupEngine,
        scoring: Arc<ScoreEngine>,
        settings: SubmissionSettings,
    ) -> Self {
        Self {
            store,
            archive,
            rollup,
            scoring,
            settings,
            participant_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &SubmissionSettings {
        &self.settings
    }

    pub fn scoring(&self) -> &ScoreEngine {
        &self.scoring
    }

    /// Record today's entry for one participant.
    ///
    /// Rejected requests never touch the store or the archive. A storage
    /// failure discards the computed record; an archive failure is only
    /// logged because the stored record is already authoritative.
    pub fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(SubmissionError::MissingIdentity);
        }
        if !self.settings.roster.iter().any(|member| member == name) {
            return Err(SubmissionError::UnknownParticipant(name.to_string()));
        }
        let counts = request.counts()?;

        let lock = self.participant_lock(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let previous = self
            .store
            .fetch(name)?
            .unwrap_or_else(|| AggregateRecord::empty(name));
        let now = self.store.server_time();
        self.guard_resubmission(name, &previous, now)?;

        debug!(
            participant = name,
            calls = counts.calls,
            bookings = counts.bookings,
            attendance = counts.attendance,
            leads = counts.leads,
            "rolling up daily submission"
        );

        let outcome = self.rollup.rollup(&previous, counts.raw(), now);
        let mut record = outcome.record;
        record.name = name.to_string();
        record.daily_leads = counts.leads;
        record.conv_rate = conversion_rate(counts.bookings, counts.leads);
        record.attendance_rate = attendance_rate(counts.bookings, counts.attendance);

        self.store.upsert(record.clone())?;

        let daily_status = self.scoring.score(
            counts.calls as f64,
            self.settings.targets.calls.daily as f64,
        );
        let archive = ArchiveRecord::from_submission(
            name,
            counts,
            record.conv_rate,
            record.attendance_rate,
            daily_status.tier,
            outcome.should_archive,
        );
        if let Err(err) = self.archive.publish(&archive) {
            warn!(participant = name, error = %err, "archive delivery failed");
        }

        info!(
            participant = name,
            monthly_reset = outcome.reset.monthly,
            weekly_reset = outcome.reset.weekly,
            status = %daily_status.tier,
            "daily performance recorded"
        );

        Ok(SubmissionReceipt {
            record,
            reset: outcome.reset,
            archive_triggered: outcome.should_archive,
            archive,
            daily_status,
        })
    }

    pub fn dashboard(&self, name: &str) -> Result<Option<ParticipantDashboard>, SubmissionError> {
        let record = self.store.fetch(name.trim())?;
        Ok(record.map(|record| {
            ParticipantDashboard::build(&record, &self.settings.targets, &self.scoring)
        }))
    }

    pub fn summary(&self) -> Result<TeamSummary, SubmissionError> {
        let records = self.store.list()?;
        Ok(TeamSummary::build(
            records,
            &self.settings.roster,
            &self.settings.targets,
            &self.scoring,
        ))
    }

    fn guard_resubmission(
        &self,
        name: &str,
        previous: &AggregateRecord,
        now: DateTime<Utc>,
    ) -> Result<(), SubmissionError> {
        if self.settings.resubmission == ResubmissionPolicy::Allow {
            return Ok(());
        }
        let Some(last_update) = previous.last_update else {
            return Ok(());
        };

        let calendar = self.rollup.calendar();
        let day = now.with_timezone(&calendar).date_naive();
        if last_update.with_timezone(&calendar).date_naive() == day {
            return Err(SubmissionError::AlreadySubmitted {
                name: name.to_string(),
                day,
            });
        }
        Ok(())
    }

    fn participant_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .participant_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(name.to_string()).or_default().clone()
    }
}
