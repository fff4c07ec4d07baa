//! Daily call-center performance: calendar rollups, target scoring,
//! submission handling, and the dashboard views built on top of them.

pub mod archive;
pub mod dashboard;
pub mod domain;
pub mod rates;
pub mod rollup;
pub mod scoring;
pub mod submission;

#[cfg(test)]
mod tests;

pub use archive::{
    ArchiveAction, ArchiveError, ArchiveFanout, ArchivePublisher, ArchiveRecord,
    CsvArchivePublisher, WebhookArchivePublisher,
};
pub use dashboard::{ParticipantDashboard, TeamSummary};
pub use domain::{
    AggregateRecord, DailyCounts, Metric, Period, PeriodTargets, RawDaily, ResubmissionPolicy,
    TargetSet,
};
pub use rollup::{ResetDecision, RollupEngine, RollupOutcome};
pub use scoring::{
    FixedPhrasePicker, PhraseBook, PhrasePicker, RandomPhrasePicker, ScoreEngine,
    ScoreThresholds, StatusResult, Tier,
};
pub use submission::{
    performance_router, CountInput, PerformanceService, PerformanceStore, RecordListener,
    StoreError, SubmissionError, SubmissionReceipt, SubmissionRequest, SubmissionSettings,
    MAX_DAILY_COUNT,
};
