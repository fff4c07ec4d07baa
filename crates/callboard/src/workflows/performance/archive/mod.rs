mod csv_sink;
mod webhook;

pub use csv_sink::CsvArchivePublisher;
pub use webhook::WebhookArchivePublisher;

use serde::{Deserialize, Serialize};

use super::domain::DailyCounts;
use super::rates::format_percentage;
use super::scoring::Tier;

/// Instruction for the spreadsheet side of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArchiveAction {
    InsertData,
    /// Archive the closed month's totals before appending today's row.
    ArchiveAndInsert,
}

/// Flat row forwarded to the archival collaborator after every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRecord {
    pub action: ArchiveAction,
    pub employee_name: String,
    pub calls: u64,
    pub bookings: u64,
    pub attendance: u64,
    pub leads: u64,
    pub conversion_rate: String,
    pub attendance_rate: String,
    pub daily_status: String,
}

impl ArchiveRecord {
    pub fn from_submission(
        employee_name: impl Into<String>,
        counts: DailyCounts,
        conversion_rate: f64,
        attendance_rate: f64,
        daily_status: Tier,
        should_archive: bool,
    ) -> Self {
        let action = if should_archive {
            ArchiveAction::ArchiveAndInsert
        } else {
            ArchiveAction::InsertData
        };

        Self {
            action,
            employee_name: employee_name.into(),
            calls: counts.calls,
            bookings: counts.bookings,
            attendance: counts.attendance,
            leads: counts.leads,
            conversion_rate: format_percentage(conversion_rate),
            attendance_rate: format_percentage(attendance_rate),
            daily_status: daily_status.label().to_string(),
        }
    }
}

/// Outbound archive hook (spreadsheet webhook, CSV ledger, ...).
pub trait ArchivePublisher: Send + Sync {
    fn publish(&self, record: &ArchiveRecord) -> Result<(), ArchiveError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive transport unavailable: {0}")]
    Transport(String),
    #[error("archive ledger write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("archive ledger io failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Publishes every record to each configured sink in order.
#[derive(Default)]
pub struct ArchiveFanout {
    sinks: Vec<Box<dyn ArchivePublisher>>,
}

impl ArchiveFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: impl ArchivePublisher + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ArchivePublisher for ArchiveFanout {
    /// Later sinks still receive the record when an earlier one fails; the
    /// first failure is returned.
    fn publish(&self, record: &ArchiveRecord) -> Result<(), ArchiveError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.publish(record) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
