use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{AggregateRecord, RawDaily};

/// Which running totals are cleared before today's counts are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResetDecision {
    pub monthly: bool,
    pub weekly: bool,
}

/// Result of folding one day into a participant's aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct RollupOutcome {
    pub record: AggregateRecord,
    pub reset: ResetDecision,
    /// A month closed; the pre-reset monthly totals belong in the archive.
    pub should_archive: bool,
}

/// Stateless calendar rollup of daily counts into weekly and monthly totals.
///
/// Boundaries are read from calendar fields in the team's offset, never from
/// elapsed time. A week starts on the first submission made on a Sunday when
/// the previous one was not also made on a Sunday.
#[derive(Debug, Clone, Copy)]
pub struct RollupEngine {
    calendar: FixedOffset,
}

impl RollupEngine {
    pub fn new(calendar: FixedOffset) -> Self {
        Self { calendar }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn calendar(&self) -> FixedOffset {
        self.calendar
    }

    pub fn reset_decision(
        &self,
        last_update: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ResetDecision {
        let Some(last_update) = last_update else {
            return ResetDecision::default();
        };

        let last = last_update.with_timezone(&self.calendar);
        let current = now.with_timezone(&self.calendar);

        if (last.year(), last.month()) != (current.year(), current.month()) {
            return ResetDecision {
                monthly: true,
                weekly: true,
            };
        }

        let last_dow = last.weekday().num_days_from_sunday();
        let current_dow = current.weekday().num_days_from_sunday();

        ResetDecision {
            monthly: false,
            weekly: current_dow == 0 && last_dow != 0,
        }
    }

    /// Fold `today` into `previous`. Pass [`AggregateRecord::empty`] for a
    /// participant without stored state.
    pub fn rollup(
        &self,
        previous: &AggregateRecord,
        today: RawDaily,
        now: DateTime<Utc>,
    ) -> RollupOutcome {
        let reset = self.reset_decision(previous.last_update, now);
        let mut record = previous.clone();

        if reset.monthly {
            info!(participant = %previous.name, "monthly reset triggered");
            record.calls_monthly = 0;
            record.bookings_monthly = 0;
            record.attendance_monthly = 0;
        }

        if reset.weekly {
            info!(participant = %previous.name, "weekly reset triggered");
            record.calls_weekly = 0;
            record.bookings_weekly = 0;
            record.attendance_weekly = 0;
        }

        // Totals saturate rather than wrap.
        record.calls_weekly = record.calls_weekly.saturating_add(today.calls);
        record.calls_monthly = record.calls_monthly.saturating_add(today.calls);
        record.bookings_weekly = record.bookings_weekly.saturating_add(today.bookings);
        record.bookings_monthly = record.bookings_monthly.saturating_add(today.bookings);
        record.attendance_weekly = record.attendance_weekly.saturating_add(today.attendance);
        record.attendance_monthly = record.attendance_monthly.saturating_add(today.attendance);

        record.calls_daily = today.calls;
        record.bookings_daily = today.bookings;
        record.attendance_daily = today.attendance;
        record.last_update = Some(now);

        RollupOutcome {
            record,
            reset,
            should_archive: reset.monthly,
        }
    }
}

impl Default for RollupEngine {
    fn default() -> Self {
        Self::utc()
    }
}
