use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counted activity that rolls up into weekly and monthly totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Calls,
    Bookings,
    Attendance,
}

impl Metric {
    pub const fn ordered() -> [Self; 3] {
        [Self::Calls, Self::Bookings, Self::Attendance]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Calls => "Calls",
            Self::Bookings => "Bookings",
            Self::Attendance => "Attendance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub const fn ordered() -> [Self; 3] {
        [Self::Daily, Self::Weekly, Self::Monthly]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

/// Daily, weekly, and monthly goal for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTargets {
    pub daily: u64,
    pub weekly: u64,
    pub monthly: u64,
}

impl PeriodTargets {
    pub const fn for_period(&self, period: Period) -> u64 {
        match period {
            Period::Daily => self.daily,
            Period::Weekly => self.weekly,
            Period::Monthly => self.monthly,
        }
    }
}

/// Fixed team targets loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSet {
    pub calls: PeriodTargets,
    pub bookings: PeriodTargets,
    pub attendance: PeriodTargets,
    /// Bookings divided by marketing leads.
    pub conversion_rate: f64,
    /// Attendance divided by bookings.
    pub attendance_rate: f64,
}

impl TargetSet {
    pub const fn standard() -> Self {
        Self {
            calls: PeriodTargets {
                daily: 140,
                weekly: 840,
                monthly: 3640,
            },
            bookings: PeriodTargets {
                daily: 21,
                weekly: 126,
                monthly: 546,
            },
            attendance: PeriodTargets {
                daily: 11,
                weekly: 66,
                monthly: 273,
            },
            conversion_rate: 0.25,
            attendance_rate: 0.50,
        }
    }

    pub const fn metric(&self, metric: Metric) -> PeriodTargets {
        match metric {
            Metric::Calls => self.calls,
            Metric::Bookings => self.bookings,
            Metric::Attendance => self.attendance,
        }
    }
}

impl Default for TargetSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Today's raw counts for the metrics that roll up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawDaily {
    pub calls: u64,
    pub bookings: u64,
    pub attendance: u64,
}

/// Validated daily entry, including the leads figure that never rolls up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyCounts {
    pub calls: u64,
    pub bookings: u64,
    pub attendance: u64,
    pub leads: u64,
}

impl DailyCounts {
    pub const fn raw(&self) -> RawDaily {
        RawDaily {
            calls: self.calls,
            bookings: self.bookings,
            attendance: self.attendance,
        }
    }
}

/// Rolled-up counters for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeriodTotals {
    pub daily: u64,
    pub weekly: u64,
    pub monthly: u64,
}

impl PeriodTotals {
    pub const fn for_period(&self, period: Period) -> u64 {
        match period {
            Period::Daily => self.daily,
            Period::Weekly => self.weekly,
            Period::Monthly => self.monthly,
        }
    }
}

/// The single stored document per participant, keyed by `name`.
///
/// Field names follow the shared document store layout so partial documents
/// written by older clients still deserialize.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateRecord {
    pub name: String,
    pub calls_daily: u64,
    pub calls_weekly: u64,
    pub calls_monthly: u64,
    pub bookings_daily: u64,
    pub bookings_weekly: u64,
    pub bookings_monthly: u64,
    pub attendance_daily: u64,
    pub attendance_weekly: u64,
    pub attendance_monthly: u64,
    pub daily_leads: u64,
    pub conv_rate: f64,
    pub attendance_rate: f64,
    pub last_update: Option<DateTime<Utc>>,
}

impl AggregateRecord {
    /// Prior state for a participant who has never submitted.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn totals(&self, metric: Metric) -> PeriodTotals {
        match metric {
            Metric::Calls => PeriodTotals {
                daily: self.calls_daily,
                weekly: self.calls_weekly,
                monthly: self.calls_monthly,
            },
            Metric::Bookings => PeriodTotals {
                daily: self.bookings_daily,
                weekly: self.bookings_weekly,
                monthly: self.bookings_monthly,
            },
            Metric::Attendance => PeriodTotals {
                daily: self.attendance_daily,
                weekly: self.attendance_weekly,
                monthly: self.attendance_monthly,
            },
        }
    }
}

/// How a second submission on the same calendar day is treated.
///
/// Replaying a day's entry adds it to the weekly and monthly totals again, so
/// the default refuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResubmissionPolicy {
    #[default]
    RejectSameDay,
    Allow,
}

impl ResubmissionPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject_same_day" | "reject" => Some(Self::RejectSameDay),
            "allow" => Some(Self::Allow),
            _ => None,
        }
    }
}
