use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::domain::{Metric, Period};
use super::super::scoring::{StatusResult, Tier};

/// Progress gauge for one counted metric over one period.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorView {
    pub metric: Metric,
    pub period: Period,
    pub title: String,
    pub value: u64,
    pub target: u64,
    /// Filled share of the gauge, 0..=100.
    pub gauge_percent: u8,
    pub status: StatusResult,
}

/// Daily ratio compared against its fractional target.
#[derive(Debug, Clone, Serialize)]
pub struct RateIndicatorView {
    pub title: &'static str,
    pub value: f64,
    pub target: f64,
    pub display_value: String,
    pub display_target: String,
    pub status: StatusResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct BannerView {
    pub color_class: &'static str,
    pub phrase: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantDashboard {
    pub name: String,
    pub last_update: Option<DateTime<Utc>>,
    pub indicators: Vec<IndicatorView>,
    pub conversion_rate: RateIndicatorView,
    pub attendance_rate: RateIndicatorView,
    pub banner: BannerView,
}

impl ParticipantDashboard {
    pub fn indicator(&self, metric: Metric, period: Period) -> Option<&IndicatorView> {
        self.indicators
            .iter()
            .find(|indicator| indicator.metric == metric && indicator.period == period)
    }
}

/// One scored cell of the team table.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryCell {
    pub display: String,
    pub tier: Tier,
    pub label: &'static str,
    pub color_class: &'static str,
}

impl SummaryCell {
    pub(crate) fn new(display: String, status: &StatusResult) -> Self {
        Self {
            display,
            tier: status.tier,
            label: status.label,
            color_class: status.color_class,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub name: String,
    pub calls: SummaryCell,
    pub bookings: SummaryCell,
    pub attendance: SummaryCell,
    pub conversion_rate: SummaryCell,
}

/// Daily targets printed in the table header.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryTargets {
    pub calls: u64,
    pub bookings: u64,
    pub attendance: u64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub targets: SummaryTargets,
    pub rows: Vec<SummaryRow>,
}

impl TeamSummary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
