pub mod views;

pub use views::{
    BannerView, IndicatorView, ParticipantDashboard, RateIndicatorView, SummaryCell, SummaryRow,
    SummaryTargets, TeamSummary,
};

use super::domain::{AggregateRecord, Metric, Period, TargetSet};
use super::scoring::{ScoreEngine, StatusResult};

impl ParticipantDashboard {
    /// Score every metric/period pair plus the two daily rates. The banner
    /// reuses the daily calls status so its phrase matches that gauge.
    pub fn build(record: &AggregateRecord, targets: &TargetSet, engine: &ScoreEngine) -> Self {
        let mut indicators = Vec::with_capacity(9);
        for metric in Metric::ordered() {
            let totals = record.totals(metric);
            let goals = targets.metric(metric);
            for period in Period::ordered() {
                let value = totals.for_period(period);
                let target = goals.for_period(period);
                let status = engine.score(value as f64, target as f64);
                indicators.push(IndicatorView {
                    metric,
                    period,
                    title: format!("{} {}", period.label(), metric.label()),
                    value,
                    target,
                    gauge_percent: gauge_percent(&status),
                    status,
                });
            }
        }

        // Metric::Calls and Period::Daily lead their orderings.
        let daily_calls = &indicators[0].status;
        let banner = BannerView {
            color_class: daily_calls.color_class,
            phrase: daily_calls.phrase.clone(),
        };

        Self {
            name: record.name.clone(),
            last_update: record.last_update,
            indicators,
            conversion_rate: rate_indicator(
                "Conversion Rate",
                record.conv_rate,
                targets.conversion_rate,
                engine,
            ),
            attendance_rate: rate_indicator(
                "Attendance Rate",
                record.attendance_rate,
                targets.attendance_rate,
                engine,
            ),
            banner,
        }
    }
}

impl TeamSummary {
    /// Rows for every participant with a stored record: roster order first,
    /// then any other stored names alphabetically.
    pub fn build(
        mut records: Vec<AggregateRecord>,
        roster: &[String],
        targets: &TargetSet,
        engine: &ScoreEngine,
    ) -> Self {
        records.sort_by(|left, right| {
            let rank = |name: &str| roster.iter().position(|member| member == name);
            match (rank(&left.name), rank(&right.name)) {
                (Some(l), Some(r)) => l.cmp(&r),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => left.name.cmp(&right.name),
            }
        });

        let rows = records
            .iter()
            .map(|record| {
                let cell = |value: u64, target: u64| {
                    let status = engine.score(value as f64, target as f64);
                    SummaryCell::new(value.to_string(), &status)
                };
                let conversion = engine.score(record.conv_rate, targets.conversion_rate);

                SummaryRow {
                    name: record.name.clone(),
                    calls: cell(record.calls_daily, targets.calls.daily),
                    bookings: cell(record.bookings_daily, targets.bookings.daily),
                    attendance: cell(record.attendance_daily, targets.attendance.daily),
                    conversion_rate: SummaryCell::new(
                        format!("{:.1}%", record.conv_rate * 100.0),
                        &conversion,
                    ),
                }
            })
            .collect();

        Self {
            targets: SummaryTargets {
                calls: targets.calls.daily,
                bookings: targets.bookings.daily,
                attendance: targets.attendance.daily,
                conversion_rate: targets.conversion_rate,
            },
            rows,
        }
    }
}

fn rate_indicator(
    title: &'static str,
    value: f64,
    target: f64,
    engine: &ScoreEngine,
) -> RateIndicatorView {
    RateIndicatorView {
        title,
        value,
        target,
        display_value: format!("{:.1}%", value * 100.0),
        display_target: format!("{:.0}%", target * 100.0),
        status: engine.score(value, target),
    }
}

/// Gauge fill, capped at 100 and floored at 0.
pub fn gauge_percent(status: &StatusResult) -> u8 {
    let rounded = status.percentage.round();
    if rounded.is_nan() || rounded <= 0.0 {
        return 0;
    }
    rounded.min(100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::performance::scoring::FixedPhrasePicker;
    use std::sync::Arc;

    fn engine() -> ScoreEngine {
        ScoreEngine::with_picker(Arc::new(FixedPhrasePicker(0)))
    }

    #[test]
    fn gauge_caps_at_one_hundred_and_floors_at_zero() {
        let engine = engine();
        assert_eq!(gauge_percent(&engine.score(300.0, 140.0)), 100);
        assert_eq!(gauge_percent(&engine.score(70.0, 140.0)), 50);
        assert_eq!(gauge_percent(&engine.score(-5.0, 140.0)), 0);
        assert_eq!(gauge_percent(&engine.score(5.0, 0.0)), 0);
    }

    #[test]
    fn dashboard_scores_each_metric_and_period() {
        let mut record = AggregateRecord::empty("Bayan");
        record.calls_daily = 140;
        record.calls_weekly = 600;
        record.calls_monthly = 1000;
        record.conv_rate = 0.42;

        let dashboard = ParticipantDashboard::build(&record, &TargetSet::standard(), &engine());

        assert_eq!(dashboard.indicators.len(), 9);
        let daily = dashboard
            .indicator(Metric::Calls, Period::Daily)
            .expect("daily calls indicator");
        assert_eq!(daily.status.label, "Excellent");
        assert_eq!(daily.title, "Daily Calls");
        let weekly = dashboard
            .indicator(Metric::Calls, Period::Weekly)
            .expect("weekly calls indicator");
        assert_eq!(weekly.status.label, "Average");
        assert_eq!(dashboard.banner.color_class, daily.status.color_class);
        assert_eq!(dashboard.conversion_rate.display_value, "42.0%");
        assert_eq!(dashboard.conversion_rate.display_target, "25%");
        assert_eq!(dashboard.attendance_rate.status.label, "Poor");
    }
}
