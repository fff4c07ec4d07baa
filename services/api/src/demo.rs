use crate::infra::{InMemoryArchiveLog, InMemoryPerformanceStore};
use callboard::config::AppConfig;
use callboard::error::AppError;
use callboard::workflows::performance::{
    ArchiveAction, ArchiveFanout, CsvArchivePublisher, Metric, ParticipantDashboard,
    PerformanceService, PerformanceStore, Period, PhraseBook, RandomPhrasePicker, RollupEngine,
    ScoreEngine, SubmissionError, SubmissionRequest, TeamSummary,
};
use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

const MAX_DEMO_DAYS: u32 = 366;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// First simulated day (YYYY-MM-DD). Defaults so the run ends today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Number of consecutive days to simulate (at most 366).
    #[arg(long, default_value_t = 10)]
    pub(crate) days: u32,
    /// Also append archive rows to this CSV ledger.
    #[arg(long)]
    pub(crate) archive_csv: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        start,
        days,
        archive_csv,
    } = args;

    let config = AppConfig::load()?;
    let calendar = config.team.calendar;
    let today = Utc::now().with_timezone(&calendar).date_naive();
    let dates = simulated_days(start, today, days);

    let store = Arc::new(InMemoryPerformanceStore::default());
    store
        .subscribe(Box::new(|record| {
            println!(
                "    live update: {} -> calls {}/{}/{}",
                record.name, record.calls_daily, record.calls_weekly, record.calls_monthly
            );
        }))
        .map_err(SubmissionError::from)?;

    let log = InMemoryArchiveLog::default();
    let mut archive = ArchiveFanout::new().with_sink(log.clone());
    if let Some(path) = archive_csv {
        println!("Archive rows are also appended to {}", path.display());
        archive = archive.with_sink(CsvArchivePublisher::new(path));
    }

    let service = PerformanceService::new(
        store.clone(),
        Arc::new(archive),
        RollupEngine::new(calendar),
        Arc::new(ScoreEngine::new(
            config.team.thresholds,
            PhraseBook::standard(),
            Arc::new(RandomPhrasePicker),
        )),
        config.team.submission_settings(),
    );

    println!(
        "Call-center performance demo: {} day(s) from {} (calendar UTC{})",
        dates.len(),
        dates[0],
        calendar
    );

    for (offset, &day) in dates.iter().enumerate() {
        store.pin_clock(morning_of(day, calendar));
        println!("\n{} ({})", day, day.format("%A"));

        for (seat, name) in config.team.roster.iter().enumerate() {
            let request = simulated_entry(name, offset, seat);
            match service.submit(request) {
                Ok(receipt) => {
                    let mut notes = Vec::new();
                    if receipt.reset.monthly {
                        notes.push("new month");
                    }
                    if receipt.reset.weekly {
                        notes.push("new week");
                    }
                    if receipt.archive.action == ArchiveAction::ArchiveAndInsert {
                        notes.push("archive previous month");
                    }
                    println!(
                        "  - {}: {} calls, {} bookings, {} attended, {} leads -> {} [{}]{}",
                        name,
                        receipt.archive.calls,
                        receipt.archive.bookings,
                        receipt.archive.attendance,
                        receipt.archive.leads,
                        receipt.daily_status.label,
                        receipt.archive.conversion_rate,
                        if notes.is_empty() {
                            String::new()
                        } else {
                            format!(" ({})", notes.join(", "))
                        }
                    );
                }
                Err(err) => println!("  - {}: submission rejected: {}", name, err),
            }
        }
    }

    for name in &config.team.roster {
        if let Some(dashboard) = service.dashboard(name)? {
            render_dashboard(&dashboard);
        }
    }

    render_summary(&service.summary()?);

    let rows = log.rows();
    let month_closures = rows
        .iter()
        .filter(|row| row.action == ArchiveAction::ArchiveAndInsert)
        .count();
    println!(
        "\nArchive: {} row(s) exported, {} month closure(s)",
        rows.len(),
        month_closures
    );

    Ok(())
}

/// Consecutive days to simulate, at most [`MAX_DEMO_DAYS`], ending today
/// unless a start is given. Stops early at the last representable date.
fn simulated_days(start: Option<NaiveDate>, today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    let days = days.clamp(1, MAX_DEMO_DAYS);
    let start = start.unwrap_or_else(|| {
        today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .unwrap_or(NaiveDate::MIN)
    });
    std::iter::successors(Some(start), |day| day.succ_opt())
        .take(days as usize)
        .collect()
}

fn morning_of(day: NaiveDate, calendar: FixedOffset) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    let shift = Duration::hours(9) - Duration::seconds(i64::from(calendar.local_minus_utc()));
    Utc.from_utc_datetime(&midnight.checked_add_signed(shift).unwrap_or(midnight))
}

/// Deterministic spread of good, middling, and weak days per seat.
fn simulated_entry(name: &str, day: usize, seat: usize) -> SubmissionRequest {
    let calls = 90 + (day * 37 + seat * 53) % 80;
    let bookings = 10 + (day * 7 + seat * 5) % 16;
    let attendance = bookings / 2 + (day + seat) % 4;
    let leads = 40 + (day * 11 + seat * 13) % 40;
    SubmissionRequest::new(
        name,
        calls as i64,
        bookings as i64,
        attendance as i64,
        leads as i64,
    )
}

fn render_dashboard(dashboard: &ParticipantDashboard) {
    println!("\nDashboard: {}", dashboard.name);
    println!("  {}", dashboard.banner.phrase);
    for metric in Metric::ordered() {
        let cells: Vec<String> = Period::ordered()
            .into_iter()
            .filter_map(|period| dashboard.indicator(metric, period))
            .map(|indicator| {
                format!(
                    "{} {}/{} {:>3}% {}",
                    indicator.period.label(),
                    indicator.value,
                    indicator.target,
                    indicator.gauge_percent,
                    indicator.status.label
                )
            })
            .collect();
        println!("  {:<10} | {}", metric.label(), cells.join(" | "));
    }
    for rate in [&dashboard.conversion_rate, &dashboard.attendance_rate] {
        println!(
            "  {:<15} {} (target {}) {}",
            rate.title, rate.display_value, rate.display_target, rate.status.label
        );
    }
}

fn render_summary(summary: &TeamSummary) {
    println!("\nTeam summary (daily)");
    if summary.is_empty() {
        println!("  no submissions yet");
        return;
    }
    let targets = summary.targets;
    println!(
        "  {:<12} | {:<18} | {:<18} | {:<18} | {:<18}",
        "Name",
        format!("Calls ({})", targets.calls),
        format!("Bookings ({})", targets.bookings),
        format!("Attendance ({})", targets.attendance),
        format!("Conv ({:.0}%)", targets.conversion_rate * 100.0)
    );
    for row in &summary.rows {
        let cells: Vec<String> = [&row.calls, &row.bookings, &row.attendance, &row.conversion_rate]
            .into_iter()
            .map(|cell| format!("{} {}", cell.display, cell.label))
            .collect();
        println!(
            "  {:<12} | {:<18} | {:<18} | {:<18} | {:<18}",
            row.name, cells[0], cells[1], cells[2], cells[3]
        );
    }
}
