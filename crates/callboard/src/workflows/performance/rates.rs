//! Daily ratios derived from a single submission. Never accumulated.

/// Bookings per marketing lead; zero when no leads were logged.
pub fn conversion_rate(bookings: u64, leads: u64) -> f64 {
    if leads == 0 {
        return 0.0;
    }
    bookings as f64 / leads as f64
}

/// Attendance per booking; zero when nothing was booked.
pub fn attendance_rate(bookings: u64, attendance: u64) -> f64 {
    if bookings == 0 {
        return 0.0;
    }
    attendance as f64 / bookings as f64
}

/// Spreadsheet form of a fraction, e.g. `0.42` -> `"42.00%"`.
pub fn format_percentage(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_rate_divides_bookings_by_leads() {
        assert!((conversion_rate(21, 50) - 0.42).abs() < 1e-12);
        assert_eq!(conversion_rate(21, 0), 0.0);
    }

    #[test]
    fn attendance_rate_divides_attendance_by_bookings() {
        assert!((attendance_rate(21, 11) - 0.5238).abs() < 1e-4);
        assert_eq!(attendance_rate(0, 11), 0.0);
    }

    #[test]
    fn percentages_keep_two_decimals() {
        assert_eq!(format_percentage(0.42), "42.00%");
        assert_eq!(format_percentage(attendance_rate(21, 11)), "52.38%");
        assert_eq!(format_percentage(0.0), "0.00%");
    }
}
