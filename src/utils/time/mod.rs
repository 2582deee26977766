// Time utility functions
// Minute-of-day labels and week arithmetic for the timeline

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};

/// 12-hour label for a minute of the day, period first: `AM 09:30`.
pub fn format_minutes(minutes: i32) -> String {
    let minutes = minutes.max(0);
    let mut hour = minutes / 60;
    let minute = minutes % 60;
    let period = if hour < 12 { "AM" } else { "PM" };
    if hour > 12 {
        hour -= 12;
    }
    if hour == 0 {
        hour = 12;
    }
    format!("{} {:02}:{:02}", period, hour, minute)
}

/// Grid label for an hour line: `9:00`.
pub fn hour_label(hour: i32) -> String {
    format!("{}:00", hour)
}

/// Whole minutes since midnight.
pub fn minute_of_day(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// The Sunday-first week containing `date`.
pub fn week_of(date: NaiveDate) -> [NaiveDate; 7] {
    let offset = date.weekday().num_days_from_sunday() as i64;
    let sunday = date - Duration::days(offset);
    std::array::from_fn(|i| sunday + Duration::days(i as i64))
}

/// Single-letter weekday header, Sunday first.
pub fn weekday_initial(date: NaiveDate) -> &'static str {
    const INITIALS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];
    INITIALS[date.weekday().num_days_from_sunday() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, "AM 12:00" ; "midnight")]
    #[test_case(570, "AM 09:30" ; "morning")]
    #[test_case(719, "AM 11:59" ; "just before noon")]
    #[test_case(720, "PM 12:00" ; "noon")]
    #[test_case(765, "PM 12:45" ; "after noon")]
    #[test_case(1425, "PM 11:45" ; "late evening")]
    fn test_format_minutes(minutes: i32, expected: &str) {
        assert_eq!(format_minutes(minutes), expected);
    }

    #[test]
    fn test_hour_label() {
        assert_eq!(hour_label(0), "0:00");
        assert_eq!(hour_label(24), "24:00");
    }

    #[test]
    fn test_minute_of_day() {
        let time = NaiveTime::from_hms_opt(14, 5, 59).unwrap();
        assert_eq!(minute_of_day(time), 845);
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2024-09-05 is a Thursday
        let date = NaiveDate::from_ymd_opt(2024, 9, 5).unwrap();
        let week = week_of(date);
        assert_eq!(week[0], NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(week[6], NaiveDate::from_ymd_opt(2024, 9, 7).unwrap());
        assert_eq!(weekday_initial(week[0]), "S");
        assert_eq!(weekday_initial(date), "T");
    }

    #[test]
    fn test_week_of_sunday_is_itself() {
        let sunday = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert_eq!(week_of(sunday)[0], sunday);
    }
}
