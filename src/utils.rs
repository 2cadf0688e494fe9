use chrono::{Datelike, NaiveDate, Utc};

/// Lookback window for historical price requests: `years` back from today
/// (UTC) through today.
pub fn lookback_range(years: i32) -> (NaiveDate, NaiveDate) {
    lookback_range_from(Utc::now().date_naive(), years)
}

/// Same as [`lookback_range`] with an explicit end date.
///
/// The start date keeps the end date's month and day with the year reduced
/// by `years`. When that day does not exist in the target year (Feb 29
/// landing on a non-leap year) the start clamps backward to the last valid
/// day of the month.
pub fn lookback_range_from(end: NaiveDate, years: i32) -> (NaiveDate, NaiveDate) {
    let year = end.year() - years;
    let mut day = end.day();
    let start = loop {
        match NaiveDate::from_ymd_opt(year, end.month(), day) {
            Some(date) => break date,
            None => day -= 1,
        }
    };
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn plain_lookback_keeps_month_and_day() {
        let (start, end) = lookback_range_from(date(2026, 8, 24), 20);
        assert_eq!(start, date(2006, 8, 24));
        assert_eq!(end, date(2026, 8, 24));
    }

    #[test]
    fn leap_day_clamps_to_feb_28() {
        let (start, _) = lookback_range_from(date(2024, 2, 29), 1);
        assert_eq!(start, date(2023, 2, 28));
    }

    #[test]
    fn leap_day_to_leap_year_is_exact() {
        let (start, _) = lookback_range_from(date(2024, 2, 29), 4);
        assert_eq!(start, date(2020, 2, 29));
    }
}
