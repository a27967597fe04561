use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::DateWindow;

/// Length of the reporting window in days, both ends inclusive
pub const WINDOW_DAYS: u32 = 7;

/// Computes the reporting window for a run on `today`
///
/// The window ends on the most recent Friday (today itself when today is a
/// Friday) and starts six days earlier, so it always spans seven days.
pub fn weekly_window(today: NaiveDate) -> DateWindow {
    let days_since_friday = (today.weekday().num_days_from_monday() + 7
        - Weekday::Fri.num_days_from_monday())
        % 7;
    let end = today - Duration::days(i64::from(days_since_friday));
    DateWindow::ending_on(end, WINDOW_DAYS)
}
