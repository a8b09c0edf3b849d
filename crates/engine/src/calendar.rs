//! Rent calendar.
//!
//! Weeks start on Monday and rent for a week is due on its Thursday. A date
//! later than Thursday is governed by the *next* week's Thursday.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Weekday every rent week is due on.
pub const DUE_WEEKDAY: Weekday = Weekday::Thu;

/// How many days before a due date a payment still counts for that week.
pub const PAYMENT_LOOKBACK_DAYS: u64 = 7;

/// How many days after a due date a payment still counts for that week.
pub const PAYMENT_GRACE_DAYS: u64 = 3;

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Thursday deadline governing `date`.
///
/// Monday..Thursday map to the Thursday of the same week, Friday..Sunday to
/// the Thursday of the following week.
pub fn due_date(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday();
    let due = DUE_WEEKDAY.num_days_from_monday();
    if weekday <= due {
        date + Days::new(u64::from(due - weekday))
    } else {
        date + Days::new(u64::from(7 + due - weekday))
    }
}

/// Inclusive range of payment dates credited to the week due on `due`.
pub fn payment_window(due: NaiveDate) -> (NaiveDate, NaiveDate) {
    (
        due - Days::new(PAYMENT_LOOKBACK_DAYS),
        due + Days::new(PAYMENT_GRACE_DAYS),
    )
}

/// Monday week starts covering `[from, to]`, oldest first.
///
/// The first item is the Monday of `from`'s week, so a window starting
/// mid-week still includes that week. Empty when `to < from`.
pub fn week_starts(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let first = (from <= to).then(|| week_start(from));
    std::iter::successors(first, |week| week.checked_add_days(Days::new(7)))
        .take_while(move |week| *week <= to)
}
