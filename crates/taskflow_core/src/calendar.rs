//! crates/taskflow_core/src/calendar.rs
//!
//! Date arithmetic for the month view and per-day lookups of events and tasks.

use crate::domain::{Event, Task};
use chrono::{Datelike, NaiveDate};

pub fn events_on(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|e| e.date == date).collect()
}

pub fn tasks_due_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.due_date == Some(date)).collect()
}

/// Number of days in `month` (1-12) of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = shift_month(year, month, 1)?;
    let next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    u32::try_from((next - first).num_days()).ok()
}

/// Moves `delta` months forward (or backward when negative).
///
/// `None` when `month` is outside 1-12 or the result does not fit in an `i32` year.
pub fn shift_month(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let index = year
        .checked_mul(12)?
        .checked_add(i32::try_from(month).ok()? - 1)?
        .checked_add(delta)?;
    let shifted = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    Some((index.div_euclid(12), shifted))
}

/// The cells of a Monday-first month grid: one `None` per weekday before the
/// 1st, then `Some(day)` for every day of the month.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<Option<u32>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days = days_in_month(year, month)?;
    let leading = first.weekday().num_days_from_monday();

    let mut cells: Vec<Option<u32>> = (0..leading).map(|_| None).collect();
    cells.extend((1..=days).map(Some));
    Some(cells)
}
