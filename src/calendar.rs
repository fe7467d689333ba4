// SPDX-License-Identifier: MIT

//! Calendar grid construction for the dashboards.
//!
//! Pure functions: entry presence comes in through caller-supplied lookups,
//! keeping the generator decoupled from the storage layer.

use chrono::{Datelike, Local, Month, NaiveDate, Weekday};

use crate::models::DayEntry;

/// One cell in the month grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    /// Day-of-month number
    pub day: u32,
    /// ISO `YYYY-MM-DD`
    pub date: String,
    /// Cell belongs to the previous or next month
    pub other_month: bool,
    pub today: bool,
    pub has_entry: bool,
    /// Set only when `has_entry` is true
    pub entry: Option<DayEntry>,
}

/// Everything needed to render one month of the calendar.
#[derive(Debug, Clone)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub prev_month: u32,
    pub prev_year: i32,
    pub next_month: u32,
    pub next_year: i32,
    pub days: Vec<CalendarDay>,
}

/// Maximum grid size: six full weeks.
const MAX_CELLS: usize = 42;

/// Build the grid for a month, marking "today" by the local calendar date.
pub fn month_view<H, E>(year: i32, month: u32, has_entry: H, entry: E) -> CalendarMonth
where
    H: Fn(&str) -> bool,
    E: Fn(&str) -> Option<DayEntry>,
{
    month_view_at(Local::now().date_naive(), year, month, has_entry, entry)
}

/// As [`month_view`], with "today" supplied by the caller.
pub fn month_view_at<H, E>(
    today: NaiveDate,
    year: i32,
    month: u32,
    has_entry: H,
    entry: E,
) -> CalendarMonth
where
    H: Fn(&str) -> bool,
    E: Fn(&str) -> Option<DayEntry>,
{
    // Invalid input falls back to the current month rather than failing.
    let (first, year, month) = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => (first, year, month),
        None => {
            let first = today.with_day(1).unwrap_or(today);
            (first, today.year(), today.month())
        }
    };

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let (prev_year, prev_month) = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };

    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(first);

    // Start from the Sunday on or before the first of the month.
    let mut start = first;
    while start.weekday() != Weekday::Sun {
        match start.pred_opt() {
            Some(d) => start = d,
            None => break,
        }
    }

    let mut days = Vec::with_capacity(MAX_CELLS);
    let mut current = start;

    for _ in 0..MAX_CELLS {
        let date = current.format("%Y-%m-%d").to_string();
        let other_month = current.month() != month || current.year() != year;

        let mut day = CalendarDay {
            day: current.day(),
            date: date.clone(),
            other_month,
            today: current == today,
            has_entry: false,
            entry: None,
        };

        if !other_month {
            day.has_entry = has_entry(&date);
            if day.has_entry {
                day.entry = entry(&date);
            }
        }

        days.push(day);

        current = match current.succ_opt() {
            Some(d) => d,
            None => break,
        };

        // The grid ends at the first Sunday strictly after the month.
        if current > last && current.weekday() == Weekday::Sun {
            break;
        }
    }

    let month_name = Month::try_from(month as u8).map(|m| m.name()).unwrap_or("");

    CalendarMonth {
        year,
        month,
        month_name,
        prev_month,
        prev_year,
        next_month,
        next_year,
        days,
    }
}
