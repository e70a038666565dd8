//! Month grid builder for the calendar page.
//!
//! # Responsibility
//! - Map a validated `(year, month)` to leading blanks plus one cell per day.
//! - Annotate day cells with "today" and "has items" flags.
//! - Hold the day-click selection and keep it consistent with deletions.
//!
//! # Invariants
//! - `cells.len() == first_weekday_of_month + days_in_month`.
//! - At most one cell has `is_today == true`.
//! - Weekday indexes use 0 = Sunday .. 6 = Saturday.
//! - Every `YearMonth` lies within the years `NaiveDate` can represent.

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::view::todo::{tasks_on_date, upcoming_items};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

/// A calendar month with `month` within `1..=12` and a year `NaiveDate` supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// # Errors
    /// - `InvalidMonth` outside `1..=12`.
    /// - `YearOutOfRange` outside the years representable by `NaiveDate`.
    pub fn new(year: i32, month: u32) -> Result<Self, TaskValidationError> {
        if !(1..=12).contains(&month) {
            return Err(TaskValidationError::InvalidMonth(month));
        }
        if !(NaiveDate::MIN.year()..=NaiveDate::MAX.year()).contains(&year) {
            return Err(TaskValidationError::YearOutOfRange(year));
        }
        Ok(Self { year, month })
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Month before `self`, or `None` before the first supported year.
    pub fn previous(self) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year.checked_sub(1)?, 12).ok()
        } else {
            Some(Self {
                year: self.year,
                month: self.month - 1,
            })
        }
    }

    /// Month after `self`, or `None` past the last supported year.
    pub fn next(self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year.checked_add(1)?, 1).ok()
        } else {
            Some(Self {
                year: self.year,
                month: self.month + 1,
            })
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(month: YearMonth) -> u32 {
    match month.month {
        2 if is_leap_year(month.year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Weekday of day 1 (0 = Sunday).
pub fn first_weekday_of_month(month: YearMonth) -> u32 {
    // Sakamoto's method on the proleptic Gregorian calendar.
    const OFFSETS: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let mut year = i64::from(month.year);
    if month.month < 3 {
        year -= 1;
    }
    let index = (month.month - 1) as usize;
    let sum = year + year.div_euclid(4) - year.div_euclid(100) + year.div_euclid(400)
        + OFFSETS[index]
        + 1;
    sum.rem_euclid(7) as u32
}

/// One annotated day of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub day: u32,
    pub is_today: bool,
    pub has_items: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalendarCell {
    /// Placeholder before day 1.
    Blank,
    Day(DayCell),
}

impl CalendarCell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            Self::Blank => None,
            Self::Day(cell) => Some(cell),
        }
    }
}

pub fn build_grid(month: YearMonth, tasks: &[Task], today: NaiveDate) -> Vec<CalendarCell> {
    let leading = first_weekday_of_month(month);
    let day_count = days_in_month(month);
    let busy_days: HashSet<u32> = tasks
        .iter()
        .filter_map(|task| task.deadline)
        .filter(|deadline| month.contains(*deadline))
        .map(|deadline| deadline.day())
        .collect();
    let today_in_month = month.contains(today).then_some(today.day());

    let mut cells = Vec::with_capacity((leading + day_count) as usize);
    cells.extend((0..leading).map(|_| CalendarCell::Blank));
    cells.extend((1..=day_count).map(|day| {
        CalendarCell::Day(DayCell {
            day,
            is_today: today_in_month == Some(day),
            has_items: busy_days.contains(&day),
        })
    }));
    cells
}

/// Calendar page projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub month: YearMonth,
    pub cells: Vec<CalendarCell>,
    pub upcoming: Vec<Task>,
}

pub fn derive_calendar_view(month: YearMonth, tasks: &[Task], today: NaiveDate) -> CalendarView {
    CalendarView {
        month,
        cells: build_grid(month, tasks, today),
        upcoming: upcoming_items(tasks, today),
    }
}

/// Items shown after clicking a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateSelection {
    date: NaiveDate,
    items: Vec<Task>,
}

impl DateSelection {
    pub fn select(date: NaiveDate, tasks: &[Task]) -> Self {
        Self {
            date,
            items: tasks_on_date(tasks, date),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn items(&self) -> &[Task] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops a deleted item. Returns whether it was part of the selection.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.items.len();
        self.items.retain(|task| task.id != id);
        self.items.len() != before
    }
}
