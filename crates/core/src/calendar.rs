//! Month grid for the planner's date picker.
//!
//! Weeks start on Monday. Cells before the first and after the last day of
//! the month are `None` so that every week has exactly seven cells.

use chrono::{Datelike, Months, NaiveDate};

use crate::PlanDate;

/// Column headings, Monday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// One day cell of a [`MonthGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: PlanDate,
    /// Day of the month (1-31).
    pub day: u32,
    pub is_selected: bool,
    pub is_today: bool,
}

/// The month containing the selected date, laid out in weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub selected: PlanDate,
    pub weeks: Vec<Vec<Option<CalendarDay>>>,
}

impl MonthGrid {
    /// Lay out the month of `selected`, flagging `today` if it falls inside.
    #[must_use]
    pub fn new(selected: PlanDate, today: PlanDate) -> Self {
        let selected_day = selected.as_naive();
        let first = selected_day.with_day(1).unwrap_or(selected_day);
        let leading = first.weekday().num_days_from_monday() as usize;

        let mut cells: Vec<Option<CalendarDay>> = vec![None; leading];
        cells.extend(
            first
                .iter_days()
                .take_while(|d| d.month() == first.month() && d.year() == first.year())
                .map(|d| {
                    Some(CalendarDay {
                        date: PlanDate::from_naive(d),
                        day: d.day(),
                        is_selected: d == selected_day,
                        is_today: d == today.as_naive(),
                    })
                }),
        );
        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        let weeks = cells.chunks(7).map(<[_]>::to_vec).collect();

        Self { selected, weeks }
    }

    /// Heading such as `June 2024`.
    #[must_use]
    pub fn title(&self) -> String {
        self.selected.as_naive().format("%B %Y").to_string()
    }

    /// Same day of the previous month, clamped to that month's last day.
    #[must_use]
    pub fn previous_month(&self) -> PlanDate {
        shift(self.selected.as_naive(), |d| d.checked_sub_months(Months::new(1)))
    }

    /// Same day of the next month, clamped to that month's last day.
    #[must_use]
    pub fn next_month(&self) -> PlanDate {
        shift(self.selected.as_naive(), |d| d.checked_add_months(Months::new(1)))
    }

    /// All day cells in order, skipping blanks.
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flatten().flatten()
    }
}

fn shift(date: NaiveDate, f: impl Fn(NaiveDate) -> Option<NaiveDate>) -> PlanDate {
    PlanDate::from_naive(f(date).unwrap_or(date))
}
