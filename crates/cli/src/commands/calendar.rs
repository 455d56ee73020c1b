//! Text month calendar.

use std::fmt::Write;

use daily_planner_core::{MonthGrid, PlanDate, calendar::WEEKDAY_LABELS};

/// Print the month around `selected`.
pub fn print(selected: PlanDate, today: PlanDate) {
    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&MonthGrid::new(selected, today)));
    }
}

/// Render a Monday-first month grid.
///
/// Each cell is three columns wide: a marker and a right-aligned day. The
/// selected day is marked `*`, today (when not selected) `+`.
pub fn render(grid: &MonthGrid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", grid.title());

    let header: String = WEEKDAY_LABELS.iter().map(|label| format!(" {label}")).collect();
    let _ = writeln!(out, "{header}");

    for week in &grid.weeks {
        let line: String = week
            .iter()
            .map(|cell| match cell {
                None => "   ".to_string(),
                Some(day) => {
                    let marker = if day.is_selected {
                        '*'
                    } else if day.is_today {
                        '+'
                    } else {
                        ' '
                    };
                    format!("{marker}{:>2}", day.day)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let _ = writeln!(
        out,
        "< {}    {} >",
        grid.previous_month(),
        grid.next_month()
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_june_2024() {
        let selected = PlanDate::parse("2024-06-15").unwrap();
        let today = PlanDate::parse("2024-06-03").unwrap();
        let text = render(&MonthGrid::new(selected, today));
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "June 2024");
        assert_eq!(lines[1], " Mo Tu We Th Fr Sa Su");
        // June 1st 2024 is a Saturday.
        assert_eq!(lines[2], "                 1  2");
        assert_eq!(lines[3], "+ 3  4  5  6  7  8  9");
        assert_eq!(lines[4], " 10 11 12 13 14*15 16");
        assert_eq!(lines.last().copied(), Some("< 2024-05-15    2024-07-15 >"));
    }
}
