use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::models::Entry;

/// Days covered by the year density view, today included.
pub const YEAR_WINDOW_DAYS: i64 = 365;

/// Entries whose timestamp falls on `day` in the local timezone.
#[must_use]
pub fn entries_for_day(entries: &[Entry], day: NaiveDate) -> Vec<&Entry> {
    entries.iter().filter(|e| e.local_day() == day).collect()
}

#[must_use]
pub fn calories_for_day(entries: &[Entry], day: NaiveDate) -> u64 {
    entries
        .iter()
        .filter(|e| e.local_day() == day)
        .map(|e| u64::from(e.calories))
        .sum()
}

#[derive(Debug, Clone, Copy, Default)]
struct DayTotal {
    calories: u64,
    entries: usize,
}

fn daily_totals(entries: &[Entry]) -> HashMap<NaiveDate, DayTotal> {
    let mut totals: HashMap<NaiveDate, DayTotal> = HashMap::new();
    for e in entries {
        let t = totals.entry(e.local_day()).or_default();
        t.calories += u64::from(e.calories);
        t.entries += 1;
    }
    totals
}

/// Bucket a day's calories: 0, under 1500, under 2000, under 2500, the rest.
#[must_use]
pub fn density_level(calories: u64) -> u8 {
    match calories {
        0 => 0,
        1..1500 => 1,
        1500..2000 => 2,
        2000..2500 => 3,
        _ => 4,
    }
}

/// Sunday on or before `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Saturday on or after `date`.
#[must_use]
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    date + Duration::days(i64::from(6 - date.weekday().num_days_from_sunday()))
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("Invalid month {year}-{month:02}"))
}

/// First day of the month `delta` months away from the month containing `date`.
pub fn shift_month(date: NaiveDate, delta: i32) -> Result<NaiveDate> {
    let first = first_of_month(date.year(), date.month())?;
    let shifted = if delta >= 0 {
        first.checked_add_months(Months::new(delta.unsigned_abs()))
    } else {
        first.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.context("Month out of range")
}

#[must_use]
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub calories: u64,
    pub entry_count: usize,
    pub in_month: bool,
}

/// Rectangular Sunday-first grid covering every week that touches the month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    #[must_use]
    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells.iter().find(|c| c.date == date)
    }

    #[must_use]
    pub fn month_total(&self) -> u64 {
        self.cells
            .iter()
            .filter(|c| c.in_month)
            .map(|c| c.calories)
            .sum()
    }
}

pub fn month_grid(entries: &[Entry], year: i32, month: u32) -> Result<MonthGrid> {
    let first = first_of_month(year, month)?;
    let last = shift_month(first, 1)?.pred_opt().context("Month out of range")?;
    let totals = daily_totals(entries);

    let grid_end = end_of_week(last);
    let cells = start_of_week(first)
        .iter_days()
        .take_while(|d| *d <= grid_end)
        .map(|date| {
            let t = totals.get(&date).copied().unwrap_or_default();
            DayCell {
                date,
                calories: t.calories,
                entry_count: t.entries,
                in_month: same_month(date, first),
            }
        })
        .collect();

    Ok(MonthGrid { year, month, cells })
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum YearCell {
    /// Placeholder outside the window; has no date and cannot be selected.
    Padding,
    Day {
        date: NaiveDate,
        calories: u64,
        level: u8,
    },
}

impl YearCell {
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            YearCell::Padding => None,
            YearCell::Day { date, .. } => Some(*date),
        }
    }
}

/// Density grid for the last `YEAR_WINDOW_DAYS` days, one column per
/// Sunday-first week.
#[derive(Debug, Clone, Serialize)]
pub struct YearGrid {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub weeks: Vec<Vec<YearCell>>,
    /// Entries logged inside the window.
    pub entry_count: usize,
}

#[must_use]
pub fn year_grid(entries: &[Entry], today: NaiveDate) -> YearGrid {
    let start = today - Duration::days(YEAR_WINDOW_DAYS - 1);
    let totals = daily_totals(entries);

    let lead = start.weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<YearCell> = Vec::new();
    cells.extend(std::iter::repeat_with(|| YearCell::Padding).take(lead));
    for date in start.iter_days().take_while(|d| *d <= today) {
        let calories = totals.get(&date).map_or(0, |t| t.calories);
        cells.push(YearCell::Day {
            date,
            calories,
            level: density_level(calories),
        });
    }
    while cells.len() % 7 != 0 {
        cells.push(YearCell::Padding);
    }

    let entry_count = entries
        .iter()
        .filter(|e| (start..=today).contains(&e.local_day()))
        .count();

    YearGrid {
        start,
        end: today,
        weeks: cells.chunks(7).map(<[YearCell]>::to_vec).collect(),
        entry_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealType, parse_entry_date};

    fn entry(id: &str, calories: u32, date: &str) -> Entry {
        Entry {
            id: id.to_string(),
            food_name: format!("food {id}"),
            calories,
            date: parse_entry_date(date).unwrap(),
            meal_type: MealType::Snack,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_entries_for_day_uses_calendar_day() {
        let entries = vec![
            entry("late", 100, "2024-03-15T23:59:00"),
            entry("early", 200, "2024-03-15T00:01:00"),
            entry("next", 400, "2024-03-16T00:00:01"),
        ];
        let day = entries_for_day(&entries, ymd(2024, 3, 15));
        let ids: Vec<&str> = day.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["late", "early"]);
        assert_eq!(calories_for_day(&entries, ymd(2024, 3, 15)), 300);
        assert_eq!(calories_for_day(&entries, ymd(2024, 3, 16)), 400);
        assert_eq!(calories_for_day(&entries, ymd(2024, 3, 17)), 0);
    }

    #[test]
    fn test_density_levels() {
        assert_eq!(density_level(0), 0);
        assert_eq!(density_level(1), 1);
        assert_eq!(density_level(1499), 1);
        assert_eq!(density_level(1500), 2);
        assert_eq!(density_level(1999), 2);
        assert_eq!(density_level(2000), 3);
        assert_eq!(density_level(2499), 3);
        assert_eq!(density_level(2500), 4);
        assert_eq!(density_level(9000), 4);
    }

    #[test]
    fn test_week_bounds() {
        // 2024-03-15 is a Friday
        assert_eq!(start_of_week(ymd(2024, 3, 15)), ymd(2024, 3, 10));
        assert_eq!(end_of_week(ymd(2024, 3, 15)), ymd(2024, 3, 16));
        // Sunday and Saturday are their own bounds
        assert_eq!(start_of_week(ymd(2024, 3, 10)), ymd(2024, 3, 10));
        assert_eq!(end_of_week(ymd(2024, 3, 16)), ymd(2024, 3, 16));
    }

    #[test]
    fn test_shift_month() {
        assert_eq!(shift_month(ymd(2024, 1, 31), 1).unwrap(), ymd(2024, 2, 1));
        assert_eq!(shift_month(ymd(2024, 1, 15), -1).unwrap(), ymd(2023, 12, 1));
        assert_eq!(shift_month(ymd(2024, 12, 5), 0).unwrap(), ymd(2024, 12, 1));
    }

    #[test]
    fn test_month_grid_march_2024() {
        let entries = vec![
            entry("1", 500, "2024-03-15T08:00:00"),
            entry("2", 700, "2024-03-15T19:00:00"),
            entry("3", 300, "2024-02-29T12:00:00"),
        ];
        let grid = month_grid(&entries, 2024, 3).unwrap();

        // March 2024 starts on a Friday and ends on a Sunday: Feb 25 .. Apr 6
        assert_eq!(grid.cells.first().unwrap().date, ymd(2024, 2, 25));
        assert_eq!(grid.cells.last().unwrap().date, ymd(2024, 4, 6));
        assert_eq!(grid.cells.len(), 42);
        assert_eq!(grid.weeks().count(), 6);

        let cell = grid.cell(ymd(2024, 3, 15)).unwrap();
        assert!(cell.in_month);
        assert_eq!(cell.calories, 1200);
        assert_eq!(cell.entry_count, 2);

        let leading = grid.cell(ymd(2024, 2, 29)).unwrap();
        assert!(!leading.in_month);
        assert_eq!(leading.calories, 300);

        assert_eq!(grid.month_total(), 1200);
        assert_eq!(grid.cells.iter().filter(|c| c.in_month).count(), 31);
    }

    #[test]
    fn test_month_grid_exact_weeks() {
        // February 2015 starts on Sunday and ends on Saturday
        let grid = month_grid(&[], 2015, 2).unwrap();
        assert_eq!(grid.cells.len(), 28);
        assert!(grid.cells.iter().all(|c| c.in_month && c.calories == 0));
    }

    #[test]
    fn test_month_grid_invalid_month() {
        assert!(month_grid(&[], 2024, 13).is_err());
        assert!(month_grid(&[], 2024, 0).is_err());
    }

    #[test]
    fn test_year_grid_layout() {
        let today = ymd(2024, 3, 15);
        let grid = year_grid(&[], today);
        assert_eq!(grid.end, today);
        assert_eq!(grid.start, ymd(2023, 3, 17));

        let dated: Vec<NaiveDate> = grid
            .weeks
            .iter()
            .flatten()
            .filter_map(YearCell::date)
            .collect();
        assert_eq!(dated.len(), 365);
        assert_eq!(dated[0], grid.start);
        assert_eq!(*dated.last().unwrap(), today);
        assert!(grid.weeks.iter().all(|w| w.len() == 7));

        // 2023-03-17 is a Friday: five leading placeholders
        let first_week = &grid.weeks[0];
        assert!(first_week[..5].iter().all(|c| c.date().is_none()));
        assert_eq!(first_week[5].date(), Some(grid.start));

        // 2024-03-15 is a Friday: one trailing placeholder
        let last_week = grid.weeks.last().unwrap();
        assert_eq!(last_week[5].date(), Some(today));
        assert!(last_week[6].date().is_none());
    }

    #[test]
    fn test_year_grid_levels_and_count() {
        let today = ymd(2024, 3, 15);
        let entries = vec![
            entry("1", 1600, "2024-03-14T12:00:00"),
            entry("2", 2600, "2024-03-15T12:00:00"),
            entry("old", 900, "2022-01-01T12:00:00"),
        ];
        let grid = year_grid(&entries, today);
        assert_eq!(grid.entry_count, 2);

        let level_of = |d: NaiveDate| {
            grid.weeks
                .iter()
                .flatten()
                .find_map(|c| match c {
                    YearCell::Day { date, level, .. } if *date == d => Some(*level),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(level_of(ymd(2024, 3, 14)), 2);
        assert_eq!(level_of(today), 4);
        assert_eq!(level_of(ymd(2024, 3, 13)), 0);
    }

    #[test]
    fn test_year_grid_serializes_padding_without_date() {
        let grid = year_grid(&[], ymd(2024, 3, 15));
        let json = serde_json::to_value(&grid.weeks[0][0]).unwrap();
        assert_eq!(json["kind"], "padding");
        assert!(json.get("date").is_none());
    }
}
