use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use std::io::{self, Write};

use nibble_core::calendar::{MonthGrid, YEAR_WINDOW_DAYS, YearCell, YearGrid};
use nibble_core::session::{Session, Theme, View};

use super::helpers::parse_month;

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const CELL_WIDTH: usize = 7;

fn density_glyphs(theme: Theme) -> [char; 5] {
    match theme {
        Theme::Light => ['·', '░', '▒', '▓', '█'],
        Theme::Dark => ['.', ':', '+', '*', '#'],
    }
}

fn day_label(date: NaiveDate, today: NaiveDate, highlighted: Option<NaiveDate>) -> String {
    let day = date.day();
    if highlighted == Some(date) {
        format!("[{day}]")
    } else if date == today {
        format!("{day}*")
    } else {
        day.to_string()
    }
}

/// Month view: one row of day numbers and one row of calories per week.
/// Days of neighbouring months are shown as a dot. `*` marks today and
/// brackets mark the highlighted day.
pub(crate) fn write_month(
    out: &mut impl Write,
    grid: &MonthGrid,
    today: NaiveDate,
    highlighted: Option<NaiveDate>,
    theme: Theme,
) -> io::Result<()> {
    let width = CELL_WIDTH * 7;
    let title = NaiveDate::from_ymd_opt(grid.year, grid.month, 1)
        .map_or_else(String::new, |d| d.format("%B %Y").to_string());
    writeln!(out, "{title:^width$}")?;

    let rule = match theme {
        Theme::Light => '-',
        Theme::Dark => '=',
    };
    for name in WEEKDAYS {
        write!(out, "{name:^CELL_WIDTH$}")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", rule.to_string().repeat(width))?;

    for week in grid.weeks() {
        for cell in week {
            let label = if cell.in_month {
                day_label(cell.date, today, highlighted)
            } else {
                "·".to_string()
            };
            write!(out, "{label:^CELL_WIDTH$}")?;
        }
        writeln!(out)?;
        for cell in week {
            let cal = if cell.in_month && cell.calories > 0 {
                cell.calories.to_string()
            } else {
                String::new()
            };
            write!(out, "{cal:^CELL_WIDTH$}")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", rule.to_string().repeat(width))?;
    writeln!(out, "Month total: {} kcal", grid.month_total())
}

/// Year view: weeks run left to right, weekdays top to bottom.
pub(crate) fn write_year(out: &mut impl Write, grid: &YearGrid, theme: Theme) -> io::Result<()> {
    let glyphs = density_glyphs(theme);

    let mut labels = vec![' '; grid.weeks.len()];
    let mut free_from = 0;
    for (col, week) in grid.weeks.iter().enumerate() {
        if col < free_from || col + 3 > labels.len() {
            continue;
        }
        let first = week
            .iter()
            .filter_map(YearCell::date)
            .find(|d| d.day() == 1);
        if let Some(first) = first {
            let name = first.format("%b").to_string();
            for (i, ch) in name.chars().take(3).enumerate() {
                labels[col + i] = ch;
            }
            free_from = col + 4;
        }
    }
    let labels: String = labels.into_iter().collect();
    writeln!(out, "    {}", labels.trim_end())?;

    for (row, name) in WEEKDAYS.iter().enumerate() {
        let line: String = grid
            .weeks
            .iter()
            .map(|week| match week.get(row) {
                Some(YearCell::Day { level, .. }) => {
                    glyphs.get(usize::from(*level)).copied().unwrap_or(glyphs[4])
                }
                _ => ' ',
            })
            .collect();
        writeln!(out, "{name}  {}", line.trim_end())?;
    }

    let legend: String = glyphs.iter().map(|g| format!("{g} ")).collect();
    writeln!(out, "\n    Less {legend}More")?;
    let (start, end, count) = (grid.start, grid.end, grid.entry_count);
    writeln!(
        out,
        "    {count} entries in the last {YEAR_WINDOW_DAYS} days ({start} to {end})"
    )
}

pub(crate) fn cmd_month(session: &mut Session, month: Option<String>, json: bool) -> Result<()> {
    if let Some(month) = month {
        let (year, month) = parse_month(&month)?;
        session.show_month(year, month)?;
    }
    session.set_view(View::Calendar);
    let grid = session.month_grid()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    let today = Local::now().date_naive();
    write_month(
        &mut io::stdout().lock(),
        &grid,
        today,
        session.highlighted_day(),
        session.theme(),
    )?;
    Ok(())
}

pub(crate) fn cmd_year(session: &mut Session, json: bool) -> Result<()> {
    session.set_view(View::Calendar);
    let grid = session.year_grid(Local::now().date_naive());

    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    write_year(&mut io::stdout().lock(), &grid, session.theme())?;
    Ok(())
}
