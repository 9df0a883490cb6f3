use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nibble_core::models::Entry;
use nibble_core::session::Theme;

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => parse_date_str(&s),
    }
}

pub(crate) fn parse_date_str(s: &str) -> Result<NaiveDate> {
    match s.trim() {
        "today" => Ok(Local::now().date_naive()),
        "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
        "tomorrow" => Ok(Local::now().date_naive() + chrono::Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").with_context(|| {
            format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
        }),
    }
}

/// Parse "YYYY-MM" into `(year, month)`.
pub(crate) fn parse_month(s: &str) -> Result<(i32, u32)> {
    let s = s.trim();
    let (year, month) = s
        .split_once('-')
        .with_context(|| format!("Invalid month '{s}'. Use YYYY-MM"))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in '{s}'"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("Invalid month in '{s}'"))?;
    if !(1..=12).contains(&month) {
        bail!("Month must be between 01 and 12, got {month}");
    }
    Ok((year, month))
}

pub(crate) fn print_entry_table(entries: &[&Entry], theme: Theme) {
    #[derive(Tabled)]
    struct EntryRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Meal")]
        meal: String,
        #[tabled(rename = "Food")]
        food: String,
        #[tabled(rename = "kcal")]
        calories: u32,
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|e| EntryRow {
            id: e.id.clone(),
            time: e.date.with_timezone(&Local).format("%H:%M").to_string(),
            meal: e.meal_type.to_string(),
            food: truncate(&e.food_name, 35),
            calories: e.calories,
        })
        .collect();

    let mut table = Table::new(&rows);
    match theme {
        Theme::Light => table.with(Style::rounded()),
        Theme::Dark => table.with(Style::modern()),
    };
    let table = table
        .with(Modify::new(Columns::new(4..5)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_none() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(None).unwrap(), today);
    }

    #[test]
    fn test_parse_date_keywords() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(Some("today".to_string())).unwrap(), today);
        assert_eq!(
            parse_date(Some("yesterday".to_string())).unwrap(),
            today - chrono::Duration::days(1)
        );
        assert_eq!(
            parse_date(Some("tomorrow".to_string())).unwrap(),
            today + chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date(Some("2024-01-15".to_string())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date(Some("nope".to_string())).is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-03").unwrap(), (2024, 3));
        assert_eq!(parse_month(" 2023-12 ").unwrap(), (2023, 12));
    }

    #[test]
    fn test_parse_month_invalid() {
        assert!(parse_month("2024").is_err());
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("2024-00").is_err());
        assert!(parse_month("march").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
        assert_eq!(truncate("日清カップヌードル", 8), "日清カップ...");
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("nope"), r#"{"error":"nope"}"#);
    }
}
