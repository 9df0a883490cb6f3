use anyhow::Result;
use chrono::Local;
use std::io::{self, Write};
use std::process;

use nibble_core::grouping::meal_breakdown;
use nibble_core::models::{DaySummary, MealShare};
use nibble_core::session::Session;

use super::helpers::{parse_date, print_entry_table, truncate};

/// Grouped list for one day. Empty meal buckets get a placeholder row so
/// all four meals are always shown.
pub(crate) fn write_day(out: &mut impl Write, summary: &DaySummary) -> io::Result<()> {
    let date = summary.date.format("%A, %B %-d, %Y");
    writeln!(out, "=== {date} ===\n")?;

    for meal in &summary.meals {
        let meal_label = meal.meal_type.label().to_uppercase();
        let sub_cal = meal.subtotal_calories;
        writeln!(out, "  {meal_label} ({sub_cal} kcal)")?;
        if meal.is_empty() {
            writeln!(out, "    (nothing logged)")?;
        }
        for e in &meal.entries {
            let id = &e.id;
            let name = truncate(&e.food_name, 40);
            let time = e.date.with_timezone(&Local).format("%H:%M");
            let cal = e.calories;
            writeln!(out, "    [{id}] {time} {name} — {cal} kcal")?;
        }
        writeln!(out)?;
    }

    let total = summary.total_calories;
    let count = summary.entry_count;
    writeln!(out, "  TOTAL: {total} kcal ({count} entries)")
}

pub(crate) fn write_breakdown(out: &mut impl Write, shares: &[MealShare]) -> io::Result<()> {
    const BAR_WIDTH: u64 = 30;
    for share in shares {
        let label = share.meal_type.label();
        let cal = share.calories;
        let pct = share.percent;
        let filled = usize::try_from(pct * BAR_WIDTH / 100).unwrap_or(0);
        let bar = "#".repeat(filled);
        writeln!(out, "  {label:<10} {bar:<30} {pct:>3}%  {cal} kcal")?;
    }
    Ok(())
}

pub(crate) fn cmd_day(
    session: &mut Session,
    date: Option<String>,
    table: bool,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    session.select_day(date);
    let summary = session.day_summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if table {
        let entries: Vec<_> = summary.meals.iter().flat_map(|m| &m.entries).collect();
        if entries.is_empty() {
            eprintln!("No entries for {date}");
            process::exit(2);
        }
        print_entry_table(&entries, session.theme());
        println!("\n  TOTAL: {} kcal", summary.total_calories);
        return Ok(());
    }

    write_day(&mut io::stdout().lock(), &summary)?;
    Ok(())
}

pub(crate) fn cmd_breakdown(session: &mut Session, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    session.select_day(date);
    let summary = session.day_summary();
    let shares = meal_breakdown(&summary.meals);

    if json {
        println!("{}", serde_json::to_string_pretty(&shares)?);
        return Ok(());
    }

    let mut out = io::stdout().lock();
    writeln!(out, "=== {date} ({} kcal) ===\n", summary.total_calories)?;
    write_breakdown(&mut out, &shares)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nibble_core::grouping::summarize_day;
    use nibble_core::models::{Entry, MealType, parse_entry_date};

    fn entry(id: &str, name: &str, calories: u32, date: &str, meal_type: MealType) -> Entry {
        Entry {
            id: id.to_string(),
            food_name: name.to_string(),
            calories,
            date: parse_entry_date(date).unwrap(),
            meal_type,
        }
    }

    fn render(summary: &DaySummary) -> String {
        let mut buf = Vec::new();
        write_day(&mut buf, summary).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_day_shows_every_meal() {
        let entries = vec![
            entry("1", "Egg", 72, "2024-03-15T08:00:00", MealType::Breakfast),
            entry("2", "Apple", 52, "2024-03-15T15:30:00", MealType::Snack),
            entry("3", "Banana", 89, "2024-03-16T08:00:00", MealType::Breakfast),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let text = render(&summarize_day(&entries, day));

        assert!(text.contains("Friday, March 15, 2024"));
        assert!(text.contains("BREAKFAST (72 kcal)"));
        assert!(text.contains("[1] 08:00 Egg — 72 kcal"));
        assert!(text.contains("LUNCH (0 kcal)"));
        assert!(text.contains("DINNER (0 kcal)"));
        assert!(text.contains("SNACK (52 kcal)"));
        assert!(!text.contains("Banana"));
        assert_eq!(text.matches("(nothing logged)").count(), 2);
        assert!(text.contains("TOTAL: 124 kcal (2 entries)"));
    }

    #[test]
    fn test_write_day_empty() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let text = render(&summarize_day(&[], day));
        assert_eq!(text.matches("(nothing logged)").count(), 4);
        assert!(text.contains("TOTAL: 0 kcal (0 entries)"));
    }

    #[test]
    fn test_write_breakdown_bars() {
        let entries = vec![
            entry("1", "Rice", 300, "2024-03-15T12:00:00", MealType::Lunch),
            entry("2", "Chicken", 100, "2024-03-15T19:00:00", MealType::Dinner),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let shares = meal_breakdown(&summarize_day(&entries, day).meals);

        let mut buf = Vec::new();
        write_breakdown(&mut buf, &shares).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("  Breakfast"));
        assert!(lines[0].contains("  0%"));
        assert!(lines[1].contains(&"#".repeat(22)));
        assert!(lines[1].contains(" 75%  300 kcal"));
        assert!(lines[2].contains(" 25%  100 kcal"));
    }
}
