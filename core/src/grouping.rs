use chrono::NaiveDate;

use crate::calendar::entries_for_day;
use crate::models::{DaySummary, Entry, MealGroup, MealShare, MealType};
use crate::store::total_calories;

/// Partition entries into the four meal buckets, in `MealType::ALL` order.
/// Relative order inside a bucket follows the input; empty buckets are kept.
pub fn group_by_meal_type<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Vec<MealGroup> {
    let mut groups: Vec<MealGroup> = MealType::ALL
        .into_iter()
        .map(|meal_type| MealGroup {
            meal_type,
            entries: Vec::new(),
            subtotal_calories: 0,
        })
        .collect();

    for entry in entries {
        // ALL is in declaration order, so the discriminant is the bucket index
        let group = &mut groups[entry.meal_type as usize];
        group.subtotal_calories += u64::from(entry.calories);
        group.entries.push(entry.clone());
    }

    groups
}

#[must_use]
pub fn summarize_day(entries: &[Entry], date: NaiveDate) -> DaySummary {
    let day = entries_for_day(entries, date);
    let total_calories = total_calories(day.iter().copied());
    let entry_count = day.len();
    DaySummary {
        date,
        meals: group_by_meal_type(day),
        total_calories,
        entry_count,
    }
}

/// Calories per meal type with each meal's rounded percentage of the total.
#[must_use]
pub fn meal_breakdown(groups: &[MealGroup]) -> Vec<MealShare> {
    let total: u64 = groups.iter().map(|g| g.subtotal_calories).sum();
    groups
        .iter()
        .map(|g| MealShare {
            meal_type: g.meal_type,
            calories: g.subtotal_calories,
            percent: if total == 0 {
                0
            } else {
                (g.subtotal_calories * 100 + total / 2) / total
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::parse_entry_date;

    fn entry(id: &str, calories: u32, meal_type: MealType, date: &str) -> Entry {
        Entry {
            id: id.to_string(),
            food_name: format!("food {id}"),
            calories,
            date: parse_entry_date(date).unwrap(),
            meal_type,
        }
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("1", 300, MealType::Lunch, "2024-03-15T12:00:00"),
            entry("2", 52, MealType::Breakfast, "2024-03-15T08:00:00"),
            entry("3", 450, MealType::Lunch, "2024-03-15T12:30:00"),
            entry("4", 89, MealType::Snack, "2024-03-15T16:00:00"),
            entry("5", 700, MealType::Dinner, "2024-03-14T19:00:00"),
        ]
    }

    #[test]
    fn test_group_has_four_buckets_in_order() {
        let groups = group_by_meal_type(&sample());
        let order: Vec<MealType> = groups.iter().map(|g| g.meal_type).collect();
        assert_eq!(order, MealType::ALL.to_vec());
    }

    #[test]
    fn test_group_preserves_relative_order() {
        let groups = group_by_meal_type(&sample());
        let lunch: Vec<&str> = groups[1].entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(lunch, vec!["1", "3"]);
        assert_eq!(groups[1].subtotal_calories, 750);
    }

    #[test]
    fn test_group_sizes_sum_and_union() {
        let entries = sample();
        let groups = group_by_meal_type(&entries);
        let total: usize = groups.iter().map(|g| g.entries.len()).sum();
        assert_eq!(total, entries.len());

        let ids: HashSet<&str> = groups
            .iter()
            .flat_map(|g| g.entries.iter().map(|e| e.id.as_str()))
            .collect();
        let expected: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_group_keeps_empty_buckets() {
        let only_snack = vec![entry("1", 89, MealType::Snack, "2024-03-15T16:00:00")];
        let groups = group_by_meal_type(&only_snack);
        assert_eq!(groups.len(), 4);
        assert!(groups[0].is_empty());
        assert!(groups[1].is_empty());
        assert!(groups[2].is_empty());
        assert_eq!(groups[3].entries.len(), 1);
        assert_eq!(groups[0].subtotal_calories, 0);
    }

    #[test]
    fn test_group_empty_input() {
        let groups = group_by_meal_type(&[]);
        assert_eq!(groups.len(), 4);
        assert!(groups.iter().all(MealGroup::is_empty));
    }

    #[test]
    fn test_summarize_day_filters_to_date() {
        let entries = sample();
        let summary = summarize_day(&entries, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(summary.entry_count, 4);
        assert_eq!(summary.total_calories, 891);
        assert!(summary.meals[2].is_empty());
    }

    #[test]
    fn test_meal_breakdown_percentages() {
        let entries = vec![
            entry("1", 500, MealType::Breakfast, "2024-03-15T08:00:00"),
            entry("2", 250, MealType::Lunch, "2024-03-15T12:00:00"),
            entry("3", 250, MealType::Dinner, "2024-03-15T19:00:00"),
        ];
        let shares = meal_breakdown(&group_by_meal_type(&entries));
        let percents: Vec<u64> = shares.iter().map(|s| s.percent).collect();
        assert_eq!(percents, vec![50, 25, 25, 0]);
        assert_eq!(shares[0].calories, 500);
    }

    #[test]
    fn test_meal_breakdown_rounds() {
        let entries = vec![
            entry("1", 1, MealType::Breakfast, "2024-03-15T08:00:00"),
            entry("2", 2, MealType::Lunch, "2024-03-15T12:00:00"),
        ];
        let shares = meal_breakdown(&group_by_meal_type(&entries));
        // 1/3 = 33.3%, 2/3 = 66.7%
        assert_eq!(shares[0].percent, 33);
        assert_eq!(shares[1].percent, 67);
    }

    #[test]
    fn test_meal_breakdown_empty_day() {
        let shares = meal_breakdown(&group_by_meal_type(&[]));
        assert_eq!(shares.len(), 4);
        assert!(shares.iter().all(|s| s.percent == 0 && s.calories == 0));
    }
}
