use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, TimeZone,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Display order of the meal buckets.
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        validate_meal_type(s)
    }
}

pub fn validate_meal_type(meal: &str) -> Result<MealType> {
    let lower = meal.trim().to_lowercase();
    MealType::ALL
        .into_iter()
        .find(|m| m.as_str() == lower)
        .with_context(|| {
            let names: Vec<&str> = MealType::ALL.iter().map(|m| m.as_str()).collect();
            format!(
                "Invalid meal type '{meal}'. Must be one of: {}",
                names.join(", ")
            )
        })
}

/// One logged food item. Field names match the persisted JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub food_name: String,
    #[serde(deserialize_with = "de_calories")]
    pub calories: u32,
    #[serde(serialize_with = "ser_entry_date", deserialize_with = "de_entry_date")]
    pub date: DateTime<FixedOffset>,
    pub meal_type: MealType,
}

impl Entry {
    #[must_use]
    pub fn from_match(
        id: String,
        food: &FoodMatch,
        meal_type: MealType,
        date: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id,
            food_name: food.name.clone(),
            calories: food.calories,
            date,
            meal_type,
        }
    }

    /// Calendar day of the entry in the local timezone.
    #[must_use]
    pub fn local_day(&self) -> NaiveDate {
        self.date.with_timezone(&Local).date_naive()
    }
}

/// Parse a stored or user-supplied timestamp.
///
/// Accepts RFC 3339 (`2024-03-15T23:59:00+01:00`, `...Z`), a naive timestamp
/// (`2024-03-15T23:59:00`, interpreted in the local timezone) or a bare date
/// (local midnight).
pub fn parse_entry_date(s: &str) -> Result<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .with_context(|| format!("Invalid entry date '{s}'"))?;
    local_timestamp(naive)
}

/// Longest DST gap searched past before giving up.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Resolve a wall-clock time in `tz`. Ambiguous times take the earlier
/// instant; a time skipped by a DST transition moves forward to the first
/// wall-clock minute after the gap.
#[must_use]
pub fn resolve_wall_clock<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    let mut candidate = naive;
    for _ in 0..=MAX_GAP_MINUTES {
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return Some(dt);
        }
        candidate = candidate.checked_add_signed(TimeDelta::minutes(1))?;
    }
    None
}

/// [`resolve_wall_clock`] in the local timezone.
pub fn local_timestamp(naive: NaiveDateTime) -> Result<DateTime<FixedOffset>> {
    resolve_wall_clock(&Local, naive)
        .map(|dt| dt.fixed_offset())
        .with_context(|| format!("'{naive}' does not exist in the local timezone"))
}

fn ser_entry_date<S: Serializer>(date: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn de_entry_date<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<FixedOffset>, D::Error> {
    let raw = String::deserialize(d)?;
    parse_entry_date(&raw).map_err(serde::de::Error::custom)
}

/// Calories may have been written as `52` or `52.0`; anything fractional or
/// negative is rejected.
#[allow(clippy::cast_sign_loss)]
fn de_calories<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(d)?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(serde::de::Error::custom(format!(
            "calories must be a non-negative whole number, got {value}"
        )));
    }
    Ok(value as u32)
}

/// Where a food lookup result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Remote,
    Fallback,
    Manual,
}

/// A resolved food: canonical name plus kilocalories per serving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodMatch {
    pub name: String,
    pub calories: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealGroup {
    pub meal_type: MealType,
    pub entries: Vec<Entry>,
    pub subtotal_calories: u64,
}

impl MealGroup {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub meals: Vec<MealGroup>,
    pub total_calories: u64,
    pub entry_count: usize,
}

/// Share of a day's calories eaten at one meal.
#[derive(Debug, Clone, Serialize)]
pub struct MealShare {
    pub meal_type: MealType,
    pub calories: u64,
    pub percent: u64,
}
