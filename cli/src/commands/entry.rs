use anyhow::{Result, bail};
use chrono::Local;
use std::process;

use crate::edamam::EdamamClient;
use nibble_core::lookup::{LookupError, Resolution, lookup_food};
use nibble_core::models::{FoodMatch, MatchSource, validate_meal_type};
use nibble_core::session::Session;

use super::helpers::{json_error, parse_date};

/// User-facing text for a failed lookup. Both kinds read the same; the
/// transport detail only goes to the log.
pub(crate) fn lookup_failure_message(err: &LookupError) -> String {
    if let LookupError::Transport { message, .. } = err {
        tracing::debug!(error = %message, "lookup transport failure");
    }
    format!("Food not found: '{}'", err.query())
}

/// Resolve what to log: a manual calorie value skips the lookup entirely.
pub(crate) async fn resolve_food(
    client: &EdamamClient,
    food_query: &str,
    calories: Option<u32>,
) -> Result<Resolution, LookupError> {
    match calories {
        Some(calories) => {
            let name = food_query.trim();
            if name.is_empty() {
                return Err(LookupError::NotFound {
                    query: String::new(),
                });
            }
            Ok(Resolution {
                food: FoodMatch {
                    name: name.to_string(),
                    calories,
                },
                source: MatchSource::Manual,
                transport_error: None,
            })
        }
        None => lookup_food(client, food_query).await,
    }
}

pub(crate) async fn cmd_add(
    session: &mut Session,
    client: &EdamamClient,
    food_query: &str,
    meal: &str,
    date: Option<String>,
    calories: Option<u32>,
    json: bool,
) -> Result<()> {
    let meal_type = validate_meal_type(meal)?;
    let date = parse_date(date)?;
    session.select_day(date);

    let resolution = match resolve_food(client, food_query, calories).await {
        Ok(r) => r,
        Err(e) => {
            let message = lookup_failure_message(&e);
            if json {
                println!("{}", json_error(&message));
            } else {
                eprintln!("{message}");
            }
            process::exit(2);
        }
    };

    if resolution.transport_error.is_some() && !json {
        eprintln!("Note: nutrition service unavailable, using the built-in value");
    }

    let entry = session.add_food(&resolution.food, meal_type, &Local::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let name = &entry.food_name;
        let cal = entry.calories;
        let id = &entry.id;
        println!("Logged: {name} for {meal_type} on {date} — {cal} kcal (id: {id})");
    }

    Ok(())
}

pub(crate) fn cmd_delete(session: &mut Session, entry_id: &str, json: bool) -> Result<()> {
    let entry_id = entry_id.trim();
    if entry_id.is_empty() {
        bail!("Entry ID must not be empty");
    }

    if session.delete_entry(entry_id)? {
        if json {
            println!("{}", serde_json::json!({ "deleted": entry_id }));
        } else {
            println!("Deleted entry {entry_id}");
        }
        Ok(())
    } else {
        if json {
            println!("{}", json_error(&format!("Entry {entry_id} not found")));
        } else {
            eprintln!("Entry {entry_id} not found");
        }
        process::exit(2);
    }
}
