use anyhow::Result;
use std::process;

use crate::edamam::EdamamClient;
use nibble_core::lookup::lookup_food;
use nibble_core::models::MatchSource;

use super::entry::lookup_failure_message;
use super::helpers::json_error;

pub(crate) async fn cmd_search(client: &EdamamClient, query: &str, json: bool) -> Result<()> {
    let resolution = match lookup_food(client, query).await {
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

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    let name = &resolution.food.name;
    let cal = resolution.food.calories;
    let source = match resolution.source {
        MatchSource::Remote => "Edamam",
        MatchSource::Fallback => "built-in table",
        MatchSource::Manual => "manual",
    };
    println!("{name} — {cal} kcal ({source})");
    if resolution.transport_error.is_some() {
        eprintln!("Note: nutrition service unavailable, using the built-in value");
    }

    Ok(())
}
