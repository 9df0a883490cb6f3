use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::fallback::find_fallback;
use crate::models::{FoodMatch, MatchSource};

/// Remote nutrition lookup.
///
/// The CLI implements this with reqwest against Edamam. An `Err` means the
/// call itself failed (network, status, body); an empty `Ok` means the
/// service answered with no candidates.
pub trait FoodLookupProvider {
    fn search(&self, query: &str) -> impl Future<Output = anyhow::Result<Vec<FoodMatch>>> + Send;
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no food found for '{query}'")]
    NotFound { query: String },
    #[error("food lookup for '{query}' failed: {message}")]
    Transport { query: String, message: String },
}

impl LookupError {
    #[must_use]
    pub fn query(&self) -> &str {
        match self {
            LookupError::NotFound { query } | LookupError::Transport { query, .. } => query,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub food: FoodMatch,
    pub source: MatchSource,
    /// Set when the remote call failed and the fallback table answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_error: Option<String>,
}

enum RemoteOutcome {
    Empty,
    Failed(String),
}

/// Resolve a free-text query: remote first, fallback table second.
///
/// Remote failures never escape directly; they are routed into the fallback
/// stage and only reported if that misses too.
pub async fn lookup_food<P: FoodLookupProvider>(
    provider: &P,
    query: &str,
) -> Result<Resolution, LookupError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(LookupError::NotFound {
            query: String::new(),
        });
    }

    let outcome = match provider.search(query).await {
        Ok(candidates) => match candidates.into_iter().next() {
            Some(food) => {
                tracing::debug!(%query, name = %food.name, "remote lookup hit");
                return Ok(Resolution {
                    food,
                    source: MatchSource::Remote,
                    transport_error: None,
                });
            }
            None => RemoteOutcome::Empty,
        },
        Err(e) => {
            let message = format!("{e:#}");
            tracing::warn!(%query, error = %message, "remote lookup failed, trying fallback table");
            RemoteOutcome::Failed(message)
        }
    };

    resolve_fallback(query, outcome)
}

fn resolve_fallback(query: &str, outcome: RemoteOutcome) -> Result<Resolution, LookupError> {
    match (find_fallback(query), outcome) {
        (Some(food), RemoteOutcome::Empty) => Ok(Resolution {
            food,
            source: MatchSource::Fallback,
            transport_error: None,
        }),
        (Some(food), RemoteOutcome::Failed(message)) => Ok(Resolution {
            food,
            source: MatchSource::Fallback,
            transport_error: Some(message),
        }),
        (None, RemoteOutcome::Empty) => Err(LookupError::NotFound {
            query: query.to_string(),
        }),
        (None, RemoteOutcome::Failed(message)) => Err(LookupError::Transport {
            query: query.to_string(),
            message,
        }),
    }
}
