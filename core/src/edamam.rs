use serde::Deserialize;

use crate::models::FoodMatch;

/// Body of the Edamam food-database parser endpoint.
#[derive(Debug, Deserialize)]
pub struct ParserResponse {
    #[serde(default)]
    pub hints: Vec<Hint>,
}

#[derive(Debug, Deserialize)]
pub struct Hint {
    pub food: HintFood,
}

#[derive(Debug, Deserialize)]
pub struct HintFood {
    pub label: Option<String>,
    pub nutrients: Option<Nutrients>,
}

#[derive(Debug, Deserialize)]
pub struct Nutrients {
    #[serde(rename = "ENERC_KCAL")]
    pub energy_kcal: Option<f64>,
}

/// Convert a hint into a match, rounding calories to the nearest integer.
/// Hints without a label or a usable energy value are dropped.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn hint_to_match(hint: Hint) -> Option<FoodMatch> {
    let name = hint.food.label.filter(|l| !l.trim().is_empty())?;
    let kcal = hint.food.nutrients?.energy_kcal?;
    if !kcal.is_finite() || kcal < 0.0 {
        return None;
    }
    Some(FoodMatch {
        name,
        calories: kcal.round().min(f64::from(u32::MAX)) as u32,
    })
}

#[must_use]
pub fn response_to_matches(resp: ParserResponse) -> Vec<FoodMatch> {
    resp.hints.into_iter().filter_map(hint_to_match).collect()
}
