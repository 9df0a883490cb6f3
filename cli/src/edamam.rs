use anyhow::{Context, Result};

use nibble_core::edamam::{ParserResponse, response_to_matches};
use nibble_core::lookup::FoodLookupProvider;
use nibble_core::models::FoodMatch;

use crate::config::EdamamCredentials;

const PARSER_URL: &str = "https://api.edamam.com/api/food-database/v2/parser";

pub struct EdamamClient {
    client: reqwest::Client,
    credentials: Option<EdamamCredentials>,
}

impl EdamamClient {
    pub fn new(credentials: Option<EdamamCredentials>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "nibble/{} (calorie log)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            credentials,
        })
    }

    pub async fn search_async(&self, query: &str) -> Result<Vec<FoodMatch>> {
        let creds = self.credentials.as_ref().context(
            "Edamam credentials are not configured (set NIBBLE_EDAMAM_APP_ID and NIBBLE_EDAMAM_APP_KEY)",
        )?;

        tracing::debug!(%query, "querying Edamam");
        let resp = self
            .client
            .get(PARSER_URL)
            .query(&[
                ("app_id", creds.app_id.as_str()),
                ("app_key", creds.app_key.as_str()),
                ("ingr", query),
            ])
            .send()
            .await
            .context("Failed to reach Edamam API")?
            .error_for_status()
            .context("Edamam API returned an error status")?;

        let data: ParserResponse = resp
            .json()
            .await
            .context("Failed to parse Edamam response")?;

        let foods = response_to_matches(data);
        tracing::debug!(%query, hits = foods.len(), "Edamam answered");
        Ok(foods)
    }
}

impl FoodLookupProvider for EdamamClient {
    async fn search(&self, query: &str) -> Result<Vec<FoodMatch>> {
        self.search_async(query).await
    }
}
