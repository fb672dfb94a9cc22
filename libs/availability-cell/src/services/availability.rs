use anyhow::{anyhow, Result};
use chrono::{Days, NaiveDate, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Method,
};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::SlotError;
use crate::models::{AvailabilityRule, AvailableSlotsResponse, ProviderId, ProviderProfile};
use crate::services::slots::{check_overlaps, validate_rules, SlotGenerator};

const RULES_TABLE: &str = "/rest/v1/availability_rules";
const PROVIDERS_TABLE: &str = "/rest/v1/providers";

pub struct AvailabilityService {
    supabase: SupabaseClient,
    generator: SlotGenerator,
    default_horizon_days: u32,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            generator: SlotGenerator::from_config(config),
            default_horizon_days: config.default_horizon_days,
        }
    }

    /// Get a provider's weekly availability rules
    #[instrument(skip(self, auth_token))]
    pub async fn get_provider_rules(
        &self,
        provider_id: ProviderId,
        auth_token: Option<&str>,
    ) -> Result<Vec<AvailabilityRule>> {
        debug!("Fetching availability rules for provider: {}", provider_id);

        let path = format!(
            "{}?provider_id=eq.{}&order=weekday.asc,start_time.asc",
            RULES_TABLE, provider_id
        );
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, auth_token, None).await?;

        let rules = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<AvailabilityRule>, _>>()?;

        debug!("Provider {} has {} availability rules", provider_id, rules.len());
        Ok(rules)
    }

    /// Replace the provider's whole rule set with `rules`.
    ///
    /// Rules are validated before anything is written: every time must be
    /// `HH:mm`, every window non-empty, every duration positive, and no two
    /// rules on the same weekday may overlap.
    ///
    /// The new set is inserted before the old one is removed, so a failed
    /// insert leaves the previous schedule untouched. A failed cleanup leaves
    /// both sets stored until the next successful replace.
    #[instrument(skip(self, rules, auth_token), fields(rule_count = rules.len()))]
    pub async fn replace_provider_rules(
        &self,
        provider_id: ProviderId,
        mut rules: Vec<AvailabilityRule>,
        auth_token: Option<&str>,
    ) -> Result<Vec<AvailabilityRule>> {
        debug!("Replacing availability rules for provider: {}", provider_id);

        for rule in rules.iter_mut() {
            rule.provider_id = provider_id;
            rule.id = None;
        }

        let windows = validate_rules(&rules)?;
        check_overlaps(&windows)?;

        if rules.is_empty() {
            let delete_path = format!("{}?provider_id=eq.{}", RULES_TABLE, provider_id);
            self.supabase.execute(Method::DELETE, &delete_path, auth_token, None).await?;
            info!("Cleared all availability rules for provider {}", provider_id);
            return Ok(Vec::new());
        }

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::POST, RULES_TABLE, auth_token, Some(json!(rules)), Some(headers))
            .await?;

        if result.len() != rules.len() {
            return Err(anyhow!(
                "Persistence stored {} of {} availability rules",
                result.len(),
                rules.len()
            ));
        }

        let stored = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<AvailabilityRule>, _>>()?;

        let new_ids = stored
            .iter()
            .map(|rule| rule.id.map(|id| id.to_string()))
            .collect::<Option<Vec<String>>>()
            .ok_or_else(|| anyhow!("Persistence returned availability rules without ids"))?;

        let stale_path = format!(
            "{}?provider_id=eq.{}&id=not.in.({})",
            RULES_TABLE,
            provider_id,
            new_ids.join(",")
        );
        if let Err(e) = self.supabase.execute(Method::DELETE, &stale_path, auth_token, None).await {
            warn!(
                "Stored new availability rules for provider {} but failed to remove the old ones: {}",
                provider_id, e
            );
            return Err(e);
        }

        info!("Stored {} availability rules for provider {}", stored.len(), provider_id);
        Ok(stored)
    }

    /// Look up the provider's display details. A missing provider is not an
    /// error; slot listings are simply left unlabelled.
    pub async fn get_provider_profile(
        &self,
        provider_id: ProviderId,
        auth_token: Option<&str>,
    ) -> Result<Option<ProviderProfile>> {
        let path = format!("{}?id=eq.{}", PROVIDERS_TABLE, provider_id);
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, auth_token, None).await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => {
                warn!("Provider not found: {}", provider_id);
                Ok(None)
            }
        }
    }

    /// Bookable slots for the provider over the next `horizon_days` days
    /// (the configured default when `None`).
    pub async fn get_available_slots(
        &self,
        provider_id: ProviderId,
        horizon_days: Option<u32>,
        auth_token: Option<&str>,
    ) -> Result<AvailableSlotsResponse> {
        let today = Utc::now().date_naive();
        self.get_available_slots_from(provider_id, horizon_days, today, auth_token).await
    }

    #[instrument(skip(self, auth_token))]
    pub async fn get_available_slots_from(
        &self,
        provider_id: ProviderId,
        horizon_days: Option<u32>,
        today: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<AvailableSlotsResponse> {
        let horizon_days = self
            .generator
            .check_horizon(horizon_days.unwrap_or(self.default_horizon_days))?;
        let (from_date, to_date) = match (
            today.checked_add_days(Days::new(1)),
            today.checked_add_days(Days::new(horizon_days as u64)),
        ) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                return Err(SlotError::HorizonTooLong {
                    requested: horizon_days,
                    max: self.generator.max_horizon_days().unwrap_or(horizon_days),
                }
                .into())
            }
        };

        let rules = self.get_provider_rules(provider_id, auth_token).await?;
        let slots = self.generator.generate(&rules, horizon_days, today)?;

        let profile = self.get_provider_profile(provider_id, auth_token).await?;

        debug!(
            "Provider {} has {} slots over the next {} days",
            provider_id,
            slots.len(),
            horizon_days
        );

        Ok(AvailableSlotsResponse {
            provider_id,
            provider_name: profile.as_ref().map(ProviderProfile::display_name),
            specialty: profile.and_then(|p| p.specialty),
            horizon_days,
            boundary_policy: self.generator.policy(),
            from_date,
            to_date,
            total: slots.len(),
            slots,
        })
    }
}
