use std::sync::Arc;

use serde_json::json;

use shared_config::{AppConfig, SlotBoundaryPolicy};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub default_horizon_days: u32,
    pub max_horizon_days: u32,
    pub slot_boundary_policy: SlotBoundaryPolicy,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            default_horizon_days: 14,
            max_horizon_days: 90,
            slot_boundary_policy: SlotBoundaryPolicy::AllowOverrun,
        }
    }
}

impl TestConfig {
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn policy(mut self, policy: SlotBoundaryPolicy) -> Self {
        self.slot_boundary_policy = policy;
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            default_horizon_days: self.default_horizon_days,
            max_horizon_days: self.max_horizon_days,
            slot_boundary_policy: self.slot_boundary_policy,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn availability_rule_response(
        id: i64,
        provider_id: i64,
        weekday: i32,
        start_time: &str,
        end_time: &str,
        slot_duration_minutes: i32,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "provider_id": provider_id,
            "weekday": weekday,
            "start_time": start_time,
            "end_time": end_time,
            "slot_duration_minutes": slot_duration_minutes
        })
    }

    pub fn provider_response(id: i64, first_name: &str, last_name: &str, specialty: &str) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name,
            "specialty": specialty
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
