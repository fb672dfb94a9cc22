use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::IsoWeekday;

use crate::error::SlotError;
use crate::models::{ProviderId, ReplaceRulesRequest, SlotsQuery, WeekdayInfo};
use crate::services::availability::AvailabilityService;

type BearerHeader = TypedHeader<Authorization<Bearer>>;

fn availability_service(state: &AppConfig) -> Result<AvailabilityService, AppError> {
    if !state.is_configured() {
        return Err(AppError::Internal("Persistence service is not configured".to_string()));
    }
    Ok(AvailabilityService::new(state))
}

fn bearer_token(auth: &Option<BearerHeader>) -> Option<&str> {
    auth.as_ref().map(|TypedHeader(header)| header.token())
}

/// Validation failures become 400s; anything else came from persistence.
fn map_service_error(err: anyhow::Error) -> AppError {
    match err.downcast_ref::<SlotError>() {
        Some(slot_err) => AppError::from(slot_err.clone()),
        None => AppError::ExternalService(err.to_string()),
    }
}

#[axum::debug_handler]
pub async fn get_provider_availability(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<ProviderId>,
    auth: Option<BearerHeader>,
) -> Result<Json<Value>, AppError> {
    let service = availability_service(&state)?;

    let rules = service
        .get_provider_rules(provider_id, bearer_token(&auth))
        .await
        .map_err(map_service_error)?;

    Ok(Json(json!({
        "provider_id": provider_id,
        "total": rules.len(),
        "rules": rules
    })))
}

#[axum::debug_handler]
pub async fn replace_provider_availability(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<ProviderId>,
    auth: Option<BearerHeader>,
    Json(request): Json<ReplaceRulesRequest>,
) -> Result<Json<Value>, AppError> {
    let service = availability_service(&state)?;

    let rules = service
        .replace_provider_rules(provider_id, request.rules, bearer_token(&auth))
        .await
        .map_err(map_service_error)?;

    Ok(Json(json!({
        "provider_id": provider_id,
        "total": rules.len(),
        "rules": rules
    })))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<ProviderId>,
    Query(query): Query<SlotsQuery>,
    auth: Option<BearerHeader>,
) -> Result<Json<Value>, AppError> {
    let service = availability_service(&state)?;

    let response = service
        .get_available_slots(provider_id, query.horizon_days, bearer_token(&auth))
        .await
        .map_err(map_service_error)?;

    Ok(Json(json!(response)))
}

pub async fn list_weekdays() -> Json<Value> {
    let days: Vec<WeekdayInfo> = IsoWeekday::ALL.into_iter().map(WeekdayInfo::from).collect();
    Json(json!({ "weekdays": days }))
}
