//! `/api/features` handlers.
//!
//! Structural checks (id syntax, body shape, query decoding) happen here,
//! before the store is touched. Semantic checks live in the core service.

use crate::error::{
    ApiError, Operation, INVALID_BODY_MESSAGE, INVALID_ID_MESSAGE, INVALID_QUERY_MESSAGE,
};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use featureboard_core::{
    validate_list_filters, CreateFeatureInput, Feature, FeatureId, FeatureStats,
    UpdateFeatureInput,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub(crate) fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_features).post(create_feature))
        .route("/stats", get(feature_stats))
        .route(
            "/{id}",
            get(get_feature).put(update_feature).delete(delete_feature),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    status: Option<String>,
    module: Option<String>,
}

async fn list_features(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Feature>>, ApiError> {
    let Query(params) =
        params.map_err(|_| ApiError::BadRequest(INVALID_QUERY_MESSAGE.into()))?;
    let query = validate_list_filters(params.status.as_deref(), params.module.as_deref())?;

    let features = state
        .run(Operation::List, move |service| service.list(&query))
        .await?;
    Ok(Json(features))
}

async fn feature_stats(State(state): State<AppState>) -> Result<Json<FeatureStats>, ApiError> {
    let stats = state
        .run(Operation::Stats, |service| service.stats())
        .await?;
    Ok(Json(stats))
}

async fn get_feature(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Feature>, ApiError> {
    let id = feature_id(id)?;
    let feature = state
        .run(Operation::Get, move |service| service.get(id))
        .await?;
    Ok(Json(feature))
}

async fn create_feature(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Feature>), ApiError> {
    let input: CreateFeatureInput = parse_body(&body)?;
    let feature = state
        .run(Operation::Create, move |service| service.create(input))
        .await?;
    Ok((StatusCode::CREATED, Json(feature)))
}

async fn update_feature(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<Feature>, ApiError> {
    let id = feature_id(id)?;
    let input: UpdateFeatureInput = parse_body(&body)?;
    let feature = state
        .run(Operation::Update, move |service| service.update(id, input))
        .await?;
    Ok(Json(feature))
}

async fn delete_feature(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = feature_id(id)?;
    state
        .run(Operation::Delete, move |service| service.delete(id))
        .await?;
    Ok(Json(serde_json::json!({
        "message": "Feature deleted successfully",
    })))
}

fn feature_id(raw: Result<Path<String>, PathRejection>) -> Result<FeatureId, ApiError> {
    raw.ok()
        .and_then(|Path(raw)| parse_feature_id(&raw))
        .ok_or_else(|| ApiError::BadRequest(INVALID_ID_MESSAGE.into()))
}

/// Parses a path id: optional leading `-`, then ASCII digits only.
fn parse_feature_id(raw: &str) -> Option<FeatureId> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::BadRequest(INVALID_BODY_MESSAGE.into()))
}
