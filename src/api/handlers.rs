//! API handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{Method, StatusCode, Uri},
    Json,
};
use serde::Deserialize;

use crate::api::{ApiError, AppState};
use crate::types::{
    parse_distance, parse_run_id, NewRun, Run, RunFilter, RunPayload, ValidationError,
};

const RUN_NOT_FOUND: &str = "Run not found.";
const RETRIEVE_RUNS_FAILED: &str = "Failed to retrieve runs.";

/// Home route
pub async fn welcome() -> &'static str {
    "Welcome to the Running Planner and Tracker API."
}

/// Smoke-test route
pub async fn good() -> &'static str {
    "The world is a better place with you in it"
}

/// Smoke-test route
pub async fn bad() -> &'static str {
    "Life is as good as you make it to be"
}

/// `GET /runs`; an empty table is `200 []`
pub async fn list_runs(State(state): State<AppState>) -> Result<Json<Vec<Run>>, ApiError> {
    let runs = state
        .store
        .list()
        .await
        .map_err(ApiError::store(RETRIEVE_RUNS_FAILED))?;

    Ok(Json(runs))
}

/// `GET /runs/:id`
pub async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Run>, ApiError> {
    let Some(id) = parse_run_id(&id) else {
        return Err(ApiError::not_found(RUN_NOT_FOUND));
    };

    state
        .store
        .get(id)
        .await
        .map_err(ApiError::store("Failed to retrieve the run."))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(RUN_NOT_FOUND))
}

/// `POST /runs`
pub async fn create_run(
    State(state): State<AppState>,
    payload: Result<Json<RunPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Run>), ApiError> {
    let run = validated(payload)?;

    let created = state
        .store
        .insert(run)
        .await
        .map_err(ApiError::store("Failed to add the run."))?;

    tracing::debug!(id = created.id, "Run created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /runs/:id`; replaces every field, absent notes become null
pub async fn update_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RunPayload>, JsonRejection>,
) -> Result<Json<Run>, ApiError> {
    let run = validated(payload)?;
    let Some(id) = parse_run_id(&id) else {
        return Err(ApiError::not_found(RUN_NOT_FOUND));
    };

    state
        .store
        .update(id, run)
        .await
        .map_err(ApiError::store("Failed to update the run."))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(RUN_NOT_FOUND))
}

/// `DELETE /runs/:id`
pub async fn delete_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let Some(id) = parse_run_id(&id) else {
        return Err(ApiError::not_found(RUN_NOT_FOUND));
    };

    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(ApiError::store("Failed to delete the run."))?;

    if deleted {
        tracing::debug!(id, "Run deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(RUN_NOT_FOUND))
    }
}

/// `GET /runs/date/:date`
pub async fn runs_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Run>>, ApiError> {
    filtered(&state, RunFilter::Date(date)).await
}

/// `GET /runs/distance/greater/:distance`
pub async fn runs_distance_greater(
    State(state): State<AppState>,
    Path(distance): Path<String>,
) -> Result<Json<Vec<Run>>, ApiError> {
    filtered(&state, RunFilter::DistanceGreater(parse_distance(&distance))).await
}

/// `GET /runs/distance/lesser/:distance`
pub async fn runs_distance_lesser(
    State(state): State<AppState>,
    Path(distance): Path<String>,
) -> Result<Json<Vec<Run>>, ApiError> {
    filtered(&state, RunFilter::DistanceLesser(parse_distance(&distance))).await
}

/// `GET /runs/pace/faster/:pace`
///
/// Pace is compared as text, so `"9:00"` sorts before `"06:30"`.
pub async fn runs_pace_faster(
    State(state): State<AppState>,
    Path(pace): Path<String>,
) -> Result<Json<Vec<Run>>, ApiError> {
    filtered(&state, RunFilter::PaceFaster(pace)).await
}

/// `GET /runs/pace/slower/:pace`
pub async fn runs_pace_slower(
    State(state): State<AppState>,
    Path(pace): Path<String>,
) -> Result<Json<Vec<Run>>, ApiError> {
    filtered(&state, RunFilter::PaceSlower(pace)).await
}

/// `GET /runs/notes/:keyword`
pub async fn runs_by_notes(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<Run>>, ApiError> {
    filtered(&state, RunFilter::NotesContain(keyword)).await
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: Option<String>,
}

/// `GET /runs/filter?type=<date|distance|pace|notes>&value=..`
pub async fn filter_runs(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<Run>>, ApiError> {
    let filter = query
        .kind
        .zip(query.value)
        .and_then(|(kind, value)| RunFilter::from_query(&kind, &value))
        .ok_or_else(|| ApiError::BadRequest("Filter type and value are required.".to_string()))?;

    filtered(&state, filter).await
}

/// `GET /test`: dumps every row to the log and the response
pub async fn test_dump(State(state): State<AppState>) -> Result<Json<Vec<Run>>, ApiError> {
    let runs = state
        .store
        .list()
        .await
        .map_err(ApiError::store("Database test query failed."))?;

    tracing::info!(rows = ?runs, "Test query result");
    Ok(Json(runs))
}

/// Fallback for unknown paths and unsupported methods
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    tracing::debug!(%method, path = uri.path(), "No route matched");
    ApiError::not_found(format!("Cannot {} {}", method, uri.path()))
}

async fn filtered(state: &AppState, filter: RunFilter) -> Result<Json<Vec<Run>>, ApiError> {
    let runs = state
        .store
        .filter(&filter)
        .await
        .map_err(ApiError::store(RETRIEVE_RUNS_FAILED))?;

    if runs.is_empty() {
        return Err(ApiError::not_found(filter.not_found_message()));
    }

    Ok(Json(runs))
}

/// Any body that does not deserialize is treated like one missing fields
fn validated(payload: Result<Json<RunPayload>, JsonRejection>) -> Result<NewRun, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected run payload");
        ApiError::from(ValidationError)
    })?;

    Ok(payload.validate()?)
}
