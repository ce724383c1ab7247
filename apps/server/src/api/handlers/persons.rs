//! Person record handlers

use crate::{
    models::{ListParams, NewPerson, PersonUpdate},
    state::AppState,
    Result,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Create a person (POST /api/v1/persons)
///
/// The payload carries only the name fields; age, gender and nationality are
/// filled in from the enrichment lookups before the record is stored.
pub async fn create_person(
    State(state): State<AppState>,
    Json(payload): Json<NewPerson>,
) -> Result<Response> {
    let id = state.persons.create(payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))).into_response())
}

/// Read a single person (GET /api/v1/persons/:id)
pub async fn get_person(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response> {
    let person = state.persons.get(id).await?;

    Ok((StatusCode::OK, Json(person)).into_response())
}

/// List persons with operator filters (GET /api/v1/persons)
///
/// Filterable fields take `operator:comparand` values, e.g.
/// `?name=is:Ivan&age=mt:30&limit=20`.
pub async fn list_persons(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    let persons = state.persons.list(&params).await?;

    Ok((StatusCode::OK, Json(persons)).into_response())
}

/// Merge an update into an existing person (PUT /api/v1/persons)
pub async fn update_person(
    State(state): State<AppState>,
    Json(payload): Json<PersonUpdate>,
) -> Result<Response> {
    state.persons.update(payload).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Delete a person (DELETE /api/v1/persons/:id)
pub async fn delete_person(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response> {
    state.persons.delete(id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
