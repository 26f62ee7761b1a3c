use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Actor, SlotKey, TravelDetails, TravelId};
use super::engine::{AllocationEngine, RosterError};
use super::repository::RosterStore;

/// Router builder exposing the allocation engine as JSON endpoints.
pub fn roster_router<S>(engine: Arc<AllocationEngine<S>>) -> Router
where
    S: RosterStore + 'static,
{
    Router::new()
        .route("/api/v1/roster/slots", get(list_slots_handler::<S>))
        .route(
            "/api/v1/roster/slots/register",
            post(register_slot_handler::<S>),
        )
        .route(
            "/api/v1/roster/slots/unregister",
            post(unregister_slot_handler::<S>),
        )
        .route(
            "/api/v1/roster/travels",
            get(list_travels_handler::<S>).post(create_travel_handler::<S>),
        )
        .route(
            "/api/v1/roster/travels/:travel_id",
            put(update_travel_handler::<S>).delete(delete_travel_handler::<S>),
        )
        .route(
            "/api/v1/roster/travels/:travel_id/volunteer",
            post(volunteer_handler::<S>),
        )
        .route(
            "/api/v1/roster/travels/:travel_id/ranking",
            get(ranking_handler::<S>),
        )
        .route(
            "/api/v1/roster/travels/:travel_id/lock",
            post(lock_handler::<S>),
        )
        .route(
            "/api/v1/roster/travels/:travel_id/archive",
            post(archive_handler::<S>),
        )
        .route(
            "/api/v1/roster/settings/slot-limit",
            get(slot_limit_handler::<S>).put(set_slot_limit_handler::<S>),
        )
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
struct SlotToggleRequest {
    actor: Actor,
    slot: SlotKey,
}

#[derive(Debug, Deserialize)]
struct CreateTravelRequest {
    actor: Actor,
    #[serde(flatten)]
    details: TravelDetails,
}

#[derive(Debug, Deserialize)]
struct UpdateTravelRequest {
    actor: Actor,
    #[serde(flatten)]
    details: TravelDetails,
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct ActorRequest {
    actor: Actor,
}

#[derive(Debug, Deserialize)]
struct LockRequest {
    actor: Actor,
    locked: bool,
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct ArchiveRequest {
    actor: Actor,
    archived: bool,
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct SlotLimitRequest {
    actor: Actor,
    value: i64,
}

fn today_or_now(supplied: Option<NaiveDate>) -> NaiveDate {
    supplied.unwrap_or_else(|| Local::now().date_naive())
}

fn error_response(err: RosterError) -> Response {
    let status = match &err {
        RosterError::Denied(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RosterError::Validation(_) => StatusCode::BAD_REQUEST,
        RosterError::NotFound => StatusCode::NOT_FOUND,
        RosterError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

async fn list_slots_handler<S>(State(engine): State<Arc<AllocationEngine<S>>>) -> Response
where
    S: RosterStore + 'static,
{
    match engine.grouped_slots() {
        Ok(days) => (StatusCode::OK, Json(days)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn register_slot_handler<S>(
    State(engine): State<Arc<AllocationEngine<S>>>,
    Json(request): Json<SlotToggleRequest>,
) -> Response
where
    S: RosterStore + 'static,
{
    match engine.register_slot(&request.actor, &request.slot) {
        Ok(slot) => (StatusCode::OK, Json(slot)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn unregister_slot_handler<S>(
    State(engine): State<Arc<AllocationEngine<S>>>,
    Json(request): Json<SlotToggleRequest>,
) -> Response
where
    S: RosterStore + 'static,
{
    match engine.unregister_slot(&request.actor, &request.slot) {
        Ok(slot) => (StatusCode::OK, Json(slot)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn list_travels_handler<S>(State(engine): State<Arc<AllocationEngine<S>>>) -> Response
where
    S: RosterStore + 'static,
{
    match engine.travel_views(today_or_now(None)) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn create_travel_handler<S>(
    State(engine): State<Arc<AllocationEngine<S>>>,
    Json(request): Json<CreateTravelRequest>,
) -> Response
where
    S: RosterStore + 'static,
{
    match engine.create_travel(&request.actor, request.details) {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_travel_handler<S>(
    State(engine): State<Arc<AllocationEngine<S>>>,
    Path(travel_id): Path<String>,
    Json(request): Json<UpdateTravelRequest>,
) -> Response
where
    S: RosterStore + 'static,
{
    let id = TravelId(travel_id);
    let today = today_or_now(request.today);
    match engine.update_travel(&request.actor, &id, request.details, today) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_travel_handler<S>(
    State(engine): State<Arc<AllocationEngine<S>>>,
    Path(travel_id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> Response
where
    S: RosterStore + 'static,
{
    let id = TravelId(travel_id);
    match engine.delete_travel(&request.actor, &id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn volunteer_handler<S>(
    State(engine): State<Arc<AllocationEngine<S>>>,
    Path(travel_id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> Response
where
    S: RosterStore + 'static,
{
    let id = TravelId(travel_id);
    match engine.toggle_travel_volunteer(&request.actor, &id) {
        Ok(outcome) => (StatusCode::OK, Json(json!({ "outcome": outcome }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// Full fairness ordering for one travel, never narrowed by the lock flag.
async fn ranking_handler<S>(
    State(engine): State<Arc<AllocationEngine<S>>>,
    Path(travel_id): Path<String>,
) -> Response
where
    S: RosterStore + 'static,
{
    let id = TravelId(travel_id);
    match engine.ranked_volunteers(&id, today_or_now(None)) {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn lock_handler<S>(
    State(engine): State<Arc<AllocationEngine<S>>>,
    Path(travel_id): Path<String>,
    Json(request): Json<LockRequest>,
) -> Response
where
    S: RosterStore + 'static,
{
    let id = TravelId(travel_id);
    let today = today_or_now(request.today);
    match engine.set_locked(&request.actor, &id, request.locked, today) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn archive_handler<S>(
    State(engine): State<Arc<AllocationEngine<S>>>,
    Path(travel_id): Path<String>,
    Json(request): Json<ArchiveRequest>,
) -> Response
where
    S: RosterStore + 'static,
{
    let id = TravelId(travel_id);
    let today = today_or_now(request.today);
    match engine.set_archived(&request.actor, &id, request.archived, today) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn slot_limit_handler<S>(State(engine): State<Arc<AllocationEngine<S>>>) -> Response
where
    S: RosterStore + 'static,
{
    match engine.slot_limit() {
        Ok(value) => (StatusCode::OK, Json(json!({ "value": value }))).into_response(),
        Err(err) => error_response(err),
    }
}

async fn set_slot_limit_handler<S>(
    State(engine): State<Arc<AllocationEngine<S>>>,
    Json(request): Json<SlotLimitRequest>,
) -> Response
where
    S: RosterStore + 'static,
{
    match engine.set_slot_limit(&request.actor, request.value) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
