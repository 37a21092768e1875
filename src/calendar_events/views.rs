use super::models::{
    CalendarEvent, CalendarEventCreate, CalendarEventList, CalendarEventUpdate, CalendarQuery,
    ParticipantList,
};
use super::services;
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use axum::routing::{get, put};
use sea_orm::ConnectionTrait;
use crudcrate::{CRUDResource, crud_handlers};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

crud_handlers!(CalendarEvent, CalendarEventUpdate, CalendarEventCreate, CalendarEventList);

pub fn router(state: &AppState) -> OpenApiRouter {
    let crud_router: OpenApiRouter = OpenApiRouter::new()
        .routes(routes!(get_one_handler))
        .routes(routes!(delete_one_handler))
        .routes(routes!(delete_many_handler))
        .with_state(state.db.clone());

    // Listing is hand-written for the calendar window filters.
    let mutating_router = crud_router
        .route(
            "/",
            get(list_events).post(create_event).with_state(state.clone()),
        )
        .route("/{id}", put(update_event).with_state(state.clone()))
        .route(
            "/{id}/participants",
            put(replace_participants).with_state(state.clone()),
        );

    protect(
        mutating_router,
        state,
        Role::Employee,
        CalendarEvent::RESOURCE_NAME_PLURAL,
    )
}

#[utoipa::path(
    get,
    path = "/calendar_events",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Events in start order", body = Vec<CalendarEventList>)
    ),
    tag = "calendar_events",
    summary = "List calendar events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Vec<CalendarEventList>>, BusinessError> {
    Ok(Json(services::list_events(&state.db, &query).await?))
}

#[utoipa::path(
    post,
    path = "/calendar_events",
    request_body = CalendarEventCreate,
    responses(
        (status = 201, description = "Event created with its participants", body = CalendarEvent),
        (status = 400, description = "Empty subject or end before start"),
        (status = 404, description = "Organizer or participant not found")
    ),
    tag = "calendar_events",
    summary = "Create calendar event"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CalendarEventCreate>,
) -> Result<(StatusCode, Json<CalendarEvent>), BusinessError> {
    let event = services::create_event(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    put,
    path = "/calendar_events/{id}",
    params(("id" = Uuid, Path, description = "Calendar event ID")),
    request_body = CalendarEventUpdate,
    responses(
        (status = 200, description = "Updated event", body = CalendarEvent),
        (status = 400, description = "Empty subject or end before start"),
        (status = 404, description = "Event or organizer not found")
    ),
    tag = "calendar_events",
    summary = "Update calendar event"
)]
pub async fn update_event(
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<CalendarEventUpdate>,
) -> Result<Json<CalendarEvent>, BusinessError> {
    Ok(Json(
        services::update_event(&state.db, event_id, payload).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/calendar_events/{id}/participants",
    params(("id" = Uuid, Path, description = "Calendar event ID")),
    request_body = ParticipantList,
    responses(
        (status = 200, description = "Event with its new participants", body = CalendarEvent),
        (status = 404, description = "Event or user not found")
    ),
    tag = "calendar_events",
    summary = "Replace participants"
)]
pub async fn replace_participants(
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<ParticipantList>,
) -> Result<Json<CalendarEvent>, BusinessError> {
    Ok(Json(
        services::set_participants(&state.db, event_id, &payload.user_ids).await?,
    ))
}
