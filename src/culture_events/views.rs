use super::models::{CultureEvent, CultureEventCreate, CultureEventList, CultureEventUpdate};
use super::services;
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use axum::routing::{post, put};
use sea_orm::ConnectionTrait;
use crudcrate::{CRUDResource, crud_handlers};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

crud_handlers!(CultureEvent, CultureEventUpdate, CultureEventCreate, CultureEventList);

pub fn router(state: &AppState) -> OpenApiRouter {
    let crud_router: OpenApiRouter = OpenApiRouter::new()
        .routes(routes!(get_one_handler))
        .routes(routes!(get_all_handler))
        .routes(routes!(delete_one_handler))
        .routes(routes!(delete_many_handler))
        .with_state(state.db.clone());

    let mutating_router = crud_router
        .route("/", post(create_event).with_state(state.clone()))
        .route("/{id}", put(update_event).with_state(state.clone()));

    protect(
        mutating_router,
        state,
        Role::Employee,
        CultureEvent::RESOURCE_NAME_PLURAL,
    )
}

#[utoipa::path(
    post,
    path = "/culture_events",
    request_body = CultureEventCreate,
    responses(
        (status = 201, description = "Event logged", body = CultureEvent),
        (status = 404, description = "Culture or user not found")
    ),
    tag = "culture_events",
    summary = "Log culture event"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CultureEventCreate>,
) -> Result<(StatusCode, Json<CultureEvent>), BusinessError> {
    let event = services::create_event(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    put,
    path = "/culture_events/{id}",
    params(("id" = Uuid, Path, description = "Culture event ID")),
    request_body = CultureEventUpdate,
    responses(
        (status = 200, description = "Updated event", body = CultureEvent),
        (status = 400, description = "Required field set to null"),
        (status = 404, description = "Event not found")
    ),
    tag = "culture_events",
    summary = "Update culture event"
)]
pub async fn update_event(
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<CultureEventUpdate>,
) -> Result<Json<CultureEvent>, BusinessError> {
    Ok(Json(
        services::update_event(&state.db, event_id, payload).await?,
    ))
}
