use super::models::{Culture, CultureCreate, CultureList, CultureUpdate};
use super::services;
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use crate::culture_events::models::CultureEventList;
use crate::culture_events::services::events_for_culture;
use axum::routing::{get, post, put};
use sea_orm::ConnectionTrait;
use crudcrate::{CRUDResource, crud_handlers};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

crud_handlers!(Culture, CultureUpdate, CultureCreate, CultureList);

pub fn router(state: &AppState) -> OpenApiRouter {
    let crud_router: OpenApiRouter = OpenApiRouter::new()
        .routes(routes!(get_one_handler))
        .routes(routes!(get_all_handler))
        .routes(routes!(delete_one_handler))
        .routes(routes!(delete_many_handler))
        .with_state(state.db.clone());

    let mutating_router = crud_router
        .route("/", post(create_culture).with_state(state.clone()))
        .route("/{id}", put(update_culture).with_state(state.clone()))
        .route(
            "/{id}/events",
            get(get_culture_events).with_state(state.clone()),
        );

    protect(mutating_router, state, Role::Employee, Culture::RESOURCE_NAME_PLURAL)
}

#[utoipa::path(
    post,
    path = "/cultures",
    request_body = CultureCreate,
    responses(
        (status = 201, description = "Culture created", body = Culture),
        (status = 400, description = "Empty name or negative passage number"),
        (status = 404, description = "Recipe or responsible user not found")
    ),
    tag = "cultures",
    summary = "Create culture"
)]
pub async fn create_culture(
    State(state): State<AppState>,
    Json(payload): Json<CultureCreate>,
) -> Result<(StatusCode, Json<Culture>), BusinessError> {
    let culture = services::create_culture(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(culture)))
}

#[utoipa::path(
    put,
    path = "/cultures/{id}",
    params(("id" = Uuid, Path, description = "Culture ID")),
    request_body = CultureUpdate,
    responses(
        (status = 200, description = "Updated culture", body = Culture),
        (status = 400, description = "Empty name or negative passage number"),
        (status = 404, description = "Culture, recipe or user not found")
    ),
    tag = "cultures",
    summary = "Update culture"
)]
pub async fn update_culture(
    Path(culture_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<CultureUpdate>,
) -> Result<Json<Culture>, BusinessError> {
    Ok(Json(
        services::update_culture(&state.db, culture_id, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/cultures/{id}/events",
    params(("id" = Uuid, Path, description = "Culture ID")),
    responses(
        (status = 200, description = "Events of the culture, newest first", body = Vec<CultureEventList>),
        (status = 404, description = "Culture not found")
    ),
    tag = "cultures",
    summary = "List culture events"
)]
pub async fn get_culture_events(
    Path(culture_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CultureEventList>>, BusinessError> {
    Ok(Json(events_for_culture(&state.db, culture_id).await?))
}
