use super::models::{CreateMovement, Model as ReagentMovement, RecordedMovement};
use super::services::{self, MovementRequest};
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .route(
            "/",
            get(list_movements)
                .post(create_movement)
                .with_state(state.clone()),
        )
        .route("/{id}", get(get_movement).with_state(state.clone()));

    protect(router, state, Role::Employee, "reagent_movements")
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MovementFilter {
    /// Restrict the listing to one reagent
    pub reagent_id: Option<Uuid>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/reagent_movements",
    params(MovementFilter),
    responses(
        (status = 200, description = "Movements, newest first", body = Vec<ReagentMovement>),
        (status = 500, description = "Internal server error")
    ),
    tag = "reagent_movements",
    summary = "List movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementFilter>,
) -> Result<Json<Vec<ReagentMovement>>, BusinessError> {
    let page = crate::common::models::PageParams {
        limit: filter.limit,
        offset: filter.offset,
    };
    let movements =
        services::list_movements(&state.db, filter.reagent_id, page.limit(), page.offset())
            .await?;
    Ok(Json(movements))
}

#[utoipa::path(
    get,
    path = "/reagent_movements/{id}",
    params(("id" = Uuid, Path, description = "Movement ID")),
    responses(
        (status = 200, description = "The movement", body = ReagentMovement),
        (status = 404, description = "Movement not found")
    ),
    tag = "reagent_movements",
    summary = "Get one movement"
)]
pub async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReagentMovement>, BusinessError> {
    Ok(Json(services::get_movement(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/reagent_movements",
    request_body = CreateMovement,
    responses(
        (status = 201, description = "Movement recorded and stock adjusted", body = RecordedMovement),
        (status = 400, description = "Invalid quantity or movement type"),
        (status = 404, description = "Unknown reagent or user"),
        (status = 409, description = "Reagent changed concurrently; safe to retry")
    ),
    tag = "reagent_movements",
    summary = "Record a movement",
    description = "Books an incoming or outgoing quantity against a reagent. The movement row and the stock change are committed together or not at all."
)]
pub async fn create_movement(
    State(state): State<AppState>,
    Json(payload): Json<CreateMovement>,
) -> Result<(StatusCode, Json<RecordedMovement>), BusinessError> {
    let request = MovementRequest::try_from(payload)?;
    let recorded = services::record_movement(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}
