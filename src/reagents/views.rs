use super::models::{Reagent, ReagentCreate, ReagentList, ReagentUpdate};
use super::services;
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use crate::reagent_movements::models::Model as ReagentMovement;
use crate::reagent_movements::services::movements_for_reagent;
use axum::routing::{get, post, put};
use sea_orm::ConnectionTrait;
use crudcrate::{CRUDResource, crud_handlers};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

crud_handlers!(Reagent, ReagentUpdate, ReagentCreate, ReagentList);

pub fn router(state: &AppState) -> OpenApiRouter {
    let crud_router: OpenApiRouter = OpenApiRouter::new()
        .routes(routes!(get_one_handler))
        .routes(routes!(get_all_handler))
        .routes(routes!(delete_one_handler))
        .routes(routes!(delete_many_handler))
        .with_state(state.db.clone());

    // Writes go through the services so validation failures come back as 400.
    // Static segments take precedence over `/{id}`.
    let mutating_router = crud_router
        .route("/", post(create_reagent).with_state(state.clone()))
        .route("/{id}", put(update_reagent).with_state(state.clone()))
        .route(
            "/critical",
            get(get_critical_reagents).with_state(state.clone()),
        )
        .route(
            "/expiring",
            get(get_expiring_reagents).with_state(state.clone()),
        )
        .route("/active", get(get_active_reagents).with_state(state.clone()))
        .route(
            "/{id}/movements",
            get(get_reagent_movements).with_state(state.clone()),
        );

    protect(mutating_router, state, Role::Employee, Reagent::RESOURCE_NAME_PLURAL)
}

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

#[utoipa::path(
    post,
    path = "/reagents",
    request_body = ReagentCreate,
    responses(
        (status = 201, description = "Reagent created; a positive on_hand is booked as an opening movement", body = Reagent),
        (status = 400, description = "Invalid name, stock or threshold"),
        (status = 409, description = "Duplicate reagent")
    ),
    tag = "reagents",
    summary = "Create reagent"
)]
pub async fn create_reagent(
    State(state): State<AppState>,
    Json(payload): Json<ReagentCreate>,
) -> Result<(StatusCode, Json<Reagent>), BusinessError> {
    let reagent = services::create_reagent(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(reagent)))
}

#[utoipa::path(
    put,
    path = "/reagents/{id}",
    params(("id" = Uuid, Path, description = "Reagent ID")),
    request_body = ReagentUpdate,
    responses(
        (status = 200, description = "Updated reagent", body = Reagent),
        (status = 400, description = "Invalid name or threshold"),
        (status = 404, description = "Reagent not found")
    ),
    tag = "reagents",
    summary = "Update reagent"
)]
pub async fn update_reagent(
    Path(reagent_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<ReagentUpdate>,
) -> Result<Json<Reagent>, BusinessError> {
    Ok(Json(
        services::update_reagent(&state.db, reagent_id, payload).await?,
    ))
}

/// Reagents whose stock is at or below their minimum threshold
#[utoipa::path(
    get,
    path = "/reagents/critical",
    responses(
        (status = 200, description = "Critical reagents, lowest stock first", body = Vec<ReagentList>),
        (status = 500, description = "Internal server error")
    ),
    tag = "reagents",
    summary = "List critical reagents"
)]
pub async fn get_critical_reagents(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReagentList>>, BusinessError> {
    Ok(Json(
        services::critical_reagents(&state.db, today(), None).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/reagents/expiring",
    responses(
        (status = 200, description = "Reagents expiring within 30 days, soonest first", body = Vec<ReagentList>),
        (status = 500, description = "Internal server error")
    ),
    tag = "reagents",
    summary = "List expiring reagents"
)]
pub async fn get_expiring_reagents(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReagentList>>, BusinessError> {
    Ok(Json(
        services::expiring_reagents(&state.db, today(), None).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/reagents/active",
    responses(
        (status = 200, description = "Reagents in stock, by name", body = Vec<ReagentList>)
    ),
    tag = "reagents",
    summary = "List reagents in stock"
)]
pub async fn get_active_reagents(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReagentList>>, BusinessError> {
    Ok(Json(services::active_reagents(&state.db, today()).await?))
}

/// Movement history of one reagent, newest first
#[utoipa::path(
    get,
    path = "/reagents/{id}/movements",
    params(
        ("id" = Uuid, Path, description = "Reagent ID")
    ),
    responses(
        (status = 200, description = "Movements of this reagent", body = Vec<ReagentMovement>),
        (status = 404, description = "Reagent not found")
    ),
    tag = "reagents",
    summary = "Get reagent movements"
)]
pub async fn get_reagent_movements(
    Path(reagent_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReagentMovement>>, BusinessError> {
    Ok(Json(movements_for_reagent(&state.db, reagent_id).await?))
}
