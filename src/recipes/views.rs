use super::models::{
    AddIngredient, Recipe, RecipeCreate, RecipeIngredient, RecipeList, RecipeUpdate,
};
use super::services;
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use axum::routing::{delete, get, post, put};
use sea_orm::ConnectionTrait;
use crudcrate::{CRUDResource, crud_handlers};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

crud_handlers!(Recipe, RecipeUpdate, RecipeCreate, RecipeList);

pub fn router(state: &AppState) -> OpenApiRouter {
    let crud_router: OpenApiRouter = OpenApiRouter::new()
        .routes(routes!(get_one_handler))
        .routes(routes!(get_all_handler))
        .routes(routes!(delete_one_handler))
        .routes(routes!(delete_many_handler))
        .with_state(state.db.clone());

    let mutating_router = crud_router
        .route("/", post(create_recipe).with_state(state.clone()))
        .route("/{id}", put(update_recipe).with_state(state.clone()))
        .route("/{id}/approve", post(approve_recipe).with_state(state.clone()))
        .route("/{id}/archive", post(archive_recipe).with_state(state.clone()))
        .route(
            "/{id}/reagents",
            get(get_ingredients)
                .post(add_ingredient)
                .with_state(state.clone()),
        )
        .route(
            "/{id}/reagents/{reagent_id}",
            delete(remove_ingredient).with_state(state.clone()),
        );

    protect(mutating_router, state, Role::Employee, Recipe::RESOURCE_NAME_PLURAL)
}

#[utoipa::path(
    post,
    path = "/recipes",
    request_body = RecipeCreate,
    responses(
        (status = 201, description = "Draft recipe created", body = Recipe),
        (status = 400, description = "Empty name"),
        (status = 404, description = "Author not found")
    ),
    tag = "recipes",
    summary = "Create recipe"
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(payload): Json<RecipeCreate>,
) -> Result<(StatusCode, Json<Recipe>), BusinessError> {
    let recipe = services::create_recipe(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[utoipa::path(
    put,
    path = "/recipes/{id}",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    request_body = RecipeUpdate,
    responses(
        (status = 200, description = "Updated recipe", body = Recipe),
        (status = 400, description = "Empty name"),
        (status = 404, description = "Recipe or author not found")
    ),
    tag = "recipes",
    summary = "Update recipe"
)]
pub async fn update_recipe(
    Path(recipe_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<RecipeUpdate>,
) -> Result<Json<Recipe>, BusinessError> {
    Ok(Json(
        services::update_recipe(&state.db, recipe_id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/recipes/{id}/approve",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Approved recipe with its approval time", body = Recipe),
        (status = 400, description = "Recipe is archived"),
        (status = 404, description = "Recipe not found")
    ),
    tag = "recipes",
    summary = "Approve recipe"
)]
pub async fn approve_recipe(
    Path(recipe_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Recipe>, BusinessError> {
    Ok(Json(services::approve_recipe(&state.db, recipe_id).await?))
}

#[utoipa::path(
    post,
    path = "/recipes/{id}/archive",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Archived recipe", body = Recipe),
        (status = 404, description = "Recipe not found")
    ),
    tag = "recipes",
    summary = "Archive recipe"
)]
pub async fn archive_recipe(
    Path(recipe_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Recipe>, BusinessError> {
    Ok(Json(services::archive_recipe(&state.db, recipe_id).await?))
}

#[utoipa::path(
    get,
    path = "/recipes/{id}/reagents",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Reagent lines of the recipe", body = Vec<RecipeIngredient>)
    ),
    tag = "recipes",
    summary = "List recipe reagents"
)]
pub async fn get_ingredients(
    Path(recipe_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeIngredient>>, BusinessError> {
    services::get_recipe(&state.db, recipe_id).await?;
    Ok(Json(services::ingredients_of(&state.db, recipe_id).await?))
}

#[utoipa::path(
    post,
    path = "/recipes/{id}/reagents",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    request_body = AddIngredient,
    responses(
        (status = 201, description = "Reagent added to the recipe", body = RecipeIngredient),
        (status = 400, description = "Invalid quantity or unit"),
        (status = 404, description = "Recipe or reagent not found"),
        (status = 409, description = "Reagent already listed in the recipe")
    ),
    tag = "recipes",
    summary = "Add reagent to recipe"
)]
pub async fn add_ingredient(
    Path(recipe_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<AddIngredient>,
) -> Result<(StatusCode, Json<RecipeIngredient>), BusinessError> {
    let line = services::add_ingredient(&state.db, recipe_id, payload).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

#[utoipa::path(
    delete,
    path = "/recipes/{id}/reagents/{reagent_id}",
    params(
        ("id" = Uuid, Path, description = "Recipe ID"),
        ("reagent_id" = Uuid, Path, description = "Reagent ID")
    ),
    responses(
        (status = 204, description = "Reagent removed from the recipe"),
        (status = 404, description = "Reagent is not part of the recipe")
    ),
    tag = "recipes",
    summary = "Remove reagent from recipe"
)]
pub async fn remove_ingredient(
    Path((recipe_id, reagent_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
) -> Result<StatusCode, BusinessError> {
    services::remove_ingredient(&state.db, recipe_id, reagent_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
