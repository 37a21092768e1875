use super::models::{TaskComment, TaskCommentCreate, TaskCommentList, TaskCommentUpdate};
use super::services;
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use axum::routing::{post, put};
use sea_orm::ConnectionTrait;
use crudcrate::{CRUDResource, crud_handlers};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

crud_handlers!(TaskComment, TaskCommentUpdate, TaskCommentCreate, TaskCommentList);

pub fn router(state: &AppState) -> OpenApiRouter {
    let crud_router: OpenApiRouter = OpenApiRouter::new()
        .routes(routes!(get_one_handler))
        .routes(routes!(get_all_handler))
        .routes(routes!(delete_one_handler))
        .routes(routes!(delete_many_handler))
        .with_state(state.db.clone());

    let mutating_router = crud_router
        .route("/", post(create_comment).with_state(state.clone()))
        .route("/{id}", put(update_comment).with_state(state.clone()));

    protect(
        mutating_router,
        state,
        Role::Employee,
        TaskComment::RESOURCE_NAME_PLURAL,
    )
}

#[utoipa::path(
    post,
    path = "/task_comments",
    request_body = TaskCommentCreate,
    responses(
        (status = 201, description = "Comment added", body = TaskComment),
        (status = 400, description = "Empty text"),
        (status = 404, description = "Task or user not found")
    ),
    tag = "task_comments",
    summary = "Comment on task"
)]
pub async fn create_comment(
    State(state): State<AppState>,
    Json(payload): Json<TaskCommentCreate>,
) -> Result<(StatusCode, Json<TaskComment>), BusinessError> {
    let comment = services::create_comment(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    put,
    path = "/task_comments/{id}",
    params(("id" = Uuid, Path, description = "Comment ID")),
    request_body = TaskCommentUpdate,
    responses(
        (status = 200, description = "Edited comment", body = TaskComment),
        (status = 400, description = "Empty text"),
        (status = 404, description = "Comment not found")
    ),
    tag = "task_comments",
    summary = "Edit task comment"
)]
pub async fn update_comment(
    Path(comment_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<TaskCommentUpdate>,
) -> Result<Json<TaskComment>, BusinessError> {
    Ok(Json(
        services::update_comment(&state.db, comment_id, payload).await?,
    ))
}
