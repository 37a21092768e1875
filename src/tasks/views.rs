use super::models::{Task, TaskCreate, TaskList, TaskUpdate};
use super::services;
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use crate::task_comments::models::TaskCommentList;
use crate::task_comments::services::comments_for_task;
use axum::routing::{get, post, put};
use sea_orm::ConnectionTrait;
use crudcrate::{CRUDResource, crud_handlers};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

crud_handlers!(Task, TaskUpdate, TaskCreate, TaskList);

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusChange {
    #[schema(example = "in_progress")]
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkComplete {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkCompleteResult {
    pub updated: u64,
}

pub fn router(state: &AppState) -> OpenApiRouter {
    let crud_router: OpenApiRouter = OpenApiRouter::new()
        .routes(routes!(get_one_handler))
        .routes(routes!(get_all_handler))
        .routes(routes!(delete_one_handler))
        .routes(routes!(delete_many_handler))
        .with_state(state.db.clone());

    let mutating_router = crud_router
        .route("/", post(create_task).with_state(state.clone()))
        .route("/{id}", put(update_task).with_state(state.clone()))
        .route("/overdue", get(get_overdue_tasks).with_state(state.clone()))
        .route("/complete", post(complete_tasks).with_state(state.clone()))
        .route(
            "/{id}/status",
            post(change_task_status).with_state(state.clone()),
        )
        .route(
            "/{id}/comments",
            get(get_task_comments).with_state(state.clone()),
        );

    protect(mutating_router, state, Role::Employee, Task::RESOURCE_NAME_PLURAL)
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = TaskCreate,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Empty title")
    ),
    tag = "tasks",
    summary = "Create task"
)]
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskCreate>,
) -> Result<(StatusCode, Json<Task>), BusinessError> {
    let task = services::create_task(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = TaskUpdate,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 400, description = "Empty title"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    summary = "Update task"
)]
pub async fn update_task(
    Path(task_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<TaskUpdate>,
) -> Result<Json<Task>, BusinessError> {
    Ok(Json(
        services::update_task(&state.db, task_id, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/tasks/overdue",
    responses(
        (status = 200, description = "Overdue tasks, earliest deadline first", body = Vec<TaskList>)
    ),
    tag = "tasks",
    summary = "List overdue tasks"
)]
pub async fn get_overdue_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskList>>, BusinessError> {
    Ok(Json(
        services::overdue_tasks(&state.db, chrono::Utc::now(), None).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/tasks/{id}/status",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = StatusChange,
    responses(
        (status = 200, description = "Task with its new status", body = Task),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    summary = "Change task status"
)]
pub async fn change_task_status(
    Path(task_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(change): Json<StatusChange>,
) -> Result<Json<Task>, BusinessError> {
    Ok(Json(
        services::set_status(&state.db, task_id, &change.status).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/tasks/complete",
    request_body = BulkComplete,
    responses(
        (status = 200, description = "Number of tasks marked done", body = BulkCompleteResult)
    ),
    tag = "tasks",
    summary = "Complete several tasks"
)]
pub async fn complete_tasks(
    State(state): State<AppState>,
    Json(request): Json<BulkComplete>,
) -> Result<Json<BulkCompleteResult>, BusinessError> {
    let updated = services::complete_tasks(&state.db, &request.ids).await?;
    Ok(Json(BulkCompleteResult { updated }))
}

#[utoipa::path(
    get,
    path = "/tasks/{id}/comments",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Comments on the task, oldest first", body = Vec<TaskCommentList>),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    summary = "List task comments"
)]
pub async fn get_task_comments(
    Path(task_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskCommentList>>, BusinessError> {
    Ok(Json(comments_for_task(&state.db, task_id).await?))
}
