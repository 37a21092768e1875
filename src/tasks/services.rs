use super::models::{
    ActiveModel, Column, Entity, Task, TaskCreate, TaskList, TaskStatus, TaskUpdate,
};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::models::{ensure_user, icontains};
use chrono::{DateTime, Utc};
use crudcrate::traits::MergeIntoActiveModel;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};
use uuid::Uuid;

const RESOURCE: &str = "task";

fn validate_title(title: &str) -> BusinessResult<()> {
    if title.trim().is_empty() {
        return Err(crate::validation_error!("title", "must not be empty"));
    }
    Ok(())
}

pub async fn get_task(db: &DatabaseConnection, id: Uuid) -> BusinessResult<Task> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!(RESOURCE, id))?;

    Ok(Task::from_model(model, Utc::now()))
}

pub async fn create_task(db: &DatabaseConnection, create_data: TaskCreate) -> BusinessResult<Task> {
    validate_title(&create_data.title)?;
    ensure_user(db, create_data.assignee_id).await?;
    ensure_user(db, create_data.creator_id).await?;

    let now = Utc::now();
    let inserted = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(create_data.title),
        description: Set(create_data.description),
        assignee_id: Set(create_data.assignee_id),
        creator_id: Set(create_data.creator_id),
        status: Set(create_data.status),
        priority: Set(create_data.priority),
        deadline: Set(create_data.deadline),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(task_id = %inserted.id, assignee_id = ?inserted.assignee_id, "Created task");

    Ok(Task::from_model(inserted, now))
}

pub async fn update_task(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: TaskUpdate,
) -> BusinessResult<Task> {
    if let Some(Some(title)) = &update_data.title {
        validate_title(title)?;
    }
    if let Some(assignee_id) = update_data.assignee_id {
        ensure_user(db, assignee_id).await?;
    }
    if let Some(creator_id) = update_data.creator_id {
        ensure_user(db, creator_id).await?;
    }

    let existing: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!(RESOURCE, id))?
        .into_active_model();

    let updated = update_data
        .merge_into_activemodel(existing)
        .map_err(|e| e.to_business_error(RESOURCE))?
        .update(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(Task::from_model(updated, Utc::now()))
}

fn overdue_condition(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(Column::Deadline.lt(now))
        .add(Column::Status.is_in(TaskStatus::OPEN))
}

/// Open tasks past their deadline, earliest deadline first.
pub async fn overdue_tasks(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    limit: Option<u64>,
) -> BusinessResult<Vec<TaskList>> {
    let models = Entity::find()
        .filter(overdue_condition(now))
        .order_by_asc(Column::Deadline)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(models
        .into_iter()
        .map(|model| TaskList::from_model(model, now))
        .collect())
}

/// Overdue tasks, restricted to one assignee when `assignee_id` is given.
pub async fn overdue_task_count(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    assignee_id: Option<Uuid>,
) -> BusinessResult<u64> {
    let mut query = Entity::find().filter(overdue_condition(now));
    if let Some(assignee_id) = assignee_id {
        query = query.filter(Column::AssigneeId.eq(assignee_id));
    }

    query
        .count(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

/// Task totals of one assignee, whatever their status, and how many are still `new`.
pub async fn task_counts_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> BusinessResult<(u64, u64)> {
    let total = Entity::find()
        .filter(Column::AssigneeId.eq(user_id))
        .count(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;
    let pending = Entity::find()
        .filter(Column::AssigneeId.eq(user_id))
        .filter(Column::Status.eq(TaskStatus::New))
        .count(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok((total, pending))
}

/// Tasks whose title or description contains `needle`, ignoring case.
pub async fn search_tasks(
    db: &DatabaseConnection,
    needle: &str,
    now: DateTime<Utc>,
    limit: u64,
) -> BusinessResult<Vec<TaskList>> {
    let models = Entity::find()
        .filter(
            Condition::any()
                .add(icontains(Column::Title, needle))
                .add(icontains(Column::Description, needle)),
        )
        .order_by_asc(Column::Title)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(models
        .into_iter()
        .map(|model| TaskList::from_model(model, now))
        .collect())
}

pub async fn open_task_count(db: &DatabaseConnection) -> BusinessResult<u64> {
    Entity::find()
        .filter(Column::Status.is_in(TaskStatus::OPEN))
        .count(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

/// Open tasks assigned to `user_id`, by deadline with undated tasks last.
pub async fn open_tasks_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    now: DateTime<Utc>,
    limit: u64,
) -> BusinessResult<Vec<TaskList>> {
    let models = Entity::find()
        .filter(Column::AssigneeId.eq(user_id))
        .filter(Column::Status.is_in(TaskStatus::OPEN))
        .order_by_asc(Expr::col(Column::Deadline).is_null())
        .order_by_asc(Column::Deadline)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(models
        .into_iter()
        .map(|model| TaskList::from_model(model, now))
        .collect())
}

/// Moves one task to `status`, given as its wire name.
pub async fn set_status(db: &DatabaseConnection, id: Uuid, status: &str) -> BusinessResult<Task> {
    let status: TaskStatus = status
        .trim()
        .parse()
        .map_err(|message: String| crate::validation_error!("status", message))?;

    let task = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!(RESOURCE, id))?;

    let previous = task.status;
    let mut active: ActiveModel = task.into();
    active.status = Set(status);
    active.last_updated = Set(Utc::now());
    let updated = active
        .update(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(task_id = %id, from = ?previous, to = ?status, "Changed task status");

    Ok(Task::from_model(updated, Utc::now()))
}

/// Marks every listed task as done and returns how many rows changed.
pub async fn complete_tasks(db: &DatabaseConnection, ids: &[Uuid]) -> BusinessResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(TaskStatus::Done))
        .col_expr(Column::LastUpdated, Expr::value(Utc::now()))
        .filter(Column::Id.is_in(ids.iter().copied()))
        .exec(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(requested = ids.len(), updated = result.rows_affected, "Completed tasks");

    Ok(result.rows_affected)
}
