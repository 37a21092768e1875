use super::models::{
    ActiveModel, Column, Entity, TaskComment, TaskCommentCreate, TaskCommentList,
    TaskCommentUpdate,
};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::models::{ensure_exists, ensure_user};
use crate::tasks::models as tasks;
use chrono::Utc;
use crudcrate::traits::MergeIntoActiveModel;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

const RESOURCE: &str = "task_comment";

fn validate_text(text: &str) -> BusinessResult<()> {
    if text.trim().is_empty() {
        return Err(crate::validation_error!("text", "must not be empty"));
    }
    Ok(())
}

pub async fn create_comment(
    db: &DatabaseConnection,
    create_data: TaskCommentCreate,
) -> BusinessResult<TaskComment> {
    validate_text(&create_data.text)?;
    ensure_exists::<tasks::Entity, _>(db, create_data.task_id, "task").await?;
    ensure_user(db, create_data.user_id).await?;

    let inserted = ActiveModel {
        id: Set(Uuid::new_v4()),
        task_id: Set(create_data.task_id),
        user_id: Set(create_data.user_id),
        text: Set(create_data.text),
        date: Set(Utc::now()),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(task_id = %inserted.task_id, user_id = ?inserted.user_id, "Added task comment");

    Ok(inserted.into())
}

pub async fn update_comment(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: TaskCommentUpdate,
) -> BusinessResult<TaskComment> {
    if let Some(Some(text)) = &update_data.text {
        validate_text(text)?;
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

    Ok(updated.into())
}

/// Comments under one task, oldest first so the thread reads top to bottom.
pub async fn comments_for_task(
    db: &DatabaseConnection,
    task_id: Uuid,
) -> BusinessResult<Vec<TaskCommentList>> {
    ensure_exists::<tasks::Entity, _>(db, task_id, "task").await?;

    let models = Entity::find()
        .filter(Column::TaskId.eq(task_id))
        .order_by_asc(Column::Date)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(models.into_iter().map(Into::into).collect())
}
