use super::models::{
    ActiveModel, Column, Culture, CultureCreate, CultureStatus, CultureUpdate, Entity,
};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::models::ensure_user;
use crate::recipes::services::ensure_recipe;
use chrono::Utc;
use crudcrate::traits::MergeIntoActiveModel;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

const RESOURCE: &str = "culture";

fn validate_name(name: &str) -> BusinessResult<()> {
    if name.trim().is_empty() {
        return Err(crate::validation_error!("name", "must not be empty"));
    }
    Ok(())
}

fn validate_passage_number(passage_number: i32) -> BusinessResult<()> {
    if passage_number < 0 {
        return Err(crate::validation_error!("passage_number", "must not be negative"));
    }
    Ok(())
}

pub async fn create_culture(
    db: &DatabaseConnection,
    create_data: CultureCreate,
) -> BusinessResult<Culture> {
    validate_name(&create_data.name)?;
    let passage_number = create_data.passage_number.unwrap_or(0);
    validate_passage_number(passage_number)?;
    ensure_recipe(db, create_data.recipe_id).await?;
    ensure_user(db, create_data.responsible_id).await?;

    let now = Utc::now();
    let inserted = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(create_data.name),
        status: Set(create_data.status.unwrap_or(CultureStatus::Active)),
        seeding_date: Set(create_data.seeding_date.unwrap_or(now)),
        passage_number: Set(passage_number),
        recipe_id: Set(create_data.recipe_id),
        responsible_id: Set(create_data.responsible_id),
        notes: Set(create_data.notes.unwrap_or_default()),
        last_updated: Set(now),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(culture_id = %inserted.id, status = ?inserted.status, "Created culture");

    Ok(inserted.into())
}

pub async fn update_culture(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: CultureUpdate,
) -> BusinessResult<Culture> {
    if let Some(Some(name)) = &update_data.name {
        validate_name(name)?;
    }
    if let Some(Some(passage_number)) = update_data.passage_number {
        validate_passage_number(passage_number)?;
    }
    if let Some(recipe_id) = update_data.recipe_id {
        ensure_recipe(db, recipe_id).await?;
    }
    if let Some(responsible_id) = update_data.responsible_id {
        ensure_user(db, responsible_id).await?;
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

pub async fn active_culture_count(db: &DatabaseConnection) -> BusinessResult<u64> {
    Entity::find()
        .filter(Column::Status.eq(CultureStatus::Active))
        .count(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}
