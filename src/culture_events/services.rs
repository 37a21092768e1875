use super::models::{
    ActiveModel, Column, CultureEvent, CultureEventCreate, CultureEventList, CultureEventUpdate,
    Entity,
};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::models::{ensure_exists, ensure_user};
use crate::cultures::models as cultures;
use chrono::Utc;
use crudcrate::traits::MergeIntoActiveModel;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

const RESOURCE: &str = "culture_event";

pub async fn create_event(
    db: &DatabaseConnection,
    create_data: CultureEventCreate,
) -> BusinessResult<CultureEvent> {
    ensure_exists::<cultures::Entity, _>(db, create_data.culture_id, "culture").await?;
    ensure_user(db, create_data.user_id).await?;

    let inserted = ActiveModel {
        id: Set(Uuid::new_v4()),
        culture_id: Set(create_data.culture_id),
        event_type: Set(create_data.event_type),
        date: Set(create_data.date.unwrap_or_else(Utc::now)),
        comment: Set(create_data.comment.unwrap_or_default()),
        user_id: Set(create_data.user_id),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(
        culture_id = %inserted.culture_id,
        event_type = ?inserted.event_type,
        "Logged culture event"
    );

    Ok(inserted.into())
}

pub async fn update_event(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: CultureEventUpdate,
) -> BusinessResult<CultureEvent> {
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

/// Events of one culture, newest first.
pub async fn events_for_culture(
    db: &DatabaseConnection,
    culture_id: Uuid,
) -> BusinessResult<Vec<CultureEventList>> {
    ensure_exists::<cultures::Entity, _>(db, culture_id, "culture").await?;

    let models = Entity::find()
        .filter(Column::CultureId.eq(culture_id))
        .order_by_desc(Column::Date)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(models.into_iter().map(Into::into).collect())
}
