use super::models::{
    ActiveModel, DocumentTemplate, DocumentTemplateCreate, DocumentTemplateUpdate, Entity,
};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::models::ensure_user;
use chrono::Utc;
use crudcrate::traits::MergeIntoActiveModel;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

const RESOURCE: &str = "document_template";

fn validate_not_blank(field: &str, value: &str) -> BusinessResult<()> {
    if value.trim().is_empty() {
        return Err(crate::validation_error!(field, "must not be empty"));
    }
    Ok(())
}

pub async fn create_template(
    db: &DatabaseConnection,
    create_data: DocumentTemplateCreate,
) -> BusinessResult<DocumentTemplate> {
    validate_not_blank("name", &create_data.name)?;
    validate_not_blank("file_url", &create_data.file_url)?;
    ensure_user(db, create_data.uploaded_by_id).await?;

    let inserted = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(create_data.name),
        description: Set(create_data.description.unwrap_or_default()),
        file_url: Set(create_data.file_url),
        uploaded_by_id: Set(create_data.uploaded_by_id),
        uploaded_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(template_id = %inserted.id, name = %inserted.name, "Registered document template");

    Ok(inserted.into())
}

pub async fn update_template(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: DocumentTemplateUpdate,
) -> BusinessResult<DocumentTemplate> {
    if let Some(Some(name)) = &update_data.name {
        validate_not_blank("name", name)?;
    }
    if let Some(Some(file_url)) = &update_data.file_url {
        validate_not_blank("file_url", file_url)?;
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
