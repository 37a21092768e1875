use chrono::{DateTime, Utc};
use crudcrate::EntityToModels;
use sea_orm::entity::prelude::*;

/// Catalogue entry for a document template. `file_url` points at wherever the file is
/// stored; this service keeps metadata only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "document_templates")]
#[crudcrate(
    api_struct = "DocumentTemplate",
    name_singular = "document_template",
    name_plural = "document_templates",
    description = "Protocol and form templates shared by the lab, listed by name.",
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable, fulltext)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    #[crudcrate(fulltext, on_create = String::new())]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub file_url: String,
    #[crudcrate(sortable, filterable, update_model = false)]
    pub uploaded_by_id: Option<Uuid>,
    #[crudcrate(sortable, update_model = false, create_model = false, on_create = chrono::Utc::now())]
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::UploadedById",
        to = "crate::users::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    UploadedBy,
}

impl ActiveModelBehavior for ActiveModel {}
