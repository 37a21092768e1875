use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "announcements")]
#[crudcrate(
    generate_router,
    api_struct = "Announcement",
    name_singular = "announcement",
    name_plural = "announcements",
    description = "Staff announcements. Pinned announcements are listed before the rest.",
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable, fulltext)]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    #[crudcrate(fulltext)]
    pub text: String,
    #[crudcrate(sortable, filterable)]
    pub author_id: Option<Uuid>,
    #[crudcrate(create_model = false, on_create = chrono::Utc::now(), sortable, filterable)]
    pub published_at: DateTime<Utc>,
    #[crudcrate(sortable, filterable)]
    pub is_pinned: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::AuthorId",
        to = "crate::users::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Author,
}

impl ActiveModelBehavior for ActiveModel {}
