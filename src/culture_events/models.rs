use chrono::{DateTime, Utc};
use crudcrate::EntityToModels;
use sea_orm::entity::prelude::*;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, ToSchema, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum CultureEventType {
    #[sea_orm(string_value = "passage")]
    Passage,
    #[sea_orm(string_value = "feeding")]
    Feeding,
    #[sea_orm(string_value = "freezing")]
    Freezing,
    #[sea_orm(string_value = "thawing")]
    Thawing,
    #[sea_orm(string_value = "observation")]
    Observation,
    #[sea_orm(string_value = "disposal")]
    Disposal,
}

/// Log entry for a culture. The culture and the acting user are fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "culture_events")]
#[crudcrate(
    api_struct = "CultureEvent",
    name_singular = "culture_event",
    name_plural = "culture_events",
    description = "Handling log of a culture: passages, feedings, freezing and thawing, observations and disposal.",
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable, update_model = false)]
    pub culture_id: Uuid,
    #[crudcrate(sortable, filterable, enum_field)]
    pub event_type: CultureEventType,
    #[crudcrate(sortable, filterable, on_create = chrono::Utc::now())]
    pub date: DateTime<Utc>,
    #[sea_orm(column_type = "Text")]
    #[crudcrate(fulltext, on_create = String::new())]
    pub comment: String,
    #[crudcrate(sortable, filterable, update_model = false)]
    pub user_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::cultures::models::Entity",
        from = "Column::CultureId",
        to = "crate::cultures::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Culture,
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::UserId",
        to = "crate::users::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<crate::cultures::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Culture.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
