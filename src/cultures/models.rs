use chrono::{DateTime, Utc};
use crudcrate::EntityToModels;
use sea_orm::entity::prelude::*;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, ToSchema, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum CultureStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "frozen")]
    Frozen,
    #[sea_orm(string_value = "discarded")]
    Discarded,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "cultures")]
#[crudcrate(
    api_struct = "Culture",
    name_singular = "culture",
    name_plural = "cultures",
    description = "Cell cultures kept by the lab, with their passage count, the recipe of their medium and the person responsible.",
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable, fulltext)]
    pub name: String,
    #[crudcrate(sortable, filterable, enum_field, on_create = CultureStatus::Active)]
    pub status: CultureStatus,
    #[crudcrate(sortable, filterable, on_create = chrono::Utc::now())]
    pub seeding_date: DateTime<Utc>,
    #[crudcrate(sortable, filterable, on_create = 0)]
    pub passage_number: i32,
    #[crudcrate(sortable, filterable)]
    pub recipe_id: Option<Uuid>,
    #[crudcrate(sortable, filterable)]
    pub responsible_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    #[crudcrate(fulltext, list_model = false, on_create = String::new())]
    pub notes: String,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::recipes::models::Entity",
        from = "Column::RecipeId",
        to = "crate::recipes::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Recipe,
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::ResponsibleId",
        to = "crate::users::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Responsible,
    #[sea_orm(has_many = "crate::culture_events::models::Entity")]
    Events,
}

impl Related<crate::culture_events::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
