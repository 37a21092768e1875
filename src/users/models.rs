use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::entity::prelude::*;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, ToSchema, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "employee")]
    Employee,
    #[sea_orm(string_value = "lab_head")]
    LabHead,
    #[sea_orm(string_value = "sysadmin")]
    Sysadmin,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "users")]
#[crudcrate(
    generate_router,
    api_struct = "User",
    name_singular = "user",
    name_plural = "users",
    description = "Lab staff accounts. Movements, tasks and announcements reference their acting user; deleting a user clears those references.",
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[sea_orm(unique)]
    #[crudcrate(sortable, filterable, fulltext)]
    pub username: String,
    #[crudcrate(sortable, filterable, fulltext)]
    pub email: Option<String>,
    #[crudcrate(sortable, filterable, fulltext)]
    pub first_name: Option<String>,
    #[crudcrate(sortable, filterable, fulltext)]
    pub last_name: Option<String>,
    #[crudcrate(sortable, filterable, enum_field)]
    pub role: UserRole,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(list_model = false)]
    pub profile_url: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::reagent_movements::models::Entity")]
    ReagentMovements,
}

impl Related<crate::reagent_movements::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReagentMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
