use chrono::{DateTime, Utc};
use crudcrate::EntityToModels;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "task_comments")]
#[crudcrate(
    api_struct = "TaskComment",
    name_singular = "task_comment",
    name_plural = "task_comments",
    description = "Discussion under a task. Only the text can be edited once posted.",
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable, update_model = false)]
    pub task_id: Uuid,
    #[crudcrate(sortable, filterable, update_model = false)]
    pub user_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    #[crudcrate(fulltext)]
    pub text: String,
    #[crudcrate(sortable, update_model = false, create_model = false, on_create = chrono::Utc::now())]
    pub date: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::tasks::models::Entity",
        from = "Column::TaskId",
        to = "crate::tasks::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Task,
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::UserId",
        to = "crate::users::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<crate::tasks::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
