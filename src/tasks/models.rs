use chrono::{DateTime, Utc};
use crudcrate::EntityToModels;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, entity::prelude::*};
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, ToSchema, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl TaskStatus {
    /// Statuses that still need work; only these can become overdue.
    pub const OPEN: [TaskStatus; 2] = [TaskStatus::New, TaskStatus::InProgress];

    pub fn is_open(self) -> bool {
        Self::OPEN.contains(&self)
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(TaskStatus::New),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "cancelled" => Ok(TaskStatus::Cancelled),
            other => Err(format!(
                "must be one of new, in_progress, done, cancelled; got '{other}'"
            )),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, ToSchema, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "normal")]
    Normal,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "tasks")]
#[crudcrate(
    api_struct = "Task",
    name_singular = "task",
    name_plural = "tasks",
    description = "Lab tasks with an assignee, priority and optional deadline. Open tasks past their deadline are reported as overdue.",
    fn_get_one = get_one_task,
    fn_get_all = get_all_tasks,
    fn_create = create_task,
    fn_update = update_task,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable, fulltext)]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    #[crudcrate(fulltext)]
    pub description: String,
    #[crudcrate(sortable, filterable)]
    pub assignee_id: Option<Uuid>,
    #[crudcrate(sortable, filterable)]
    pub creator_id: Option<Uuid>,
    #[crudcrate(sortable, filterable, enum_field)]
    pub status: TaskStatus,
    #[crudcrate(sortable, filterable, enum_field)]
    pub priority: TaskPriority,
    #[crudcrate(sortable, filterable)]
    pub deadline: Option<DateTime<Utc>>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = false, create_model = false, update_model = false)]
    pub is_overdue: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::AssigneeId",
        to = "crate::users::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Assignee,
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::CreatorId",
        to = "crate::users::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Creator,
}

impl ActiveModelBehavior for ActiveModel {}

/// An open task whose deadline has passed.
pub fn is_overdue(deadline: Option<DateTime<Utc>>, status: TaskStatus, now: DateTime<Utc>) -> bool {
    status.is_open() && deadline.is_some_and(|deadline| now > deadline)
}

impl Task {
    pub fn from_model(model: Model, now: DateTime<Utc>) -> Self {
        let overdue = is_overdue(model.deadline, model.status, now);
        let mut task: Task = model.into();
        task.is_overdue = overdue;
        task
    }
}

impl TaskList {
    pub fn from_model(model: Model, now: DateTime<Utc>) -> Self {
        let overdue = is_overdue(model.deadline, model.status, now);
        let mut task = TaskList::from(model);
        task.is_overdue = overdue;
        task
    }
}

async fn get_one_task(db: &DatabaseConnection, id: Uuid) -> Result<Task, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("task with id '{id}' not found")))?;

    Ok(Task::from_model(model, Utc::now()))
}

async fn get_all_tasks(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<TaskList>, DbErr> {
    let models = Entity::find()
        .filter(condition.clone())
        .order_by(order_column, order_direction)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;

    let now = Utc::now();
    Ok(models
        .into_iter()
        .map(|model| TaskList::from_model(model, now))
        .collect())
}

async fn create_task(db: &DatabaseConnection, create_data: TaskCreate) -> Result<Task, DbErr> {
    super::services::create_task(db, create_data)
        .await
        .map_err(DbErr::from)
}

async fn update_task(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: TaskUpdate,
) -> Result<Task, DbErr> {
    super::services::update_task(db, id, update_data)
        .await
        .map_err(DbErr::from)
}
