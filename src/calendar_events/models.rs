use chrono::{DateTime, NaiveDate, Utc};
use crudcrate::EntityToModels;
use sea_orm::{DatabaseConnection, entity::prelude::*};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "calendar_events")]
#[crudcrate(
    api_struct = "CalendarEvent",
    name_singular = "calendar_event",
    name_plural = "calendar_events",
    description = "Shared lab calendar: meetings, instrument bookings and seminars with an organizer and participants.",
    fn_get_one = get_one_event,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable, fulltext)]
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    #[crudcrate(fulltext, list_model = false, on_create = String::new())]
    pub description: String,
    #[crudcrate(sortable, filterable)]
    pub start_datetime: DateTime<Utc>,
    #[crudcrate(sortable, filterable)]
    pub end_datetime: Option<DateTime<Utc>>,
    #[crudcrate(sortable, filterable)]
    pub organizer_id: Option<Uuid>,
    #[crudcrate(sortable, filterable, fulltext, on_create = String::new())]
    pub location: String,
    /// Replaced as a whole through `PUT /calendar_events/{id}/participants`.
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = vec![], update_model = false)]
    pub participant_ids: Vec<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::OrganizerId",
        to = "crate::users::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Organizer,
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Calendar window and attendance filters for `GET /calendar_events`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct CalendarQuery {
    /// Events starting on or after this day.
    pub start_date: Option<NaiveDate>,
    /// Events starting on or before this day.
    pub end_date: Option<NaiveDate>,
    /// Events organized or attended by this user.
    pub user_id: Option<Uuid>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ParticipantList {
    pub user_ids: Vec<Uuid>,
}

async fn get_one_event(db: &DatabaseConnection, id: Uuid) -> Result<CalendarEvent, DbErr> {
    super::services::get_event(db, id)
        .await
        .map_err(DbErr::from)
}
