use chrono::{DateTime, NaiveDate, Utc};
use crudcrate::EntityToModels;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, entity::prelude::*};

/// A reagent counts as expiring when its expiry date is at most this many days away.
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, ToSchema, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ReagentCategory {
    #[sea_orm(string_value = "buffer")]
    Buffer,
    #[sea_orm(string_value = "enzyme")]
    Enzyme,
    #[sea_orm(string_value = "antibody")]
    Antibody,
    #[sea_orm(string_value = "chemical")]
    Chemical,
    #[sea_orm(string_value = "media")]
    Media,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "reagents")]
#[crudcrate(
    api_struct = "Reagent",
    name_singular = "reagent",
    name_plural = "reagents",
    description = "Trackable laboratory consumables. The on-hand quantity is maintained by the movement ledger and cannot be edited directly; the value given at creation is booked as an opening movement.",
    fn_get_one = get_one_reagent,
    fn_get_all = get_all_reagents,
    fn_create = create_reagent,
    fn_update = update_reagent,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable, fulltext)]
    pub name: String,
    #[crudcrate(sortable, filterable, enum_field)]
    pub category: ReagentCategory,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    #[crudcrate(sortable, filterable, update_model = false)]
    pub on_hand: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    #[crudcrate(sortable, filterable)]
    pub min_threshold: Decimal,
    #[crudcrate(sortable, filterable)]
    pub expiry_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(list_model = false)]
    pub external_link: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = false, create_model = false, update_model = false)]
    pub is_critical: bool,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = false, create_model = false, update_model = false)]
    pub is_expiring_soon: bool,
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

/// Stock has fallen to or below the configured minimum. Holds for negative stock too.
pub fn is_critical(on_hand: Decimal, min_threshold: Decimal) -> bool {
    on_hand <= min_threshold
}

/// The expiry date lies within `[reference_date, reference_date + 30 days]`.
pub fn is_expiring_soon(expiry_date: Option<NaiveDate>, reference_date: NaiveDate) -> bool {
    expiry_date.is_some_and(|expiry| {
        let days_left = (expiry - reference_date).num_days();
        (0..=EXPIRY_WINDOW_DAYS).contains(&days_left)
    })
}

impl Model {
    pub fn is_critical(&self) -> bool {
        is_critical(self.on_hand, self.min_threshold)
    }

    pub fn is_expiring_soon(&self, reference_date: NaiveDate) -> bool {
        is_expiring_soon(self.expiry_date, reference_date)
    }
}

impl Reagent {
    /// Builds the API representation with the derived flags evaluated at `reference_date`.
    pub fn from_model(model: Model, reference_date: NaiveDate) -> Self {
        let critical = model.is_critical();
        let expiring = model.is_expiring_soon(reference_date);
        let mut reagent: Reagent = model.into();
        reagent.is_critical = critical;
        reagent.is_expiring_soon = expiring;
        reagent
    }
}

impl ReagentList {
    pub fn from_model(model: Model, reference_date: NaiveDate) -> Self {
        let critical = model.is_critical();
        let expiring = model.is_expiring_soon(reference_date);
        let mut reagent = ReagentList::from(model);
        reagent.is_critical = critical;
        reagent.is_expiring_soon = expiring;
        reagent
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn get_one_reagent(db: &DatabaseConnection, id: Uuid) -> Result<Reagent, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("reagent with id '{id}' not found")))?;

    Ok(Reagent::from_model(model, today()))
}

async fn get_all_reagents(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<ReagentList>, DbErr> {
    let models = Entity::find()
        .filter(condition.clone())
        .order_by(order_column, order_direction)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;

    let reference_date = today();
    Ok(models
        .into_iter()
        .map(|model| ReagentList::from_model(model, reference_date))
        .collect())
}

async fn create_reagent(
    db: &DatabaseConnection,
    create_data: ReagentCreate,
) -> Result<Reagent, DbErr> {
    super::services::create_reagent(db, create_data)
        .await
        .map_err(DbErr::from)
}

async fn update_reagent(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: ReagentUpdate,
) -> Result<Reagent, DbErr> {
    super::services::update_reagent(db, id, update_data)
        .await
        .map_err(DbErr::from)
}
