use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, ToSchema, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    #[sea_orm(string_value = "in")]
    In,
    #[sea_orm(string_value = "out")]
    Out,
}

impl MovementType {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(MovementType::In),
            "out" => Ok(MovementType::Out),
            other => Err(format!("must be 'in' or 'out', got '{other}'")),
        }
    }
}

/// One immutable line of the inventory ledger. Rows are only ever inserted; they
/// disappear solely through the cascade when their reagent is deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "reagent_movements")]
#[schema(as = ReagentMovement)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reagent_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity: Decimal,
    pub movement_type: MovementType,
    pub date: DateTime<Utc>,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub user_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::reagents::models::Entity",
        from = "Column::ReagentId",
        to = "crate::reagents::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Reagents,
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::UserId",
        to = "crate::users::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Users,
}

impl Related<crate::reagents::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reagents.def()
    }
}

impl Related<crate::users::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Request body for `POST /api/reagent_movements`. `movement_type` stays a string so an
/// unknown value is reported as a field validation error rather than a decode failure.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreateMovement {
    pub reagent_id: Uuid,
    pub quantity: Decimal,
    #[schema(example = "in")]
    pub movement_type: String,
    #[serde(default)]
    pub comment: Option<String>,
    /// Acting user recorded on the movement.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Result of a committed movement: the ledger row and the reagent as re-read afterwards.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordedMovement {
    pub movement: Model,
    pub reagent: crate::reagents::models::Reagent,
}

/// Number of ledger lines of one movement type.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct MovementStat {
    pub movement_type: MovementType,
    pub total: i64,
}
