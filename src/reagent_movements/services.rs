use super::models::{
    ActiveModel, Column, CreateMovement, Entity, Model, MovementStat, MovementType,
    RecordedMovement,
};
use crate::common::errors::{BusinessError, BusinessResult, DbErrorExt};
use crate::common::models::ensure_user;
use crate::reagents::models as reagents;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Func, SimpleExpr},
};
use uuid::Uuid;

pub const OPENING_BALANCE_COMMENT: &str = "Opening balance";

const RESOURCE: &str = "reagent_movement";

/// Stock columns are `Decimal(10, 2)`: two decimal places, eight integer digits.
pub const STOCK_SCALE: u32 = 2;
const STOCK_INTEGER_DIGITS: u32 = 8;
const ROUNDING_DIGITS: i32 = 2;

/// Everything needed to book one movement. The acting user is passed explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovementRequest {
    pub reagent_id: Uuid,
    pub quantity: Decimal,
    pub movement_type: MovementType,
    pub comment: String,
    pub user_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
}

impl MovementRequest {
    pub fn new(reagent_id: Uuid, quantity: Decimal, movement_type: MovementType) -> Self {
        Self {
            reagent_id,
            quantity,
            movement_type,
            comment: String::new(),
            user_id: None,
            date: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn with_user(mut self, user_id: Option<Uuid>) -> Self {
        self.user_id = user_id;
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: Option<DateTime<Utc>>) -> Self {
        self.date = date;
        self
    }

    /// Signed change this movement applies to the reagent's stock.
    pub fn delta(&self) -> Decimal {
        match self.movement_type {
            MovementType::In => self.quantity,
            MovementType::Out => -self.quantity,
        }
    }
}

impl TryFrom<CreateMovement> for MovementRequest {
    type Error = BusinessError;

    fn try_from(payload: CreateMovement) -> Result<Self, Self::Error> {
        validate_quantity(payload.quantity)?;
        let movement_type = payload
            .movement_type
            .trim()
            .to_lowercase()
            .parse::<MovementType>()
            .map_err(|message| crate::validation_error!("movement_type", message))?;

        Ok(MovementRequest::new(payload.reagent_id, payload.quantity, movement_type)
            .with_comment(payload.comment.unwrap_or_default())
            .with_user(payload.user_id)
            .with_date(payload.date))
    }
}

fn validate_quantity(quantity: Decimal) -> BusinessResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(crate::validation_error!(
            "quantity",
            "must be greater than zero"
        ));
    }
    validate_stock_amount("quantity", quantity)
}

/// Rejects amounts a stock column cannot store exactly.
pub fn validate_stock_amount(field: &str, amount: Decimal) -> BusinessResult<()> {
    if amount.normalize().scale() > STOCK_SCALE {
        return Err(crate::validation_error!(
            field,
            format!("must have at most {STOCK_SCALE} decimal places")
        ));
    }
    if amount.abs() >= Decimal::from(10_i64.pow(STOCK_INTEGER_DIGITS)) {
        return Err(crate::validation_error!(
            field,
            format!("must have at most {STOCK_INTEGER_DIGITS} integer digits")
        ));
    }
    Ok(())
}

/// Books `request` inside a transaction owned by the caller: inserts the ledger row and
/// shifts `on_hand` with a single column-expression update. Nothing is committed here.
pub async fn apply_movement<C>(txn: &C, request: &MovementRequest) -> BusinessResult<Model>
where
    C: ConnectionTrait,
{
    validate_quantity(request.quantity)?;

    let reagent = reagents::Entity::find_by_id(request.reagent_id)
        .one(txn)
        .await
        .map_err(|e| e.to_business_error("reagent"))?
        .ok_or_else(|| crate::not_found!("reagent", request.reagent_id))?;

    ensure_user(txn, request.user_id).await?;

    let movement = ActiveModel {
        id: Set(Uuid::new_v4()),
        reagent_id: Set(reagent.id),
        quantity: Set(request.quantity),
        movement_type: Set(request.movement_type),
        date: Set(request.date.unwrap_or_else(Utc::now)),
        comment: Set(request.comment.clone()),
        user_id: Set(request.user_id),
    }
    .insert(txn)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    let on_hand = Expr::col(reagents::Column::OnHand);
    let shifted = match request.movement_type {
        MovementType::In => on_hand.add(request.quantity),
        MovementType::Out => on_hand.sub(request.quantity),
    };
    // SQLite keeps decimals as REAL; rounding to the column scale stops float drift.
    let adjusted: SimpleExpr = Func::round_with_precision(shifted, ROUNDING_DIGITS).into();

    let result = reagents::Entity::update_many()
        .col_expr(reagents::Column::OnHand, adjusted)
        .col_expr(reagents::Column::LastUpdated, Expr::value(Utc::now()))
        .filter(reagents::Column::Id.eq(reagent.id))
        .exec(txn)
        .await
        .map_err(|e| e.to_business_error("reagent"))?;

    if result.rows_affected == 0 {
        return Err(BusinessError::Integrity {
            resource: "reagent".to_string(),
            message: format!("reagent '{}' disappeared while its stock was updated", reagent.id),
        });
    }

    tracing::debug!(
        movement_id = %movement.id,
        reagent_id = %reagent.id,
        delta = %request.delta(),
        "Applied movement"
    );

    Ok(movement)
}

/// Records one movement in its own transaction and returns the committed row together
/// with the reagent as stored afterwards. Any failure rolls the whole movement back.
pub async fn record_movement(
    db: &DatabaseConnection,
    request: MovementRequest,
) -> BusinessResult<RecordedMovement> {
    validate_quantity(request.quantity)?;

    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    // Dropping an uncommitted transaction rolls it back.
    let movement = apply_movement(&txn, &request).await?;

    txn.commit()
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    let reagent = reagents::Entity::find_by_id(request.reagent_id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("reagent"))?
        .ok_or_else(|| crate::not_found!("reagent", request.reagent_id))?;

    tracing::info!(
        movement_id = %movement.id,
        reagent_id = %reagent.id,
        movement_type = %movement.movement_type,
        quantity = %movement.quantity,
        on_hand = %reagent.on_hand,
        user_id = ?movement.user_id,
        "Recorded reagent movement"
    );

    Ok(RecordedMovement {
        movement,
        reagent: reagents::Reagent::from_model(reagent, Utc::now().date_naive()),
    })
}

/// Movements, newest first, optionally restricted to one reagent.
pub async fn list_movements(
    db: &DatabaseConnection,
    reagent_id: Option<Uuid>,
    limit: u64,
    offset: u64,
) -> BusinessResult<Vec<Model>> {
    let mut query = Entity::find();
    if let Some(reagent_id) = reagent_id {
        query = query.filter(Column::ReagentId.eq(reagent_id));
    }

    query
        .order_by_desc(Column::Date)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

pub async fn movements_for_reagent(
    db: &DatabaseConnection,
    reagent_id: Uuid,
) -> BusinessResult<Vec<Model>> {
    reagents::Entity::find_by_id(reagent_id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("reagent"))?
        .ok_or_else(|| crate::not_found!("reagent", reagent_id))?;

    Entity::find()
        .filter(Column::ReagentId.eq(reagent_id))
        .order_by_desc(Column::Date)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

pub async fn get_movement(db: &DatabaseConnection, id: Uuid) -> BusinessResult<Model> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!("reagent movement", id))
}

/// Ledger line counts per movement type.
pub async fn movement_counts(db: &DatabaseConnection) -> BusinessResult<Vec<MovementStat>> {
    Entity::find()
        .select_only()
        .column(Column::MovementType)
        .column_as(Expr::col(Column::Id).count(), "total")
        .group_by(Column::MovementType)
        .order_by_asc(Column::MovementType)
        .into_model::<MovementStat>()
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}
