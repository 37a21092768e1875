use super::models::{
    ActiveModel, Column, EXPIRY_WINDOW_DAYS, Entity, Reagent, ReagentCreate, ReagentList,
    ReagentUpdate,
};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::models::icontains;
use crate::reagent_movements::models::MovementType;
use crate::reagent_movements::services::{
    MovementRequest, OPENING_BALANCE_COMMENT, apply_movement, validate_stock_amount,
};
use chrono::{Duration, NaiveDate, Utc};
use crudcrate::traits::MergeIntoActiveModel;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

const RESOURCE: &str = "reagent";

fn to_list(models: Vec<super::models::Model>, reference_date: NaiveDate) -> Vec<ReagentList> {
    models
        .into_iter()
        .map(|model| ReagentList::from_model(model, reference_date))
        .collect()
}

/// Reagents at or below their minimum threshold, lowest stock first.
pub async fn critical_reagents(
    db: &DatabaseConnection,
    reference_date: NaiveDate,
    limit: Option<u64>,
) -> BusinessResult<Vec<ReagentList>> {
    let models = Entity::find()
        .filter(Expr::col(Column::OnHand).lte(Expr::col(Column::MinThreshold)))
        .order_by_asc(Column::OnHand)
        .order_by_asc(Column::Name)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(to_list(models, reference_date))
}

/// Reagents expiring within the next 30 days of `reference_date`, soonest first.
pub async fn expiring_reagents(
    db: &DatabaseConnection,
    reference_date: NaiveDate,
    limit: Option<u64>,
) -> BusinessResult<Vec<ReagentList>> {
    let horizon = reference_date + Duration::days(EXPIRY_WINDOW_DAYS);
    let models = Entity::find()
        .filter(Column::ExpiryDate.between(reference_date, horizon))
        .order_by_asc(Column::ExpiryDate)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(to_list(models, reference_date))
}

/// Reagents currently in stock, by name.
pub async fn active_reagents(
    db: &DatabaseConnection,
    reference_date: NaiveDate,
) -> BusinessResult<Vec<ReagentList>> {
    let models = Entity::find()
        .filter(Column::OnHand.gt(Decimal::ZERO))
        .order_by_asc(Column::Name)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(to_list(models, reference_date))
}

/// Reagents whose name or category contains `needle`, ignoring case.
pub async fn search_reagents(
    db: &DatabaseConnection,
    needle: &str,
    reference_date: NaiveDate,
    limit: u64,
) -> BusinessResult<Vec<ReagentList>> {
    let models = Entity::find()
        .filter(
            Condition::any()
                .add(icontains(Column::Name, needle))
                .add(icontains(Column::Category, needle)),
        )
        .order_by_asc(Column::Name)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    Ok(to_list(models, reference_date))
}

pub async fn reagent_count(db: &DatabaseConnection) -> BusinessResult<u64> {
    Entity::find()
        .count(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

fn validate_name(name: &str) -> BusinessResult<()> {
    if name.trim().is_empty() {
        return Err(crate::validation_error!("name", "must not be empty"));
    }
    Ok(())
}

fn validate_min_threshold(min_threshold: Decimal) -> BusinessResult<()> {
    if min_threshold < Decimal::ZERO {
        return Err(crate::validation_error!("min_threshold", "must not be negative"));
    }
    validate_stock_amount("min_threshold", min_threshold)
}

pub async fn get_reagent(db: &DatabaseConnection, id: Uuid) -> BusinessResult<Reagent> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!(RESOURCE, id))?;

    Ok(Reagent::from_model(model, Utc::now().date_naive()))
}

/// Inserts the reagent with an empty stock and books the requested opening balance as an
/// `in` movement in the same transaction, so stock always equals the movement sum.
pub async fn create_reagent(
    db: &DatabaseConnection,
    create_data: ReagentCreate,
) -> BusinessResult<Reagent> {
    validate_name(&create_data.name)?;
    let opening_balance = create_data.on_hand;
    if opening_balance < Decimal::ZERO {
        return Err(crate::validation_error!("on_hand", "must not be negative"));
    }
    validate_stock_amount("on_hand", opening_balance)?;
    validate_min_threshold(create_data.min_threshold)?;

    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    let now = Utc::now();
    let inserted = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(create_data.name),
        category: Set(create_data.category),
        on_hand: Set(Decimal::ZERO),
        min_threshold: Set(create_data.min_threshold),
        expiry_date: Set(create_data.expiry_date),
        external_link: Set(create_data.external_link),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(&txn)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    if opening_balance > Decimal::ZERO {
        let request = MovementRequest::new(inserted.id, opening_balance, MovementType::In)
            .with_comment(OPENING_BALANCE_COMMENT);
        apply_movement(&txn, &request).await?;
    }

    txn.commit()
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(
        reagent_id = %inserted.id,
        opening_balance = %opening_balance,
        "Created reagent {}",
        inserted.name
    );

    get_reagent(db, inserted.id).await
}

/// Applies a partial update. Stock is not part of the update model.
pub async fn update_reagent(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: ReagentUpdate,
) -> BusinessResult<Reagent> {
    if let Some(Some(name)) = &update_data.name {
        validate_name(name)?;
    }
    if let Some(Some(min_threshold)) = update_data.min_threshold {
        validate_min_threshold(min_threshold)?;
    }

    let existing: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!(RESOURCE, id))?
        .into_active_model();

    let updated = update_data
        .merge_into_activemodel(existing)
        .map_err(|e| e.to_business_error(RESOURCE))?;
    updated
        .update(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    get_reagent(db, id).await
}
