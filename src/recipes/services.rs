use super::ingredients;
use super::models::{
    ActiveModel, AddIngredient, Entity, IngredientUnit, Recipe, RecipeCreate,
    RecipeIngredient, RecipeStatus, RecipeUpdate,
};
use crate::common::errors::{BusinessError, BusinessResult, DbErrorExt};
use crate::common::models::{ensure_exists, ensure_user};
use crate::reagent_movements::services::validate_stock_amount;
use crate::reagents::models as reagents;
use chrono::Utc;
use crudcrate::traits::MergeIntoActiveModel;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use std::collections::HashMap;
use uuid::Uuid;

const RESOURCE: &str = "recipe";
const INGREDIENT: &str = "recipe_ingredient";

fn validate_name(name: &str) -> BusinessResult<()> {
    if name.trim().is_empty() {
        return Err(crate::validation_error!("name", "must not be empty"));
    }
    Ok(())
}

async fn find_model(db: &DatabaseConnection, id: Uuid) -> BusinessResult<super::models::Model> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!(RESOURCE, id))
}

async fn with_ingredients(
    db: &DatabaseConnection,
    model: super::models::Model,
) -> BusinessResult<Recipe> {
    let lines = ingredients_of(db, model.id).await?;
    let mut recipe: Recipe = model.into();
    recipe.reagents = lines;
    Ok(recipe)
}

pub async fn get_recipe(db: &DatabaseConnection, id: Uuid) -> BusinessResult<Recipe> {
    let model = find_model(db, id).await?;
    with_ingredients(db, model).await
}

/// New recipes always start as drafts.
pub async fn create_recipe(
    db: &DatabaseConnection,
    create_data: RecipeCreate,
) -> BusinessResult<Recipe> {
    validate_name(&create_data.name)?;
    ensure_user(db, create_data.author_id).await?;

    let now = Utc::now();
    let inserted = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(create_data.name),
        description: Set(create_data.description.unwrap_or_default()),
        author_id: Set(create_data.author_id),
        status: Set(RecipeStatus::Draft),
        approved_at: Set(None),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(recipe_id = %inserted.id, author_id = ?inserted.author_id, "Created recipe");

    Ok(inserted.into())
}

pub async fn update_recipe(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: RecipeUpdate,
) -> BusinessResult<Recipe> {
    if let Some(Some(name)) = &update_data.name {
        validate_name(name)?;
    }
    if let Some(author_id) = update_data.author_id {
        ensure_user(db, author_id).await?;
    }

    let existing = find_model(db, id).await?.into_active_model();
    let updated = update_data
        .merge_into_activemodel(existing)
        .map_err(|e| e.to_business_error(RESOURCE))?
        .update(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    with_ingredients(db, updated).await
}

/// Moves a recipe to `status`, stamping `approved_at` on approval.
async fn transition(
    db: &DatabaseConnection,
    id: Uuid,
    status: RecipeStatus,
) -> BusinessResult<Recipe> {
    let recipe = find_model(db, id).await?;
    if status == RecipeStatus::Approved && recipe.status == RecipeStatus::Archived {
        return Err(crate::validation_error!(
            "status",
            "archived recipes cannot be approved"
        ));
    }

    let previous = recipe.status;
    let now = Utc::now();
    let mut active: ActiveModel = recipe.into();
    active.status = Set(status);
    if status == RecipeStatus::Approved {
        active.approved_at = Set(Some(now));
    }
    active.last_updated = Set(now);
    let updated = active
        .update(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(recipe_id = %id, from = ?previous, to = ?status, "Changed recipe status");

    with_ingredients(db, updated).await
}

pub async fn approve_recipe(db: &DatabaseConnection, id: Uuid) -> BusinessResult<Recipe> {
    transition(db, id, RecipeStatus::Approved).await
}

pub async fn archive_recipe(db: &DatabaseConnection, id: Uuid) -> BusinessResult<Recipe> {
    transition(db, id, RecipeStatus::Archived).await
}

/// Ingredient lines of one recipe, by reagent name.
pub async fn ingredients_of(
    db: &DatabaseConnection,
    recipe_id: Uuid,
) -> BusinessResult<Vec<RecipeIngredient>> {
    let lines = ingredients::Entity::find()
        .filter(ingredients::Column::RecipeId.eq(recipe_id))
        .all(db)
        .await
        .map_err(|e| e.to_business_error(INGREDIENT))?;

    let names: HashMap<Uuid, String> = reagents::Entity::find()
        .filter(reagents::Column::Id.is_in(lines.iter().map(|line| line.reagent_id)))
        .all(db)
        .await
        .map_err(|e| e.to_business_error("reagent"))?
        .into_iter()
        .map(|reagent| (reagent.id, reagent.name))
        .collect();

    let mut result: Vec<RecipeIngredient> = lines
        .into_iter()
        .map(|line| RecipeIngredient {
            id: line.id,
            reagent_name: names.get(&line.reagent_id).cloned(),
            reagent_id: line.reagent_id,
            quantity: line.quantity,
            unit: line.unit,
        })
        .collect();
    result.sort_by(|a, b| a.reagent_name.cmp(&b.reagent_name));
    Ok(result)
}

/// Adds a reagent line to a recipe. Each reagent appears at most once per recipe.
pub async fn add_ingredient(
    db: &DatabaseConnection,
    recipe_id: Uuid,
    request: AddIngredient,
) -> BusinessResult<RecipeIngredient> {
    if request.quantity <= Decimal::ZERO {
        return Err(crate::validation_error!("quantity", "must be greater than zero"));
    }
    validate_stock_amount("quantity", request.quantity)?;
    let unit: IngredientUnit = match request.unit.as_deref() {
        Some(unit) => unit
            .trim()
            .parse()
            .map_err(|message: String| crate::validation_error!("unit", message))?,
        None => IngredientUnit::Ml,
    };

    find_model(db, recipe_id).await?;
    let reagent = reagents::Entity::find_by_id(request.reagent_id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error("reagent"))?
        .ok_or_else(|| crate::not_found!("reagent", request.reagent_id))?;

    let already_listed = ingredients::Entity::find()
        .filter(ingredients::Column::RecipeId.eq(recipe_id))
        .filter(ingredients::Column::ReagentId.eq(reagent.id))
        .one(db)
        .await
        .map_err(|e| e.to_business_error(INGREDIENT))?;
    if already_listed.is_some() {
        return Err(duplicate_reagent());
    }

    let inserted = ingredients::ActiveModel {
        id: Set(Uuid::new_v4()),
        recipe_id: Set(recipe_id),
        reagent_id: Set(reagent.id),
        quantity: Set(request.quantity),
        unit: Set(unit),
    }
    .insert(db)
    .await
    .map_err(|e| match e.to_business_error(INGREDIENT) {
        BusinessError::Duplicate { .. } => duplicate_reagent(),
        other => other,
    })?;

    tracing::info!(%recipe_id, reagent_id = %reagent.id, "Added recipe ingredient");

    Ok(RecipeIngredient {
        id: inserted.id,
        reagent_id: inserted.reagent_id,
        reagent_name: Some(reagent.name),
        quantity: inserted.quantity,
        unit: inserted.unit,
    })
}

fn duplicate_reagent() -> BusinessError {
    BusinessError::Duplicate {
        resource: "recipe ingredient".to_string(),
        field: "reagent_id".to_string(),
    }
}

pub async fn remove_ingredient(
    db: &DatabaseConnection,
    recipe_id: Uuid,
    reagent_id: Uuid,
) -> BusinessResult<()> {
    let result = ingredients::Entity::delete_many()
        .filter(ingredients::Column::RecipeId.eq(recipe_id))
        .filter(ingredients::Column::ReagentId.eq(reagent_id))
        .exec(db)
        .await
        .map_err(|e| e.to_business_error(INGREDIENT))?;

    if result.rows_affected == 0 {
        return Err(crate::not_found!(INGREDIENT.replace('_', " "), reagent_id));
    }
    Ok(())
}

/// Referenced by cultures; checked before a culture points at a recipe.
pub async fn ensure_recipe(db: &DatabaseConnection, recipe_id: Option<Uuid>) -> BusinessResult<()> {
    match recipe_id {
        Some(id) => ensure_exists::<Entity, _>(db, id, RESOURCE).await,
        None => Ok(()),
    }
}
