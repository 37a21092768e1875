use chrono::{DateTime, Utc};
use crudcrate::EntityToModels;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, entity::prelude::*};
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, ToSchema, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum RecipeStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "archived")]
    Archived,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "recipes")]
#[crudcrate(
    api_struct = "Recipe",
    name_singular = "recipe",
    name_plural = "recipes",
    description = "Media and buffer recipes. A recipe starts as a draft, lists the reagents it consumes and is approved before use.",
    fn_get_one = get_one_recipe,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable, fulltext)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    #[crudcrate(fulltext, on_create = String::new())]
    pub description: String,
    #[crudcrate(sortable, filterable)]
    pub author_id: Option<Uuid>,
    #[crudcrate(sortable, filterable, enum_field, update_model = false, create_model = false, on_create = RecipeStatus::Draft)]
    pub status: RecipeStatus,
    #[crudcrate(sortable, update_model = false, create_model = false)]
    pub approved_at: Option<DateTime<Utc>>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = vec![], list_model = false, create_model = false, update_model = false)]
    pub reagents: Vec<RecipeIngredient>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::AuthorId",
        to = "crate::users::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Author,
    #[sea_orm(has_many = "super::ingredients::Entity")]
    Ingredients,
}

impl Related<super::ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, ToSchema, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum IngredientUnit {
    #[sea_orm(string_value = "ml")]
    Ml,
    #[sea_orm(string_value = "g")]
    G,
    #[sea_orm(string_value = "mg")]
    Mg,
    #[sea_orm(string_value = "ul")]
    Ul,
    #[sea_orm(string_value = "units")]
    Units,
}

impl FromStr for IngredientUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ml" => Ok(IngredientUnit::Ml),
            "g" => Ok(IngredientUnit::G),
            "mg" => Ok(IngredientUnit::Mg),
            "ul" => Ok(IngredientUnit::Ul),
            "units" => Ok(IngredientUnit::Units),
            other => Err(format!("must be one of ml, g, mg, ul, units; got '{other}'")),
        }
    }
}

/// One reagent line of a recipe, with the reagent's name for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub reagent_id: Uuid,
    pub reagent_name: Option<String>,
    pub quantity: Decimal,
    pub unit: IngredientUnit,
}

/// Body of `POST /recipes/{id}/reagents`. `unit` defaults to millilitres.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddIngredient {
    pub reagent_id: Uuid,
    pub quantity: Decimal,
    #[schema(example = "ml")]
    #[serde(default)]
    pub unit: Option<String>,
}

async fn get_one_recipe(db: &DatabaseConnection, id: Uuid) -> Result<Recipe, DbErr> {
    super::services::get_recipe(db, id)
        .await
        .map_err(DbErr::from)
}
