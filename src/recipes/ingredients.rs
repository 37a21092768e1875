use super::models::IngredientUnit;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// Quantity of one reagent consumed by a recipe. A reagent appears at most once per recipe.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipe_reagents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub reagent_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity: Decimal,
    pub unit: IngredientUnit,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::models::Entity",
        from = "Column::RecipeId",
        to = "super::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Recipe,
    #[sea_orm(
        belongs_to = "crate::reagents::models::Entity",
        from = "Column::ReagentId",
        to = "crate::reagents::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Reagent,
}

impl Related<super::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
