use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::entities::collection::Entity as Collection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub unit_price: f64,
    pub inventory: i32,
    #[sea_orm(indexed)]
    pub collection_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Collection",
        from = "Column::CollectionId",
        to = "crate::entities::collection::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Collection,
    #[sea_orm(has_many = "crate::entities::review::Entity")]
    Review,
}

impl Related<crate::entities::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl Related<crate::entities::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
