use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::user::Entity as User;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique, indexed)]
    pub user_id: i32,
    pub phone: String,
    pub birth_date: Option<Date>,
    pub membership: Membership,
}

/// Membership tiers, stored and serialized as single-letter codes.
#[derive(Clone, Copy, PartialEq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "membership_enum",
    db_type = "String(StringLen::N(1))",
    rs_type = "String"
)]
pub enum Membership {
    #[sea_orm(string_value = "B")]
    #[serde(rename = "B")]
    Bronze,
    #[sea_orm(string_value = "S")]
    #[serde(rename = "S")]
    Silver,
    #[sea_orm(string_value = "G")]
    #[serde(rename = "G")]
    Gold,
}

impl FromStr for Membership {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" => Ok(Self::Bronze),
            "S" => Ok(Self::Silver),
            "G" => Ok(Self::Gold),
            _ => Err(format!("Invalid membership: {}", s)),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "User",
        from = "Column::UserId",
        to = "crate::entities::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<crate::entities::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
