use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::customer::Entity as Customer;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub customer_id: i32,
    pub placed_at: DateTimeUtc,
    pub payment_status: PaymentStatus,
}

#[derive(Clone, Copy, PartialEq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "payment_status_enum",
    db_type = "String(StringLen::N(1))",
    rs_type = "String"
)]
pub enum PaymentStatus {
    #[sea_orm(string_value = "P")]
    #[serde(rename = "P")]
    Pending,
    #[sea_orm(string_value = "C")]
    #[serde(rename = "C")]
    Complete,
    #[sea_orm(string_value = "F")]
    #[serde(rename = "F")]
    Failed,
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" => Ok(Self::Pending),
            "C" => Ok(Self::Complete),
            "F" => Ok(Self::Failed),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Customer",
        from = "Column::CustomerId",
        to = "crate::entities::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(has_many = "crate::entities::order_item::Entity")]
    OrderItem,
}

impl Related<crate::entities::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<crate::entities::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
