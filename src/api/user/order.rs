use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::public::product::BasicProductResponse;
use crate::entities::{
    cart::Entity as CartEntity, cart_item, customer, customer::Entity as CustomerEntity, order,
    order::Entity as OrderEntity, order::PaymentStatus, order_item, product,
};
use crate::middleware::auth::Claims;
use crate::middleware::logging::{to_response, ApiError};

pub fn order_router() -> Router {
    Router::new()
        .route("/orders", get(get_orders).post(create_order))
        .route("/orders/:id", get(get_order))
}

async fn get_orders(
    claims: Claims,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let mut finder = OrderEntity::find();

    // Admins see every order; everyone else only their own.
    if !claims.is_admin() {
        let customer = match find_customer(&*db, claims.user_id).await {
            Ok(Some(customer)) => customer,
            Ok(None) => return no_profile(),
            Err(err) => return internal_error(err),
        };
        finder = finder.filter(order::Column::CustomerId.eq(customer.id));
    }

    let orders = match finder.order_by_asc(order::Column::Id).all(&*db).await {
        Ok(orders) => orders,
        Err(err) => return internal_error(err),
    };

    let mut response = Vec::new();
    for order in orders {
        let items = match load_items(order.id, &*db).await {
            Ok(items) => items,
            Err(err) => return internal_error(err),
        };
        response.push(OrderResponse::new(order, items));
    }

    to_response(Json(response), Ok(()))
}

async fn get_order(
    Path(id): Path<i32>,
    claims: Claims,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let mut finder = OrderEntity::find_by_id(id);

    if !claims.is_admin() {
        let customer = match find_customer(&*db, claims.user_id).await {
            Ok(Some(customer)) => customer,
            Ok(None) => return no_profile(),
            Err(err) => return internal_error(err),
        };
        finder = finder.filter(order::Column::CustomerId.eq(customer.id));
    }

    match finder.one(&*db).await {
        Ok(Some(order)) => match load_items(order.id, &*db).await {
            Ok(items) => to_response(Json(OrderResponse::new(order, items)), Ok(())),
            Err(err) => internal_error(err),
        },
        Ok(None) => {
            let tmp = format!("No order with {} id was found.", id);
            to_response(
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": tmp
                    })),
                ),
                Err(ApiError::General(tmp)),
            )
        }
        Err(err) => internal_error(err),
    }
}

// Converts a cart into an order: the order row, its items (with prices
// frozen at this moment) and the cart deletion commit atomically.
async fn create_order(
    claims: Claims,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateOrder>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                ),
                Err(ApiError::TransactionCreationFailed),
            );
        }
    };

    let customer = match find_customer(&txn, claims.user_id).await {
        Ok(Some(customer)) => customer,
        Ok(None) => return no_profile(),
        Err(err) => return internal_error(err),
    };

    match CartEntity::find_by_id(payload.cart_id).one(&txn).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let tmp = "No cart with the given ID was found.".to_owned();
            return to_response(
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": tmp
                    })),
                ),
                Err(ApiError::General(tmp)),
            );
        }
        Err(err) => return internal_error(err),
    }

    let cart_items = match cart_item::Entity::find()
        .filter(cart_item::Column::CartId.eq(payload.cart_id))
        .join(JoinType::InnerJoin, cart_item::Relation::Product.def())
        .select_only()
        .column_as(cart_item::Column::ProductId, "product_id")
        .column_as(cart_item::Column::Quantity, "quantity")
        .column_as(product::Column::UnitPrice, "unit_price")
        .into_model::<CartSnapshotRow>()
        .all(&txn)
        .await
    {
        Ok(items) => items,
        Err(err) => return internal_error(err),
    };

    if cart_items.is_empty() {
        let tmp = "The cart is empty.".to_owned();
        return to_response(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": tmp
                })),
            ),
            Err(ApiError::General(tmp)),
        );
    }

    let new_order = order::ActiveModel {
        customer_id: Set(customer.id),
        placed_at: Set(Utc::now()),
        payment_status: Set(PaymentStatus::Pending),
        ..Default::default()
    };

    let result = async {
        let order = new_order.insert(&txn).await?;

        let order_items: Vec<order_item::ActiveModel> = cart_items
            .iter()
            .map(|item| order_item::ActiveModel {
                order_id: Set(order.id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                ..Default::default()
            })
            .collect();
        order_item::Entity::insert_many(order_items).exec(&txn).await?;

        cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(payload.cart_id))
            .exec(&txn)
            .await?;
        CartEntity::delete_by_id(payload.cart_id).exec(&txn).await?;

        txn.commit().await?;
        Ok::<order::Model, DbErr>(order)
    }
    .await;

    match result {
        Ok(order) => match load_items(order.id, &*db).await {
            Ok(items) => to_response(
                (StatusCode::CREATED, Json(OrderResponse::new(order, items))),
                Ok(()),
            ),
            Err(err) => internal_error(err),
        },
        Err(err) => internal_error(err),
    }
}

async fn find_customer<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> Result<Option<customer::Model>, DbErr> {
    CustomerEntity::find()
        .filter(customer::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

async fn load_items<C: ConnectionTrait>(
    order_id: i32,
    conn: &C,
) -> Result<Vec<OrderItemResponse>, DbErr> {
    let rows = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .join(JoinType::InnerJoin, order_item::Relation::Product.def())
        .select_only()
        .column_as(order_item::Column::Id, "id")
        .column_as(order_item::Column::Quantity, "quantity")
        .column_as(order_item::Column::UnitPrice, "unit_price")
        .column_as(product::Column::Id, "product_id")
        .column_as(product::Column::Title, "product_title")
        .column_as(product::Column::UnitPrice, "product_unit_price")
        .column_as(product::Column::CollectionId, "product_collection_id")
        .order_by_asc(order_item::Column::Id)
        .into_model::<OrderItemRow>()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| OrderItemResponse {
            id: row.id,
            product: BasicProductResponse {
                id: row.product_id,
                title: row.product_title,
                unit_price: row.product_unit_price,
                collection_id: row.product_collection_id,
            },
            unit_price: row.unit_price,
            quantity: row.quantity,
        })
        .collect())
}

fn no_profile() -> Response {
    let tmp = "No customer profile was found for this account.".to_owned();
    to_response(
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": tmp
            })),
        ),
        Err(ApiError::General(tmp)),
    )
}

fn internal_error(err: DbErr) -> Response {
    to_response(
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
        Err(ApiError::DbError(err.to_string())),
    )
}

#[derive(Deserialize, Debug)]
struct CreateOrder {
    cart_id: Uuid,
}

#[derive(Debug, FromQueryResult)]
struct CartSnapshotRow {
    product_id: i32,
    quantity: i32,
    unit_price: f64,
}

#[derive(Debug, FromQueryResult)]
struct OrderItemRow {
    id: i32,
    quantity: i32,
    unit_price: f64,
    product_id: i32,
    product_title: String,
    product_unit_price: f64,
    product_collection_id: i32,
}

#[derive(Serialize)]
struct OrderItemResponse {
    id: i32,
    product: BasicProductResponse,
    unit_price: f64,
    quantity: i32,
}

#[derive(Serialize)]
struct OrderResponse {
    id: i32,
    customer_id: i32,
    placed_at: chrono::DateTime<Utc>,
    payment_status: PaymentStatus,
    items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    fn new(order: order::Model, items: Vec<OrderItemResponse>) -> OrderResponse {
        OrderResponse {
            id: order.id,
            customer_id: order.customer_id,
            placed_at: order.placed_at,
            payment_status: order.payment_status,
            items,
        }
    }
}
