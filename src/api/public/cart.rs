use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{get, post},
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
use validator::Validate;

use crate::api::public::product::BasicProductResponse;
use crate::entities::{cart, cart::Entity as CartEntity, cart_item, product};
use crate::middleware::logging::{to_response, ApiError};

pub fn cart_router() -> Router {
    Router::new()
        .route("/carts", post(create_cart))
        .route("/carts/:id", get(get_cart).delete(delete_cart))
        .route("/carts/:id/items", get(get_items).post(add_item))
        .route(
            "/carts/:id/items/:item_id",
            get(get_item).patch(patch_item).delete(delete_item),
        )
}

async fn create_cart(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    let new_cart = cart::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(Utc::now()),
    };

    match new_cart.insert(&*db).await {
        Ok(cart) => to_response(
            (
                StatusCode::CREATED,
                Json(json!(CartResponse {
                    id: cart.id,
                    items: vec![],
                    total_price: 0.0,
                })),
            ),
            Ok(()),
        ),
        Err(err) => internal_error(err),
    }
}

async fn get_cart(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let cart = match CartEntity::find_by_id(id).one(&*db).await {
        Ok(Some(cart)) => cart,
        Ok(None) => return cart_not_found(id),
        Err(err) => return internal_error(err),
    };

    let items = match load_items(id, &*db).await {
        Ok(items) => items,
        Err(err) => return internal_error(err),
    };

    let total_price = items.iter().map(|item| item.total_price).sum();

    to_response(
        Json(CartResponse {
            id: cart.id,
            items,
            total_price,
        }),
        Ok(()),
    )
}

async fn delete_cart(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
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

    let cart = match CartEntity::find_by_id(id).one(&txn).await {
        Ok(Some(cart)) => cart,
        Ok(None) => return cart_not_found(id),
        Err(err) => return internal_error(err),
    };

    let result = async {
        cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(id))
            .exec(&txn)
            .await?;
        let cart: cart::ActiveModel = cart.into();
        cart.delete(&txn).await?;
        txn.commit().await
    }
    .await;

    match result {
        Ok(_) => to_response(
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Resource deleted successfully"
                })),
            ),
            Ok(()),
        ),
        Err(err) => internal_error(err),
    }
}

async fn get_items(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    match CartEntity::find_by_id(id).one(&*db).await {
        Ok(Some(_)) => {}
        Ok(None) => return cart_not_found(id),
        Err(err) => return internal_error(err),
    }

    match load_items(id, &*db).await {
        Ok(items) => to_response(Json(items), Ok(())),
        Err(err) => internal_error(err),
    }
}

async fn get_item(
    Path((id, item_id)): Path<(Uuid, i32)>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let result = load_items(id, &*db).await;

    match result {
        Ok(items) => match items.into_iter().find(|item| item.id == item_id) {
            Some(item) => to_response(Json(item), Ok(())),
            None => item_not_found(item_id),
        },
        Err(err) => internal_error(err),
    }
}

// Adding a product that is already in the cart merges into the existing
// row instead of creating a duplicate.
async fn add_item(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<AddCartItem>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return to_response(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": errors
                })),
            ),
            Err(ApiError::ValidationFail("Invalid cart item payload".into())),
        );
    }

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

    match CartEntity::find_by_id(id).one(&txn).await {
        Ok(Some(_)) => {}
        Ok(None) => return cart_not_found(id),
        Err(err) => return internal_error(err),
    }

    let product = match product::Entity::find_by_id(payload.product_id).one(&txn).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            let tmp = "No product with the given ID was found.".to_owned();
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
    };

    let existing = cart_item::Entity::find()
        .filter(cart_item::Column::CartId.eq(id))
        .filter(cart_item::Column::ProductId.eq(payload.product_id))
        .one(&txn)
        .await;

    let saved = match existing {
        Ok(Some(entry)) => {
            let quantity = entry.quantity + payload.quantity;
            let mut entry: cart_item::ActiveModel = entry.into();
            entry.quantity = Set(quantity);
            entry.update(&txn).await
        }
        Ok(None) => {
            let new_entry = cart_item::ActiveModel {
                cart_id: Set(id),
                product_id: Set(payload.product_id),
                quantity: Set(payload.quantity),
                ..Default::default()
            };
            new_entry.insert(&txn).await
        }
        Err(err) => return internal_error(err),
    };

    match saved {
        Ok(entry) => match txn.commit().await {
            Ok(_) => {
                let total_price = product.unit_price * entry.quantity as f64;
                to_response(
                    (
                        StatusCode::CREATED,
                        Json(json!(CartItemResponse {
                            id: entry.id,
                            product: BasicProductResponse {
                                id: product.id,
                                title: product.title,
                                unit_price: product.unit_price,
                                collection_id: product.collection_id,
                            },
                            quantity: entry.quantity,
                            total_price,
                        })),
                    ),
                    Ok(()),
                )
            }
            Err(err) => internal_error(err),
        },
        Err(err) => {
            let _ = txn.rollback().await;
            internal_error(err)
        }
    }
}

async fn patch_item(
    Path((id, item_id)): Path<(Uuid, i32)>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchCartItem>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return to_response(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": errors
                })),
            ),
            Err(ApiError::ValidationFail("Invalid cart item payload".into())),
        );
    }

    let result = cart_item::Entity::find_by_id(item_id)
        .filter(cart_item::Column::CartId.eq(id))
        .one(&*db)
        .await;

    match result {
        Ok(Some(entry)) => {
            let mut entry: cart_item::ActiveModel = entry.into();
            entry.quantity = Set(payload.quantity);
            match entry.update(&*db).await {
                Ok(_) => to_response(
                    (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Resource patched successfully"
                        })),
                    ),
                    Ok(()),
                ),
                Err(err) => internal_error(err),
            }
        }
        Ok(None) => item_not_found(item_id),
        Err(err) => internal_error(err),
    }
}

async fn delete_item(
    Path((id, item_id)): Path<(Uuid, i32)>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let result = cart_item::Entity::find_by_id(item_id)
        .filter(cart_item::Column::CartId.eq(id))
        .one(&*db)
        .await;

    match result {
        Ok(Some(entry)) => {
            let entry: cart_item::ActiveModel = entry.into();
            match entry.delete(&*db).await {
                Ok(_) => to_response(
                    (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Resource deleted successfully"
                        })),
                    ),
                    Ok(()),
                ),
                Err(err) => internal_error(err),
            }
        }
        Ok(None) => item_not_found(item_id),
        Err(err) => internal_error(err),
    }
}

async fn load_items<C: ConnectionTrait>(
    cart_id: Uuid,
    conn: &C,
) -> Result<Vec<CartItemResponse>, DbErr> {
    let rows = cart_item::Entity::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .join(JoinType::InnerJoin, cart_item::Relation::Product.def())
        .select_only()
        .column_as(cart_item::Column::Id, "id")
        .column_as(cart_item::Column::Quantity, "quantity")
        .column_as(product::Column::Id, "product_id")
        .column_as(product::Column::Title, "product_title")
        .column_as(product::Column::UnitPrice, "product_unit_price")
        .column_as(product::Column::CollectionId, "product_collection_id")
        .order_by_asc(cart_item::Column::Id)
        .into_model::<CartItemRow>()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| CartItemResponse {
            id: row.id,
            product: BasicProductResponse {
                id: row.product_id,
                title: row.product_title,
                unit_price: row.product_unit_price,
                collection_id: row.product_collection_id,
            },
            quantity: row.quantity,
            total_price: row.product_unit_price * row.quantity as f64,
        })
        .collect())
}

fn cart_not_found(id: Uuid) -> Response {
    let tmp = format!("No cart with {} id was found.", id);
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

fn item_not_found(item_id: i32) -> Response {
    let tmp = format!("No cart item with {} id was found.", item_id);
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

#[derive(Deserialize, Debug, Validate)]
struct AddCartItem {
    product_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    quantity: i32,
}

#[derive(Deserialize, Validate)]
struct PatchCartItem {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    quantity: i32,
}

#[derive(Debug, FromQueryResult)]
struct CartItemRow {
    id: i32,
    quantity: i32,
    product_id: i32,
    product_title: String,
    product_unit_price: f64,
    product_collection_id: i32,
}

#[derive(Serialize)]
pub struct CartItemResponse {
    pub id: i32,
    pub product: BasicProductResponse,
    pub quantity: i32,
    pub total_price: f64,
}

#[derive(Serialize)]
struct CartResponse {
    id: Uuid,
    items: Vec<CartItemResponse>,
    total_price: f64,
}
