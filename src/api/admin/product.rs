use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::api::public::product::ProductResponse;
use crate::entities::{collection, order_item, product, product::Entity as ProductEntity};
use crate::middleware::auth::AdminClaims;

pub fn admin_product_router() -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", patch(patch_product).delete(delete_product))
}

async fn create_product(
    AdminClaims(_claims): AdminClaims,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateProduct>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": errors
            })),
        )
            .into_response();
    }

    match collection::Entity::find_by_id(payload.collection_id).one(&*db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("No collection with {} id was found.", payload.collection_id)
                })),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    }

    let new_product = product::ActiveModel {
        title: Set(payload.title),
        slug: Set(payload.slug),
        description: Set(payload.description),
        unit_price: Set(payload.unit_price),
        inventory: Set(payload.inventory),
        collection_id: Set(payload.collection_id),
        ..Default::default()
    };

    match new_product.insert(&*db).await {
        Ok(product) => {
            (StatusCode::CREATED, Json(ProductResponse::new(product))).into_response()
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

async fn patch_product(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchProduct>,
) -> impl IntoResponse {
    let result = ProductEntity::find_by_id(id).one(&*db).await;

    match result {
        Ok(Some(product)) => {
            let mut product: product::ActiveModel = product.into();

            if let Some(title) = payload.title {
                product.title = Set(title);
            }
            if let Some(slug) = payload.slug {
                product.slug = Set(slug);
            }
            if let Some(description) = payload.description {
                product.description = Set(description);
            }
            if let Some(unit_price) = payload.unit_price {
                product.unit_price = Set(unit_price);
            }
            if let Some(inventory) = payload.inventory {
                product.inventory = Set(inventory);
            }
            if let Some(collection_id) = payload.collection_id {
                match collection::Entity::find_by_id(collection_id).one(&*db).await {
                    Ok(Some(_)) => product.collection_id = Set(collection_id),
                    Ok(None) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({
                                "error": format!("No collection with {} id was found.", collection_id)
                            })),
                        )
                            .into_response();
                    }
                    Err(_) => {
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({
                                "error": "Internal server error"
                            })),
                        )
                            .into_response();
                    }
                }
            }

            match product.update(&*db).await {
                Ok(product) => (StatusCode::OK, Json(ProductResponse::new(product))).into_response(),
                Err(_) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Failed to patch this resource"
                    })),
                )
                    .into_response(),
            }
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No product with {} id was found.", id)
            })),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

// A product that already appears on an order must stay, so the order
// history keeps its price snapshots resolvable.
async fn delete_product(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    let referenced = order_item::Entity::find()
        .filter(order_item::Column::ProductId.eq(id))
        .count(&txn)
        .await;

    match referenced {
        Ok(count) if count > 0 => {
            return (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({
                    "error": "Product cannot be deleted because it is associated with an order item."
                })),
            );
        }
        Ok(_) => {}
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    }

    match ProductEntity::find_by_id(id).one(&txn).await {
        Ok(Some(product)) => {
            let product: product::ActiveModel = product.into();
            match product.delete(&txn).await {
                Ok(_) => match txn.commit().await {
                    Ok(_) => (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Resource deleted successfully"
                        })),
                    ),
                    Err(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "error": "Internal server error"
                        })),
                    ),
                },
                Err(_) => {
                    let _ = txn.rollback().await;
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "error": "Failed to delete this resource"
                        })),
                    )
                }
            }
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No product with {} id was found.", id)
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
    }
}

#[derive(Deserialize, Clone, Debug, Validate)]
struct CreateProduct {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    title: String,
    #[validate(length(min = 1, message = "Slug must not be empty"))]
    slug: String,
    description: String,
    #[validate(range(min = 0.01, message = "Unit price must be positive"))]
    unit_price: f64,
    #[validate(range(min = 0, message = "Inventory must not be negative"))]
    inventory: i32,
    collection_id: i32,
}

#[derive(Deserialize)]
struct PatchProduct {
    title: Option<String>,
    slug: Option<String>,
    description: Option<String>,
    unit_price: Option<f64>,
    inventory: Option<i32>,
    collection_id: Option<i32>,
}
