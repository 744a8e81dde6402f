use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::entities::{product, product::Entity as ProductEntity};

/// Flat sales-tax multiplier applied to every listed price.
pub const TAX_MULTIPLIER: f64 = 1.1;

pub fn product_router() -> Router {
    Router::new()
        .route("/products", get(get_products))
        .route("/products/:id", get(get_product))
}

async fn get_products(
    Query(params): Query<ProductsQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    // page is 1-based; 0 would underflow the offset below.
    let page: u64 = params.page.unwrap_or(1).max(1);
    let page_size: u64 = params.page_size.unwrap_or(10);

    let mut finder = ProductEntity::find();

    if let Some(collection_id) = params.collection_id {
        finder = finder.filter(product::Column::CollectionId.eq(collection_id));
    }

    let result = finder
        .order_by_asc(product::Column::Id)
        .limit(page_size)
        .offset((page - 1) * page_size)
        .all(&*db)
        .await;

    match result {
        Ok(products) => {
            let response: Vec<ProductResponse> =
                products.into_iter().map(ProductResponse::new).collect();
            (StatusCode::OK, Json(response)).into_response()
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

async fn get_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = ProductEntity::find_by_id(id).one(&*db).await;

    match result {
        Ok(Some(product)) => (StatusCode::OK, Json(ProductResponse::new(product))).into_response(),
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

#[derive(Deserialize)]
struct ProductsQuery {
    collection_id: Option<i32>,
    page: Option<u64>,
    page_size: Option<u64>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub unit_price: f64,
    pub inventory: i32,
    pub price_with_tax: f64,
    pub collection_id: i32,
}

impl ProductResponse {
    pub fn new(value: product::Model) -> ProductResponse {
        ProductResponse {
            id: value.id,
            title: value.title,
            slug: value.slug,
            description: value.description,
            unit_price: value.unit_price,
            inventory: value.inventory,
            price_with_tax: value.unit_price * TAX_MULTIPLIER,
            collection_id: value.collection_id,
        }
    }
}

/// Trimmed product representation embedded in cart and order items.
#[derive(Serialize)]
pub struct BasicProductResponse {
    pub id: i32,
    pub title: String,
    pub unit_price: f64,
    pub collection_id: i32,
}
