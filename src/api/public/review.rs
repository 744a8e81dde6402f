use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::entities::{product, review, review::Entity as ReviewEntity};

pub fn review_router() -> Router {
    Router::new()
        .route("/products/:id/reviews", get(get_reviews).post(create_review))
        .route(
            "/products/:id/reviews/:review_id",
            get(get_review).patch(patch_review).delete(delete_review),
        )
}

async fn get_reviews(
    Path(product_id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = ReviewEntity::find()
        .filter(review::Column::ProductId.eq(product_id))
        .order_by_asc(review::Column::Id)
        .all(&*db)
        .await;

    match result {
        Ok(reviews) => (StatusCode::OK, Json(reviews)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

async fn create_review(
    Path(product_id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateReview>,
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

    match product::Entity::find_by_id(product_id).one(&*db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": format!("No product with {} id was found.", product_id)
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

    let new_review = review::ActiveModel {
        product_id: Set(product_id),
        name: Set(payload.name),
        description: Set(payload.description),
        date: Set(chrono::Utc::now().date_naive()),
        ..Default::default()
    };

    match new_review.insert(&*db).await {
        Ok(review) => (StatusCode::CREATED, Json(review)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

async fn get_review(
    Path((product_id, review_id)): Path<(i32, i32)>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = ReviewEntity::find_by_id(review_id)
        .filter(review::Column::ProductId.eq(product_id))
        .one(&*db)
        .await;

    match result {
        Ok(Some(review)) => (StatusCode::OK, Json(review)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No review with {} id was found.", review_id)
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

async fn patch_review(
    Path((product_id, review_id)): Path<(i32, i32)>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchReview>,
) -> impl IntoResponse {
    let result = ReviewEntity::find_by_id(review_id)
        .filter(review::Column::ProductId.eq(product_id))
        .one(&*db)
        .await;

    match result {
        Ok(Some(review)) => {
            let mut review: review::ActiveModel = review.into();

            if let Some(name) = payload.name {
                review.name = Set(name);
            }
            if let Some(description) = payload.description {
                review.description = Set(description);
            }

            match review.update(&*db).await {
                Ok(review) => (StatusCode::OK, Json(review)).into_response(),
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
                "error": format!("No review with {} id was found.", review_id)
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

async fn delete_review(
    Path((product_id, review_id)): Path<(i32, i32)>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = ReviewEntity::find_by_id(review_id)
        .filter(review::Column::ProductId.eq(product_id))
        .one(&*db)
        .await;

    match result {
        Ok(Some(review)) => {
            let review: review::ActiveModel = review.into();
            match review.delete(&*db).await {
                Ok(_) => (
                    StatusCode::OK,
                    Json(json!({
                        "message": "Resource deleted successfully"
                    })),
                )
                    .into_response(),
                Err(_) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Failed to delete this resource"
                    })),
                )
                    .into_response(),
            }
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No review with {} id was found.", review_id)
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

#[derive(Deserialize, Clone, Debug, Validate)]
struct CreateReview {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    name: String,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    description: String,
}

#[derive(Deserialize)]
struct PatchReview {
    name: Option<String>,
    description: Option<String>,
}
