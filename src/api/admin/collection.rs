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

use crate::entities::{collection, collection::Entity as CollectionEntity, product};
use crate::middleware::auth::AdminClaims;

pub fn admin_collection_router() -> Router {
    Router::new()
        .route("/collections", post(create_collection))
        .route(
            "/collections/:id",
            patch(patch_collection).delete(delete_collection),
        )
}

async fn create_collection(
    AdminClaims(_claims): AdminClaims,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateCollection>,
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

    let new_collection = collection::ActiveModel {
        title: Set(payload.title),
        ..Default::default()
    };

    match new_collection.insert(&*db).await {
        Ok(collection) => (StatusCode::CREATED, Json(collection)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

async fn patch_collection(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchCollection>,
) -> impl IntoResponse {
    let result = CollectionEntity::find_by_id(id).one(&*db).await;

    match result {
        Ok(Some(collection)) => {
            let mut collection: collection::ActiveModel = collection.into();

            if let Some(title) = payload.title {
                collection.title = Set(title);
            }

            match collection.update(&*db).await {
                Ok(collection) => (StatusCode::OK, Json(collection)).into_response(),
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
                "error": format!("No collection with {} id was found.", id)
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

async fn delete_collection(
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

    let referenced = product::Entity::find()
        .filter(product::Column::CollectionId.eq(id))
        .count(&txn)
        .await;

    match referenced {
        Ok(count) if count > 0 => {
            return (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({
                    "error": "Collection cannot be deleted because it includes one or more products."
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

    match CollectionEntity::find_by_id(id).one(&txn).await {
        Ok(Some(collection)) => {
            let collection: collection::ActiveModel = collection.into();
            match collection.delete(&txn).await {
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
                "error": format!("No collection with {} id was found.", id)
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
struct CreateCollection {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    title: String,
}

#[derive(Deserialize)]
struct PatchCollection {
    title: Option<String>,
}
