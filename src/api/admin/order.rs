use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::patch,
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::{order, order::Entity as OrderEntity, order::PaymentStatus, order_item};
use crate::middleware::auth::AdminClaims;

pub fn admin_order_router() -> Router {
    Router::new().route("/orders/:id", patch(patch_order).delete(delete_order))
}

async fn patch_order(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchOrder>,
) -> impl IntoResponse {
    let result = OrderEntity::find_by_id(id).one(&*db).await;

    match result {
        Ok(Some(order)) => {
            let mut order: order::ActiveModel = order.into();
            order.payment_status = Set(payload.payment_status);

            match order.update(&*db).await {
                Ok(order) => (StatusCode::OK, Json(order)).into_response(),
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
                "error": format!("No order with {} id was found.", id)
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

async fn delete_order(
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

    match OrderEntity::find_by_id(id).one(&txn).await {
        Ok(Some(order)) => {
            let result = async {
                order_item::Entity::delete_many()
                    .filter(order_item::Column::OrderId.eq(id))
                    .exec(&txn)
                    .await?;
                let order: order::ActiveModel = order.into();
                order.delete(&txn).await?;
                txn.commit().await
            }
            .await;

            match result {
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
            }
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No order with {} id was found.", id)
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

#[derive(Deserialize)]
struct PatchOrder {
    payment_status: PaymentStatus,
}
