use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::{customer, customer::Entity as CustomerEntity, customer::Membership};
use crate::middleware::auth::Claims;

pub fn customer_router() -> Router {
    Router::new().route("/customers/me", get(get_me).put(put_me))
}

async fn get_me(
    claims: Claims,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = CustomerEntity::find()
        .filter(customer::Column::UserId.eq(claims.user_id))
        .one(&*db)
        .await;

    match result {
        Ok(Some(customer)) => (StatusCode::OK, Json(customer)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "No customer profile was found for this account."
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

async fn put_me(
    claims: Claims,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<UpdateProfile>,
) -> impl IntoResponse {
    let result = CustomerEntity::find()
        .filter(customer::Column::UserId.eq(claims.user_id))
        .one(&*db)
        .await;

    match result {
        Ok(Some(customer)) => {
            let mut customer: customer::ActiveModel = customer.into();
            customer.phone = Set(payload.phone);
            customer.birth_date = Set(payload.birth_date);
            if let Some(membership) = payload.membership {
                customer.membership = Set(membership);
            }

            match customer.update(&*db).await {
                Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
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
                "error": "No customer profile was found for this account."
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
struct UpdateProfile {
    phone: String,
    birth_date: Option<chrono::NaiveDate>,
    membership: Option<Membership>,
}
