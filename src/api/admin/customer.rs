use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::{
    customer, customer::Entity as CustomerEntity, customer::Membership, user,
};
use crate::middleware::auth::AdminClaims;

pub fn admin_customer_router() -> Router {
    Router::new()
        .route("/customers", get(get_customers).post(create_customer))
        .route(
            "/customers/:id",
            get(get_customer)
                .patch(patch_customer)
                .delete(delete_customer),
        )
}

async fn get_customers(
    AdminClaims(_claims): AdminClaims,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = CustomerEntity::find()
        .order_by_asc(customer::Column::Id)
        .all(&*db)
        .await;

    match result {
        Ok(customers) => (StatusCode::OK, Json(customers)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

async fn create_customer(
    AdminClaims(_claims): AdminClaims,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateCustomer>,
) -> impl IntoResponse {
    match user::Entity::find_by_id(payload.user_id).one(&*db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("No user with {} id was found.", payload.user_id)
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

    let new_customer = customer::ActiveModel {
        user_id: Set(payload.user_id),
        phone: Set(payload.phone),
        birth_date: Set(payload.birth_date),
        membership: Set(payload.membership.unwrap_or(Membership::Bronze)),
        ..Default::default()
    };

    match new_customer.insert(&*db).await {
        Ok(customer) => (StatusCode::CREATED, Json(customer)).into_response(),
        Err(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "This user already has a customer profile"
            })),
        )
            .into_response(),
    }
}

async fn get_customer(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = CustomerEntity::find_by_id(id).one(&*db).await;

    match result {
        Ok(Some(customer)) => (StatusCode::OK, Json(customer)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No customer with {} id was found.", id)
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

async fn patch_customer(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchCustomer>,
) -> impl IntoResponse {
    let result = CustomerEntity::find_by_id(id).one(&*db).await;

    match result {
        Ok(Some(customer)) => {
            let mut customer: customer::ActiveModel = customer.into();

            if let Some(phone) = payload.phone {
                customer.phone = Set(phone);
            }
            if let Some(birth_date) = payload.birth_date {
                customer.birth_date = Set(Some(birth_date));
            }
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
                "error": format!("No customer with {} id was found.", id)
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

async fn delete_customer(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = CustomerEntity::find_by_id(id).one(&*db).await;

    match result {
        Ok(Some(customer)) => {
            let customer: customer::ActiveModel = customer.into();
            match customer.delete(&*db).await {
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
                "error": format!("No customer with {} id was found.", id)
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

#[derive(Deserialize, Clone, Debug)]
struct CreateCustomer {
    user_id: i32,
    phone: String,
    birth_date: Option<chrono::NaiveDate>,
    membership: Option<Membership>,
}

#[derive(Deserialize)]
struct PatchCustomer {
    phone: Option<String>,
    birth_date: Option<chrono::NaiveDate>,
    membership: Option<Membership>,
}
