use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::entities::{customer, user, user::Entity as UserEntity, user::Role};
use crate::middleware::auth::generate_token;

pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login))
}

// Registration also creates the customer profile, so every account can
// place orders right away.
async fn register_user(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<RegisterUser>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": errors
            })),
        );
    }

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

    let password = match hash_password(&payload.password) {
        Ok(password) => password,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    let new_user = user::ActiveModel {
        username: Set(payload.username),
        password: Set(password),
        role: Set(Role::User),
        ..Default::default()
    };

    let user = match new_user.insert(&txn).await {
        Ok(user) => user,
        Err(_) => {
            let _ = txn.rollback().await;
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Username already exists"
                })),
            );
        }
    };

    let profile = customer::ActiveModel {
        user_id: Set(user.id),
        phone: Set(payload.phone.unwrap_or_default()),
        birth_date: Set(None),
        membership: Set(customer::Membership::Bronze),
        ..Default::default()
    };

    match profile.insert(&txn).await {
        Ok(_) => match txn.commit().await {
            Ok(_) => (
                StatusCode::CREATED,
                Json(json!({
                    "message": "User registered successfully"
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
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
        }
    }
}

async fn login(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<UserLogin>,
) -> impl IntoResponse {
    let result = UserEntity::find()
        .filter(user::Column::Username.eq(&*payload.username))
        .one(&*db)
        .await;

    match result {
        Ok(Some(model)) => match model.check_hash(&payload.password) {
            Ok(()) => match generate_token(model.id, model.role.to_string()).await {
                Ok(token) => (
                    StatusCode::OK,
                    Json(json!({
                        "token": token
                    })),
                ),
                Err(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                ),
            },
            Err(_) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Invalid username or password"
                })),
            ),
        },
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid username or password"
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

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?.to_string();

    Ok(password_hash)
}

#[derive(Deserialize, Clone, Debug, Validate)]
struct RegisterUser {
    #[validate(length(min = 3, max = 30, message = "Username must be 3 to 30 characters long"))]
    username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    password: String,
    phone: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct UserLogin {
    username: String,
    password: String,
}
