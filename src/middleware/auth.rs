use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{str::FromStr, sync::Arc};
use thiserror::Error;

use crate::entities::user::{Entity as UserEntity, Role};

/// Claims carried by a bearer token. Extracting this from a request
/// authenticates the caller: the token is decoded and the user is looked
/// up to confirm it still exists with the claimed role.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        Role::from_str(&self.role) == Ok(Role::Admin)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let db = parts
            .extensions
            .get::<Arc<DatabaseConnection>>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
            })?;

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => match header.strip_prefix("Bearer ") {
                Some(token) => token,
                None => return Err(unauthorized()),
            },
            None => return Err(unauthorized()),
        };

        match validate_token(db, token).await {
            Ok(claims) => Ok(claims),
            Err(AuthError::MissingSecret) | Err(AuthError::InternalServerError) => Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )),
            Err(_) => Err(unauthorized()),
        }
    }
}

/// Claims restricted to admin accounts. Non-admin tokens are rejected
/// with 403.
#[derive(Clone, Debug)]
pub struct AdminClaims(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AdminClaims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = Claims::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "Admin role required"
                })),
            ));
        }
        Ok(AdminClaims(claims))
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Invalid or missing token"
        })),
    )
}

pub async fn generate_token(user_id: i32, role: String) -> Result<String, AuthError> {
    let secret = get_secret_key()?;

    let exp = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or(AuthError::GenerationFail)?
        .timestamp() as usize;

    let claims = Claims { user_id, role, exp };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::GenerationFail)
}

pub async fn validate_token(
    db: Arc<DatabaseConnection>,
    token: &str,
) -> Result<Claims, AuthError> {
    let secret = get_secret_key()?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthError::TokenExpired)?;

    let claims = token_data.claims;
    let role = Role::from_str(&claims.role).map_err(|_| AuthError::ValidationFail)?;

    match UserEntity::find_by_id(claims.user_id).one(&*db).await {
        Ok(Some(user)) if user.role == role => Ok(claims),
        Ok(_) => Err(AuthError::InvalidUserOrRole),
        Err(_) => Err(AuthError::InternalServerError),
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid user id or role")]
    InvalidUserOrRole,
    #[error("Token expired")]
    TokenExpired,
    #[error("Failed to validate token")]
    ValidationFail,
    #[error("Failed to generate token")]
    GenerationFail,
    #[error("SECRET not found in environment")]
    MissingSecret,
    #[error("Internal server error")]
    InternalServerError,
}

fn get_secret_key() -> Result<String, AuthError> {
    dotenvy::dotenv().ok();
    std::env::var("SECRET").map_err(|_| AuthError::MissingSecret)
}
