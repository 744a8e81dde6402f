pub mod admin;
pub mod public;
pub mod user;

use axum::{middleware::from_fn, Extension, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use admin::admin_api_router;
use public::auth::auth_router;
use public::public_api_router;
use user::user_api_router;

use crate::middleware::logging::logging_middleware;

// Public reads, user routes and admin writes share resource paths;
// merging lets one path carry differently guarded methods. Guards are
// the Claims/AdminClaims extractors on the handlers themselves.
pub fn create_api_router(shared_db: Arc<DatabaseConnection>) -> Router {
    let api = Router::new()
        .merge(public_api_router())
        .merge(user_api_router())
        .merge(admin_api_router());

    Router::new()
        .merge(auth_router())
        .nest("/api", api)
        .layer(from_fn(logging_middleware))
        .layer(Extension(shared_db))
}
