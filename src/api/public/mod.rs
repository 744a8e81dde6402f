pub mod auth;
pub mod cart;
pub mod collection;
pub mod product;
pub mod review;

use axum::Router;

use cart::cart_router;
use collection::collection_router;
use product::product_router;
use review::review_router;

pub fn public_api_router() -> Router {
    Router::new()
        .merge(collection_router())
        .merge(product_router())
        .merge(review_router())
        .merge(cart_router())
}
