pub mod collection;
pub mod customer;
pub mod order;
pub mod product;

use axum::Router;

use collection::admin_collection_router;
use customer::admin_customer_router;
use order::admin_order_router;
use product::admin_product_router;

pub fn admin_api_router() -> Router {
    Router::new()
        .merge(admin_collection_router())
        .merge(admin_product_router())
        .merge(admin_customer_router())
        .merge(admin_order_router())
}
