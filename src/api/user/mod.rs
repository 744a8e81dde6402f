pub mod customer;
pub mod order;

use axum::Router;

use customer::customer_router;
use order::order_router;

pub fn user_api_router() -> Router {
    Router::new().merge(customer_router()).merge(order_router())
}
