pub mod api;
pub mod entities;
pub mod middleware;

pub use api::create_api_router;
pub use entities::{primary_setup, setup_schema};
