use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::{collection, collection::Entity as CollectionEntity, product};

pub fn collection_router() -> Router {
    Router::new()
        .route("/collections", get(get_collections))
        .route("/collections/:id", get(get_collection))
}

async fn get_collections(Extension(db): Extension<Arc<DatabaseConnection>>) -> impl IntoResponse {
    let result = collections_with_count()
        .order_by_asc(collection::Column::Id)
        .into_model::<CollectionResponse>()
        .all(&*db)
        .await;

    match result {
        Ok(collections) => (StatusCode::OK, Json(collections)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

async fn get_collection(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let result = collections_with_count()
        .filter(collection::Column::Id.eq(id))
        .into_model::<CollectionResponse>()
        .one(&*db)
        .await;

    match result {
        Ok(Some(collection)) => (StatusCode::OK, Json(collection)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No collection with {} id was found.", id)
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

fn collections_with_count() -> sea_orm::Select<CollectionEntity> {
    CollectionEntity::find()
        .join(JoinType::LeftJoin, collection::Relation::Product.def())
        .select_only()
        .column(collection::Column::Id)
        .column(collection::Column::Title)
        .column_as(product::Column::Id.count(), "products_count")
        .group_by(collection::Column::Id)
        .group_by(collection::Column::Title)
}

#[derive(Serialize, FromQueryResult)]
struct CollectionResponse {
    id: i32,
    title: String,
    products_count: i64,
}
