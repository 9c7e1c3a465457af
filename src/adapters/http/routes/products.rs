use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    use_cases::catalog::ProductFilter,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

#[derive(Deserialize)]
struct ProductQuery {
    category: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
}

impl ProductQuery {
    // Non-numeric price parameters are ignored rather than rejected.
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            category: self.category,
            min_price: self.min_price.and_then(|v| v.parse().ok()),
            max_price: self.max_price.and_then(|v| v.parse().ok()),
        }
    }
}

async fn list_products(
    State(app_state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<impl IntoResponse> {
    let products = app_state
        .catalog_use_cases
        .list_products(&query.into_filter())
        .await?;
    Ok(Json(products))
}

async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let product = app_state.catalog_use_cases.get_product(id).await?;
    Ok(Json(product))
}
