use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use serde::Deserialize;

use crate::{
    adapters::http::{app_state::AppState, middleware::AuthUser},
    app_error::{AppError, AppResult},
    use_cases::cart::CartMutation,
};

pub fn router() -> Router<AppState> {
    // GET takes a user id in the path (checked against the caller); PUT and
    // DELETE take a cart line id.
    Router::new()
        .route("/", post(add_item))
        .route("/{id}", put(update_item).delete(remove_item).get(list_items))
}

#[derive(Deserialize)]
struct AddItemPayload {
    #[serde(rename = "productId")]
    product_id: Option<i64>,
    quantity: Option<i32>,
}

#[derive(Deserialize)]
struct UpdateItemPayload {
    quantity: Option<i32>,
}

async fn add_item(
    State(app_state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<AddItemPayload>,
) -> AppResult<impl IntoResponse> {
    let (Some(product_id), Some(quantity)) = (payload.product_id, payload.quantity) else {
        return Err(AppError::InvalidInput(
            "Product ID and valid quantity are required".into(),
        ));
    };
    if quantity <= 0 {
        return Err(AppError::InvalidInput(
            "Product ID and valid quantity are required".into(),
        ));
    }

    let mutation = app_state
        .cart_use_cases
        .add_item(auth_user.user_id, product_id, quantity)
        .await?;

    Ok(match mutation {
        CartMutation::Added => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "message": "Item added to cart successfully" })),
        ),
        CartMutation::Updated => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Cart item updated successfully" })),
        ),
    })
}

async fn list_items(
    State(app_state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    // A user may only read their own cart.
    if user_id != auth_user.user_id {
        return Err(AppError::Forbidden("Access denied".into()));
    }

    let items = app_state.cart_use_cases.list_items(user_id).await?;
    Ok(Json(items))
}

async fn update_item(
    State(app_state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(line_id): Path<i64>,
    Json(payload): Json<UpdateItemPayload>,
) -> AppResult<impl IntoResponse> {
    let quantity = payload
        .quantity
        .filter(|q| *q > 0)
        .ok_or_else(|| AppError::InvalidInput("Valid quantity is required".into()))?;

    app_state
        .cart_use_cases
        .update_item(auth_user.user_id, line_id, quantity)
        .await?;

    Ok(Json(
        serde_json::json!({ "message": "Cart item updated successfully" }),
    ))
}

async fn remove_item(
    State(app_state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(line_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    app_state
        .cart_use_cases
        .remove_item(auth_user.user_id, line_id)
        .await?;

    Ok(Json(
        serde_json::json!({ "message": "Item removed from cart successfully" }),
    ))
}
