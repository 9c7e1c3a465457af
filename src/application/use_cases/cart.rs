use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::catalog::ProductRepo;

/// Cart line joined with the product it refers to.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartItemView {
    pub id: i64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub product_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

#[async_trait]
pub trait CartRepo: Send + Sync {
    /// Returns (line id, quantity) for the user's existing line, if any.
    async fn find_line(&self, user_id: i64, product_id: i64) -> AppResult<Option<(i64, i32)>>;
    async fn insert_line(&self, user_id: i64, product_id: i64, quantity: i32) -> AppResult<()>;
    async fn update_quantity(&self, line_id: i64, quantity: i32) -> AppResult<()>;
    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<CartItemView>>;
    /// Returns (product stock) for a line owned by the user, if it exists.
    async fn get_line_stock(&self, line_id: i64, user_id: i64) -> AppResult<Option<i32>>;
    async fn line_belongs_to_user(&self, line_id: i64, user_id: i64) -> AppResult<bool>;
    async fn delete_line(&self, line_id: i64) -> AppResult<()>;
}

/// Whether an add-to-cart created a new line or bumped an existing one.
pub enum CartMutation {
    Added,
    Updated,
}

pub struct CartUseCases {
    cart_repo: Arc<dyn CartRepo>,
    product_repo: Arc<dyn ProductRepo>,
}

impl CartUseCases {
    pub fn new(cart_repo: Arc<dyn CartRepo>, product_repo: Arc<dyn ProductRepo>) -> Self {
        Self {
            cart_repo,
            product_repo,
        }
    }

    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> AppResult<CartMutation> {
        let product = self
            .product_repo
            .get(product_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if product.stock_quantity < quantity {
            return Err(AppError::InvalidInput("Insufficient stock".into()));
        }

        match self.cart_repo.find_line(user_id, product_id).await? {
            Some((line_id, existing_quantity)) => {
                let new_quantity = existing_quantity + quantity;
                if product.stock_quantity < new_quantity {
                    return Err(AppError::InvalidInput(
                        "Insufficient stock for requested quantity".into(),
                    ));
                }
                self.cart_repo.update_quantity(line_id, new_quantity).await?;
                Ok(CartMutation::Updated)
            }
            None => {
                self.cart_repo
                    .insert_line(user_id, product_id, quantity)
                    .await?;
                Ok(CartMutation::Added)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self, user_id: i64) -> AppResult<Vec<CartItemView>> {
        self.cart_repo.list_for_user(user_id).await
    }

    #[instrument(skip(self))]
    pub async fn update_item(&self, user_id: i64, line_id: i64, quantity: i32) -> AppResult<()> {
        let stock = self
            .cart_repo
            .get_line_stock(line_id, user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if stock < quantity {
            return Err(AppError::InvalidInput("Insufficient stock".into()));
        }

        self.cart_repo.update_quantity(line_id, quantity).await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: i64, line_id: i64) -> AppResult<()> {
        if !self.cart_repo.line_belongs_to_user(line_id, user_id).await? {
            return Err(AppError::NotFound);
        }
        self.cart_repo.delete_line(line_id).await
    }
}
