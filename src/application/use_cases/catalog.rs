use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Optional listing filters; absent fields are not constrained.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn list(&self, filter: &ProductFilter) -> AppResult<Vec<Product>>;
    async fn get(&self, id: i64) -> AppResult<Option<Product>>;
}

pub struct CatalogUseCases {
    repo: Arc<dyn ProductRepo>,
}

impl CatalogUseCases {
    pub fn new(repo: Arc<dyn ProductRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> AppResult<Vec<Product>> {
        self.repo.list(filter).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> AppResult<Product> {
        self.repo.get(id).await?.ok_or(AppError::NotFound)
    }
}
