use async_trait::async_trait;
use sqlx::QueryBuilder;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    use_cases::catalog::{Product, ProductFilter, ProductRepo},
};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image_url, category, stock_quantity, created_at";

#[async_trait]
impl ProductRepo for PostgresPersistence {
    async fn list(&self, filter: &ProductFilter) -> AppResult<Vec<Product>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"
        ));
        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category);
        }
        if let Some(min_price) = filter.min_price {
            query.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            query.push(" AND price <= ").push_bind(max_price);
        }
        query.push(" ORDER BY created_at DESC");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool())
            .await?;
        Ok(products)
    }

    async fn get(&self, id: i64) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(product)
    }
}
