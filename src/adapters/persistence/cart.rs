use async_trait::async_trait;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    use_cases::cart::{CartItemView, CartRepo},
};

#[async_trait]
impl CartRepo for PostgresPersistence {
    async fn find_line(&self, user_id: i64, product_id: i64) -> AppResult<Option<(i64, i32)>> {
        let line = sqlx::query_as::<_, (i64, i32)>(
            "SELECT id, quantity FROM cart WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(line)
    }

    async fn insert_line(&self, user_id: i64, product_id: i64, quantity: i32) -> AppResult<()> {
        sqlx::query("INSERT INTO cart (user_id, product_id, quantity) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(product_id)
            .bind(quantity)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn update_quantity(&self, line_id: i64, quantity: i32) -> AppResult<()> {
        sqlx::query("UPDATE cart SET quantity = $1 WHERE id = $2")
            .bind(quantity)
            .bind(line_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<CartItemView>> {
        let items = sqlx::query_as::<_, CartItemView>(
            "SELECT c.id, c.quantity, c.created_at, p.id AS product_id, p.name, p.description, \
             p.price, p.image_url, p.category \
             FROM cart c \
             JOIN products p ON c.product_id = p.id \
             WHERE c.user_id = $1 \
             ORDER BY c.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(items)
    }

    async fn get_line_stock(&self, line_id: i64, user_id: i64) -> AppResult<Option<i32>> {
        let stock = sqlx::query_scalar::<_, i32>(
            "SELECT p.stock_quantity FROM cart c \
             JOIN products p ON c.product_id = p.id \
             WHERE c.id = $1 AND c.user_id = $2",
        )
        .bind(line_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(stock)
    }

    async fn line_belongs_to_user(&self, line_id: i64, user_id: i64) -> AppResult<bool> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM cart WHERE id = $1 AND user_id = $2",
        )
        .bind(line_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(found.is_some())
    }

    async fn delete_line(&self, line_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM cart WHERE id = $1")
            .bind(line_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
