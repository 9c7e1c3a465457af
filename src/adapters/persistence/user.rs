use async_trait::async_trait;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    use_cases::auth::{User, UserRepo},
};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: Option<String>,
    google_id: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            google_id: row.google_id,
        }
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, google_id";

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(User::from))
    }

    async fn create_with_password(&self, email: &str, password_hash: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool())
        .await?;
        Ok(row.into())
    }

    async fn create_with_google(&self, email: &str, google_id: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (email, google_id) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(google_id)
        .fetch_one(self.pool())
        .await?;
        Ok(row.into())
    }

    async fn set_google_id(&self, user_id: i64, google_id: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET google_id = $1 WHERE id = $2")
            .bind(google_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn set_password_by_email(&self, email: &str, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE email = $2")
            .bind(password_hash)
            .bind(email)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
