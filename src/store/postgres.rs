use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{ItemStore, UserStore, EMAIL_TAKEN_MESSAGE};
use crate::error::AppError;
use crate::models::{Item, User, UserUpdate};

const USER_COLUMNS: &str = "id, email, hashed_password, display_name, bio, profile_image, age";
const ITEM_COLUMNS: &str = "id, user_id, content, created_at";

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    hashed_password TEXT NOT NULL,
    display_name TEXT,
    bio TEXT,
    profile_image TEXT,
    age INTEGER
)";

const CREATE_ITEMS_TABLE: &str = "CREATE TABLE IF NOT EXISTS items (
    id SERIAL PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

/// PostgreSQL-backed store over a shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Creates the tables if they do not exist yet. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(CREATE_USERS_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_ITEMS_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, hashed_password) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            // The pre-check in the handler can race; the unique index is authoritative.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::BadRequest(EMAIL_TAKEN_MESSAGE.into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_user_profile(
        &self,
        user_id: i32,
        update: &UserUpdate,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                display_name = COALESCE($1, display_name),
                bio = COALESCE($2, bio),
                profile_image = COALESCE($3, profile_image),
                age = COALESCE($4, age)
             WHERE id = $5
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&update.display_name)
        .bind(&update.bio)
        .bind(&update.profile_image)
        .bind(update.age)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl ItemStore for PgStore {
    async fn create_item(&self, user_id: i32, content: &str) -> Result<Item, AppError> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "INSERT INTO items (user_id, content) VALUES ($1, $2) RETURNING {}",
            ITEM_COLUMNS
        ))
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items ORDER BY created_at DESC, id DESC",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}
