//! Persistence seam. Handlers receive a `web::Data<dyn Store>` and pass it
//! explicitly into the auth functions; nothing reaches for a global connection.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Item, User, UserUpdate};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Message used when registration hits an existing email.
pub const EMAIL_TAKEN_MESSAGE: &str = "Email already registered";

/// Credential store: users keyed by a unique email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Inserts a user. Fails with `BadRequest(EMAIL_TAKEN_MESSAGE)` if the email exists,
    /// regardless of any check the caller made beforehand.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError>;

    /// Returns `None` if no user has that id.
    async fn update_user_profile(
        &self,
        user_id: i32,
        update: &UserUpdate,
    ) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn create_item(&self, user_id: i32, content: &str) -> Result<Item, AppError>;

    /// All items, newest first.
    async fn list_items(&self) -> Result<Vec<Item>, AppError>;
}

pub trait Store: UserStore + ItemStore {}

impl<T: UserStore + ItemStore> Store for T {}

/// Trims and lower-cases an email so lookups and the uniqueness check agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
