use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ItemStore, UserStore, EMAIL_TAKEN_MESSAGE};
use crate::error::AppError;
use crate::models::{Item, User, UserUpdate};

/// In-memory store for development and tests.
///
/// Behaves like `PgStore` (serial ids, unique emails, newest-first listing) but
/// loses everything on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    items: Vec<Item>,
    next_user_id: i32,
    next_item_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError> {
        let mut tables = self.inner.write().await;
        if tables.users.iter().any(|u| u.email == email) {
            return Err(AppError::BadRequest(EMAIL_TAKEN_MESSAGE.into()));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            display_name: None,
            bio: None,
            profile_image: None,
            age: None,
        };
        tables.users.push(user.clone());
        log::debug!("created user {} in memory", user.id);
        Ok(user)
    }

    async fn update_user_profile(
        &self,
        user_id: i32,
        update: &UserUpdate,
    ) -> Result<Option<User>, AppError> {
        let mut tables = self.inner.write().await;
        Ok(tables.users.iter_mut().find(|u| u.id == user_id).map(|user| {
            update.apply_to(user);
            user.clone()
        }))
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn create_item(&self, user_id: i32, content: &str) -> Result<Item, AppError> {
        let mut tables = self.inner.write().await;
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::NotFound("User not found".into()));
        }

        tables.next_item_id += 1;
        let item = Item {
            id: tables.next_item_id,
            user_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        tables.items.push(item.clone());
        Ok(item)
    }

    async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        let tables = self.inner.read().await;
        let mut items = tables.items.clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }
}
