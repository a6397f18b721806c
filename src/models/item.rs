use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Input structure for posting a new item.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ItemInput {
    /// The text of the post. Must not be empty.
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

/// An item as stored in the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Item {
    pub id: i32,
    /// Identifier of the user who posted the item.
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// An item as returned by the API.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ItemOut {
    pub id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Item> for ItemOut {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            content: item.content,
            created_at: item.created_at,
        }
    }
}
