use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

/// A user row. Deliberately not `Serialize`: responses go through `UserOut`,
/// so the password hash can never end up in a body.
#[derive(Clone, PartialEq, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub hashed_password: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub age: Option<i32>,
}

// Hand-written so the hash never reaches a log line.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("hashed_password", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("bio", &self.bio)
            .field("profile_image", &self.profile_image)
            .field("age", &self.age)
            .finish()
    }
}

/// Public view of a user.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserOut {
    pub id: i32,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub age: Option<i32>,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            bio: user.bio,
            profile_image: user.profile_image,
            age: user.age,
        }
    }
}

/// Profile changes. Absent fields are left untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(length(max = 500))]
    pub profile_image: Option<String>,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
}

impl UserUpdate {
    /// Applies the present fields onto `user`.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(display_name) = &self.display_name {
            user.display_name = Some(display_name.clone());
        }
        if let Some(bio) = &self.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(profile_image) = &self.profile_image {
            user.profile_image = Some(profile_image.clone());
        }
        if let Some(age) = self.age {
            user.age = Some(age);
        }
    }
}
