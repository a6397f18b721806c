pub mod authenticator;
pub mod extractors;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AuthError};
use crate::models::User;
use crate::store::UserStore;
use password::validate_password_bytes;

pub use authenticator::Authenticator;
pub use extractors::BearerIdentity;
pub use password::{hash_password, verify_password};
pub use token::{Claims, Identity, TokenSigner, TokenValidator};

/// Payload for a new account.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// At least 6 characters, at most 72 bytes.
    #[validate(length(min = 6), custom = "validate_password_bytes")]
    pub password: String,
}

/// OAuth2 password-grant form (`application/x-www-form-urlencoded`).
/// `username` carries the email.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Returned by a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Resolves a validated identity to its stored user.
///
/// A token for an account that no longer exists is `TokenInvalid`.
pub async fn current_user<S>(store: &S, identity: &Identity) -> Result<User, AppError>
where
    S: UserStore + ?Sized,
{
    match store.find_user_by_email(&identity.email).await? {
        Some(user) => Ok(user),
        None => {
            log::warn!("valid token for an account that no longer exists");
            Err(AuthError::TokenInvalid.into())
        }
    }
}
