use chrono::{DateTime, Duration, Utc};

use super::password::{hash_password, verify_password, MAX_PASSWORD_BYTES};
use super::token::TokenSigner;
use crate::config::AuthConfig;
use crate::error::{AppError, AuthError};
use crate::models::User;
use crate::store::{normalize_email, UserStore};

/// Verifies passwords against the credential store and issues bearer tokens.
///
/// Everything it needs comes from the `AuthConfig` it was built with; the store
/// is passed in on each call.
#[derive(Clone)]
pub struct Authenticator {
    hash_cost: u32,
    signer: TokenSigner,
    // Verified against when the email is unknown, so both failure paths pay for a bcrypt run.
    dummy_hash: String,
}

impl Authenticator {
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            hash_cost: config.hash_cost,
            signer: TokenSigner::new(config),
            dummy_hash: hash_password("fakelive-dummy-password", config.hash_cost)?,
        })
    }

    pub fn token_ttl(&self) -> Duration {
        self.signer.ttl()
    }

    /// Hashes a new password at the configured cost.
    pub fn hash_password(&self, plaintext: &str) -> Result<String, AppError> {
        hash_password(plaintext, self.hash_cost)
    }

    /// Looks the user up by email and checks the password.
    ///
    /// Unknown email and wrong password both return `AuthError::InvalidCredentials`.
    /// Store failures come back as they are.
    pub async fn authenticate<S>(
        &self,
        store: &S,
        email: &str,
        plaintext_password: &str,
    ) -> Result<User, AppError>
    where
        S: UserStore + ?Sized,
    {
        let email = normalize_email(email);
        // bcrypt ignores bytes past the limit, so a longer input never matches.
        let within_limit = plaintext_password.len() <= MAX_PASSWORD_BYTES;

        match store.find_user_by_email(&email).await? {
            Some(user) => {
                if verify_password(plaintext_password, &user.hashed_password)? && within_limit {
                    log::info!("user {} authenticated", user.id);
                    Ok(user)
                } else {
                    log::warn!("failed login for existing account {}: wrong password", user.id);
                    Err(AuthError::InvalidCredentials.into())
                }
            }
            None => {
                let _ = verify_password(plaintext_password, &self.dummy_hash);
                log::warn!("failed login: no account for the given email");
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    /// Issues a token for `email` valid for the configured TTL from now.
    pub fn issue_token(&self, email: &str) -> Result<String, AppError> {
        self.issue_token_at(email, Utc::now())
    }

    /// Same as `issue_token` with an explicit issue time.
    pub fn issue_token_at(&self, email: &str, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        self.signer.sign_at(email, issued_at)
    }
}
