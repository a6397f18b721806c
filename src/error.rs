//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application,
//! plus `AuthError`, the three ways authentication can fail.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return it
//! directly. Every authentication failure becomes a 401; the response body only tells
//! a login failure apart from a token failure, never an expired token from a forged one
//! or an unknown email from a wrong password.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned for a failed login, whichever half of the credentials was wrong.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect email or password";
/// Message returned for any rejected bearer token.
pub const INVALID_TOKEN_MESSAGE: &str = "Could not validate credentials";

/// The distinct ways authentication can fail.
///
/// Callers and logs can tell these apart; HTTP clients cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or password mismatch.
    InvalidCredentials,
    /// The token was correctly signed but its `exp` is in the past.
    TokenExpired,
    /// Bad signature, malformed token, missing header or unknown subject.
    TokenInvalid,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "invalid credentials"),
            AuthError::TokenExpired => write!(f, "token expired"),
            AuthError::TokenInvalid => write!(f, "token invalid"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed (HTTP 401).
    Auth(AuthError),
    /// Malformed or conflicting request (HTTP 400).
    BadRequest(String),
    /// Requested resource was not found (HTTP 404).
    NotFound(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Store failure (HTTP 500). The detail is logged, not returned.
    DatabaseError(String),
    /// Input validation failed (HTTP 422 Unprocessable Entity).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Auth(err) => write!(f, "Unauthorized: {}", err),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Auth(err) => {
                let message = match err {
                    AuthError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
                    AuthError::TokenExpired | AuthError::TokenInvalid => INVALID_TOKEN_MESSAGE,
                };
                HttpResponse::Unauthorized()
                    .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                    .json(json!({ "error": message }))
            }
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                log::error!("request failed: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::ValidationError(msg) => {
                HttpResponse::build(self.status_code()).json(json!({ "error": msg }))
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        AppError::Auth(error)
    }
}

/// `RowNotFound` becomes `NotFound`; everything else is a store failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(error: actix_multipart::MultipartError) -> AppError {
        AppError::BadRequest(format!("Malformed upload: {}", error))
    }
}
