use actix_web::web;
use std::sync::Arc;

use crate::auth::{Authenticator, TokenValidator};
use crate::config::{AuthConfig, UploadConfig};
use crate::error::AppError;
use crate::store::Store;

/// Everything handlers receive through `web::Data`.
///
/// Building it also creates the upload directory.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub authenticator: Authenticator,
    pub validator: TokenValidator,
    pub upload: UploadConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        auth: &AuthConfig,
        upload: UploadConfig,
    ) -> Result<Self, AppError> {
        std::fs::create_dir_all(&upload.dir)?;
        Ok(Self {
            store,
            authenticator: Authenticator::new(auth)?,
            validator: TokenValidator::new(auth),
            upload,
        })
    }

    /// Registers the shared state on an app or scope, along with extractor configs that
    /// turn malformed JSON and form bodies into `AppError::BadRequest`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::FormConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(web::Data::from(self.store.clone()))
        .app_data(web::Data::new(self.authenticator.clone()))
        .app_data(web::Data::new(self.validator.clone()))
        .app_data(web::Data::new(self.upload.clone()));
    }
}
