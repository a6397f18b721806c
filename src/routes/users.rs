use crate::{
    auth::{current_user, BearerIdentity},
    error::AppError,
    models::{UserOut, UserUpdate},
    store::{Store, UserStore},
};
use actix_web::{put, web, HttpResponse, Responder};
use validator::Validate;

/// Updates the authenticated user's profile.
///
/// Only the fields present in the body change.
///
/// ## Responses:
/// - `200 OK`: the updated `UserOut`.
/// - `401 Unauthorized`: missing, expired or invalid token.
/// - `404 Not Found`: the account disappeared between lookup and update.
/// - `422 Unprocessable Entity`: a field is out of bounds.
#[put("/users/me")]
pub async fn update_me(
    store: web::Data<dyn Store>,
    identity: BearerIdentity,
    update: web::Json<UserUpdate>,
) -> Result<impl Responder, AppError> {
    let user = current_user(store.get_ref(), &identity.0).await?;
    update.validate()?;

    match store.update_user_profile(user.id, &update).await? {
        Some(updated) => Ok(HttpResponse::Ok().json(UserOut::from(updated))),
        None => Err(AppError::NotFound("User not found".into())),
    }
}
