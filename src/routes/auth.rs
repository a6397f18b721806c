use crate::{
    auth::{Authenticator, LoginForm, RegisterRequest, TokenResponse},
    error::AppError,
    models::UserOut,
    store::{normalize_email, Store, UserStore, EMAIL_TAKEN_MESSAGE},
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates the account and returns its public profile. Does not log the user in.
#[post("/register")]
pub async fn register(
    store: web::Data<dyn Store>,
    authenticator: web::Data<Authenticator>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let email = normalize_email(&register_data.email);

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(EMAIL_TAKEN_MESSAGE.into()));
    }

    let hashed_password = authenticator.hash_password(&register_data.password)?;
    let user = store.create_user(&email, &hashed_password).await?;
    log::info!("registered user {}", user.id);

    Ok(HttpResponse::Ok().json(UserOut::from(user)))
}

/// Login user
///
/// Takes an OAuth2 password-grant form and returns a bearer token.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    authenticator: web::Data<Authenticator>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let user = authenticator
        .authenticate(store.get_ref(), &form.username, &form.password)
        .await?;
    let token = authenticator.issue_token(&user.email)?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}
