use crate::{
    auth::{current_user, BearerIdentity},
    error::AppError,
    models::{ItemInput, ItemOut},
    store::{ItemStore, Store},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Posts an item as the authenticated user.
///
/// ## Request Body:
/// `{"content": "<text>"}`; content must not be empty.
///
/// ## Responses:
/// - `200 OK`: the new `ItemOut`.
/// - `401 Unauthorized`: missing, expired or invalid token.
/// - `422 Unprocessable Entity`: empty or oversized content.
#[post("/items")]
pub async fn create_item(
    store: web::Data<dyn Store>,
    identity: BearerIdentity,
    item_data: web::Json<ItemInput>,
) -> Result<impl Responder, AppError> {
    let user = current_user(store.get_ref(), &identity.0).await?;
    item_data.validate()?;

    let item = store.create_item(user.id, &item_data.content).await?;
    log::debug!("user {} posted item {}", user.id, item.id);

    Ok(HttpResponse::Ok().json(ItemOut::from(item)))
}

/// Lists every item, newest first. Public.
#[get("/items")]
pub async fn list_items(store: web::Data<dyn Store>) -> Result<impl Responder, AppError> {
    let items: Vec<ItemOut> = store
        .list_items()
        .await?
        .into_iter()
        .map(ItemOut::from)
        .collect();

    Ok(HttpResponse::Ok().json(items))
}
