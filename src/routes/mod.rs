pub mod auth;
pub mod health;
pub mod items;
pub mod upload;
pub mod users;

use actix_web::web;

/// Registers every endpoint. Shared state comes from `AppState::configure`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::root)
        .service(health::health)
        .service(auth::register)
        .service(auth::login)
        .service(users::update_me)
        .service(items::create_item)
        .service(items::list_items)
        .service(upload::upload_file);
}
