use actix_web::{middleware::Logger, App, HttpServer};
use std::io;
use std::sync::Arc;

use fakelive::{config::Config, routes, store::PgStore, AppState};

fn startup_error(context: &str, error: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, error))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| startup_error("invalid configuration", e))?;
    log::debug!("loaded {:?}", config.auth);

    let store = PgStore::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| startup_error("failed to connect to database", e))?;
    store
        .ensure_schema()
        .await
        .map_err(|e| startup_error("failed to create schema", e))?;

    let state = AppState::new(Arc::new(store), &config.auth, config.upload.clone())
        .map_err(|e| startup_error("failed to initialise application state", e))?;

    log::info!("Starting FakeLive server at {}", config.server_url());
    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| state.configure(cfg))
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
