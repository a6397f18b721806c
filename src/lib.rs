#![doc = "The `fakelive` library crate."]
#![doc = ""]
#![doc = "Accounts, profiles, item posts and uploads for the FakeLive app. The security"]
#![doc = "core lives in [`auth`]: bcrypt password checks, HS256 bearer tokens and the"]
#![doc = "request extractor. The binary (`main.rs`) wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use error::{AppError, AuthError};
pub use state::AppState;
