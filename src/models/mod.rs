pub mod item;
pub mod user;

pub use item::{Item, ItemInput, ItemOut};
pub use user::{User, UserOut, UserUpdate};
