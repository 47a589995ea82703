//! Resource payloads exchanged with the API under test

mod product;
mod user;

pub use product::Product;
pub use user::{Gender, User, UserStatus};
