//! Domain services
//!
//! One service per REST resource. Services hold no state; every call takes
//! the worker context it runs on.

mod product_service;
mod user_service;

pub use product_service::{PRODUCT_BY_ID_ENDPOINT, PRODUCTS_ENDPOINT, ProductService};
pub use user_service::{USER_BY_ID_ENDPOINT, USERS_ENDPOINT, UserService};
