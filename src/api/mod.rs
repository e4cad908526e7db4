//! REST API wrappers for the shop back end.
//!
//! Each module provides a lightweight struct that borrows the shared
//! [`Session`](crate::session::Session) and exposes typed methods returning
//! `Result<T>`.

pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;

pub use auth::AuthApi;
pub use categories::CategoryApi;
pub use orders::OrderApi;
pub use products::{ProductApi, ProductListParams};
