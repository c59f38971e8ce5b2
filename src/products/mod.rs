//! Product storage module.
//!
//! CRUD over the `products` table; product rows supply the cost data the
//! pricing module computes from.

pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;

pub use models::Product;
pub use routes::router;
