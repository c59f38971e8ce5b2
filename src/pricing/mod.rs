//! Pricing engine module.
//!
//! The computational core of the service: price recommendations from cost
//! and margin data, exposed as a simulation endpoint and a product-backed
//! calculation endpoint.

pub mod calculators;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{
    round_money, InvalidPricingInput, PricingInput, PricingResult, SalesChannel,
    DEFAULT_PREMIUM_FACTOR,
};
pub use routes::router;
