//! Shared types and pricing engine for the distribution sales platform
//!
//! This crate contains the cart and discount models, the pricing strategies
//! and validation helpers shared between the backend and the WASM preview.

pub mod error;
pub mod models;
pub mod pricing;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use pricing::*;
pub use types::*;
pub use validation::*;
