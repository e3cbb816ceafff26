//! Domain models for cart pricing

mod cart;
mod discount;
mod price_plan;
mod quote;

pub use cart::*;
pub use discount::*;
pub use price_plan::*;
pub use quote::*;
