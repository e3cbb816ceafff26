//! HTTP handlers

pub mod health;
pub mod pricing;

pub use health::*;
pub use pricing::*;
