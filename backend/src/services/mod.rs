//! Business logic services for the pricing server

pub mod pricing;
pub mod rule_store;

pub use pricing::PricingService;
pub use rule_store::RuleStore;
