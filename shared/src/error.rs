//! Pricing error types

use thiserror::Error;

/// Errors raised while validating a cart or computing a quote
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("Cart line {line} is missing a product code")]
    MissingProductCode { line: usize },

    #[error("Product {code} has no consumer price")]
    MissingPrice { code: String },

    #[error("Quantity for product {code} must be positive, got {quantity}")]
    InvalidQuantity { code: String, quantity: i64 },

    #[error("Consumer price for product {code} cannot be negative")]
    NegativePrice { code: String },

    #[error("Amount for product {code} is too large to price")]
    LineAmountOverflow { code: String },

    #[error("Cart total is too large to price")]
    CartTotalOverflow,

    #[error("Discount rate {rate} is outside [0, 1)")]
    InvalidRate { rate: String },

    #[error("Rule repository error: {0}")]
    Repository(String),
}

impl PricingError {
    /// Name of the offending input field, when the error is about request data
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PricingError::MissingProductCode { .. } => Some("product.code"),
            PricingError::MissingPrice { .. } | PricingError::NegativePrice { .. } => {
                Some("product.price")
            }
            PricingError::InvalidQuantity { .. } | PricingError::LineAmountOverflow { .. } => {
                Some("quantity")
            }
            PricingError::CartTotalOverflow => Some("cartItems"),
            PricingError::InvalidRate { .. } => Some("discountRate"),
            PricingError::Repository(_) => None,
        }
    }

    /// Whether the error was caused by the caller's input
    pub fn is_validation(&self) -> bool {
        self.field().is_some()
    }
}
