//! Cart models and price-calculation requests

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::PricingError;
use crate::pricing::StrategyKind;
use crate::validation::normalize_product_code;

/// Largest cart accepted in a single request
pub const MAX_CART_LINES: usize = 500;

/// Product reference as posted by the order form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRef {
    pub code: Option<String>,
    /// Consumer price in rial
    pub price: Option<Decimal>,
}

/// One raw cart entry from the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemInput {
    pub product: ProductRef,
    pub quantity: i64,
}

/// A validated cart line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_code: String,
    pub quantity: i32,
    pub consumer_price: Decimal,
}

impl CartLine {
    pub fn new(product_code: impl Into<String>, quantity: i32, consumer_price: Decimal) -> Self {
        Self {
            product_code: product_code.into(),
            quantity,
            consumer_price,
        }
    }

    /// Validate a raw cart entry. `index` is the entry's position, used for error reporting.
    pub fn from_input(index: usize, input: &CartItemInput) -> Result<Self, PricingError> {
        let code = input
            .product
            .code
            .as_deref()
            .map(normalize_product_code)
            .filter(|code| !code.is_empty())
            .ok_or(PricingError::MissingProductCode { line: index })?;

        let price = input
            .product
            .price
            .ok_or_else(|| PricingError::MissingPrice { code: code.clone() })?;
        if price < Decimal::ZERO {
            return Err(PricingError::NegativePrice { code });
        }

        let quantity = i32::try_from(input.quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| PricingError::InvalidQuantity {
                code: code.clone(),
                quantity: input.quantity,
            })?;

        Ok(Self::new(code, quantity, price))
    }
}

/// Validate every entry of a posted cart. Fails on the first bad entry.
pub fn cart_lines_from_items(items: &[CartItemInput]) -> Result<Vec<CartLine>, PricingError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| CartLine::from_input(index, item))
        .collect()
}

/// Body of `POST /pricing/calculate-price`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CalculatePriceRequest {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub cart_items: Vec<CartItemInput>,
    pub as_of: Option<NaiveDate>,
    pub strategy: Option<StrategyKind>,
}

/// Body of `POST /pricing/best-plan`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BestPlanRequest {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub cart_items: Vec<CartItemInput>,
    pub as_of: Option<NaiveDate>,
    /// Restrict the comparison to these plans
    pub plan_ids: Option<Vec<Uuid>>,
}
