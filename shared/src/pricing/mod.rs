//! Cart pricing engine
//!
//! Two strategies share the [`PricingStrategy`] interface:
//! - [`TieredRateStrategy`]: per-product quantity tiers, best-fit threshold wins
//! - [`BestPlanStrategy`]: compares whole price plans and keeps the cheapest
//!
//! Every currency value is rounded to whole rial at each step, so results
//! depend on where rounding happens and not only on the inputs.

mod best_plan;
mod repository;
mod tiered;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;
use crate::models::{CartLine, CartQuote};
use crate::types::round_currency;

pub use best_plan::*;
pub use repository::*;
pub use tiered::*;

/// Fixed store markdown applied to the consumer price before any tier, 12.3%
pub const STORE_MARKDOWN_RATE: Decimal = Decimal::from_parts(123, 0, 0, false, 3);

/// Consumer price after the store markdown, rounded to whole rial
pub fn store_base_price(consumer_price: Decimal) -> Decimal {
    round_currency(consumer_price * (Decimal::ONE - STORE_MARKDOWN_RATE))
}

/// `unit_price × quantity` for one line
fn line_amount(unit_price: Decimal, quantity: i32, code: &str) -> Result<Decimal, PricingError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| PricingError::LineAmountOverflow {
            code: code.to_string(),
        })
}

/// Sum of cart-level amounts
fn cart_total(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, PricingError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or(PricingError::CartTotalOverflow)
}

/// Named pricing algorithm
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    TieredRate,
    BestPlan,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::TieredRate => "tiered_rate",
            StrategyKind::BestPlan => "best_plan",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pricing algorithm turning validated cart lines into a quote
pub trait PricingStrategy {
    fn kind(&self) -> StrategyKind;

    /// Price `cart` as of `as_of`. An empty cart yields [`CartQuote::empty`].
    fn quote(&self, cart: &[CartLine], as_of: NaiveDate) -> Result<CartQuote, PricingError>;
}
