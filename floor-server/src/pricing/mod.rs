//! Pricing
//!
//! - [`promotion`] - discount code validation
//! - [`billing`] - subtotal / discount / final total

pub mod billing;
pub mod promotion;

pub use billing::{compute_bill, discount_amount, discounted_price};
pub use promotion::{PromotionEngine, ValidatedCode};
