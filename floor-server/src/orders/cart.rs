//! Cart - pre-commit staging of a guest's selection
//!
//! Lines are keyed by *variant*: the same dish with identical notes
//! (case-sensitive, empty included) merges into one line.

use serde::{Deserialize, Serialize};
use shared::models::{Dish, MAX_UNIT_PRICE};
use shared::order::{ItemStatus, MAX_LINE_QUANTITY, MAX_ORDER_QUANTITY, OrderItem};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Dish is not available: {0}")]
    DishUnavailable(String),

    #[error("Quantity out of range (1..=999 per line, 9999 per order): {0}")]
    InvalidQuantity(i64),

    #[error("Dish {dish_id} has an invalid price: {price}")]
    InvalidPrice { dish_id: String, price: i64 },
}

/// One staged line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub dish_id: String,
    pub name: String,
    pub unit_price: i64,
    pub quantity: u32,
    pub notes: String,
}

impl CartLine {
    pub fn line_total(&self) -> i64 {
        self.unit_price.saturating_mul(i64::from(self.quantity))
    }

    fn same_variant(&self, dish_id: &str, notes: &str) -> bool {
        self.dish_id == dish_id && self.notes == notes
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Number of dishes over all lines
    pub fn quantity(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Add `quantity` of `dish`, merging into a same-variant line
    ///
    /// A line holds at most `MAX_LINE_QUANTITY` and the cart at most
    /// `MAX_ORDER_QUANTITY` dishes; a rejected add leaves the cart unchanged.
    pub fn add_item(&mut self, dish: &Dish, quantity: i64, notes: &str) -> Result<(), CartError> {
        if !dish.is_available {
            return Err(CartError::DishUnavailable(dish.id.clone()));
        }
        if !(0..=MAX_UNIT_PRICE).contains(&dish.unit_price) {
            return Err(CartError::InvalidPrice {
                dish_id: dish.id.clone(),
                price: dish.unit_price,
            });
        }
        let qty = u32::try_from(quantity)
            .ok()
            .filter(|q| (1..=MAX_LINE_QUANTITY).contains(q))
            .ok_or(CartError::InvalidQuantity(quantity))?;
        if self.quantity().saturating_add(qty) > MAX_ORDER_QUANTITY {
            return Err(CartError::InvalidQuantity(quantity));
        }

        match self
            .lines
            .iter_mut()
            .find(|l| l.same_variant(&dish.id, notes))
        {
            Some(line) => {
                let merged = line.quantity + qty;
                if merged > MAX_LINE_QUANTITY {
                    return Err(CartError::InvalidQuantity(quantity));
                }
                line.quantity = merged;
            }
            None => self.lines.push(CartLine {
                dish_id: dish.id.clone(),
                name: dish.name.clone(),
                unit_price: dish.unit_price,
                quantity: qty,
                notes: notes.to_string(),
            }),
        }
        Ok(())
    }

    /// Adjust a line by `delta`; lines reaching 0 are removed
    ///
    /// Out-of-range indexes are ignored. Growth is clamped to the line and
    /// cart limits.
    pub fn update_quantity(&mut self, index: usize, delta: i64) {
        let others = self.quantity().saturating_sub(match self.lines.get(index) {
            Some(line) => line.quantity,
            None => return,
        });
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };
        let ceiling = MAX_LINE_QUANTITY.min(MAX_ORDER_QUANTITY.saturating_sub(others));
        let next = i64::from(line.quantity)
            .saturating_add(delta)
            .clamp(0, i64::from(ceiling));
        if next == 0 {
            self.lines.remove(index);
        } else {
            line.quantity = u32::try_from(next).unwrap_or(ceiling);
        }
    }

    /// Σ(unit_price × quantity), saturating
    pub fn total(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.line_total()))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Order line snapshots of the current lines (status `cooking`)
    pub fn to_items(&self) -> Vec<OrderItem> {
        self.lines
            .iter()
            .map(|l| OrderItem {
                dish_id: l.dish_id.clone(),
                name: l.name.clone(),
                unit_price: l.unit_price,
                quantity: l.quantity,
                notes: l.notes.clone(),
                status: ItemStatus::Cooking,
            })
            .collect()
    }
}
