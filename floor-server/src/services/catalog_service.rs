//! Catalog Service - the menu, held in memory
//!
//! The order flow only ever reads from here (`get`, `list`, `search`). Admin
//! edits go through `upsert`, `remove` and `set_available`; committed orders
//! keep their own price/name snapshots, so edits never touch history.

use crate::pricing::{PromotionEngine, discounted_price};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Dish, DishPricePreview, DishUpsert, MAX_SPICY_LEVEL, MAX_UNIT_PRICE};
use thiserror::Error;

/// Category filter value meaning "any category"
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Dish not found: {0}")]
    DishNotFound(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(i64),

    #[error("Invalid spicy level: {0}")]
    InvalidSpicyLevel(u8),

    #[error("Dish name must not be empty")]
    EmptyName,
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::DishNotFound(id) => {
                AppError::with_message(ErrorCode::DishNotFound, err.to_string())
                    .with_detail("dish_id", id.as_str())
            }
            CatalogError::InvalidPrice(price) => {
                AppError::with_message(ErrorCode::DishInvalidPrice, err.to_string())
                    .with_detail("unit_price", *price)
            }
            CatalogError::InvalidSpicyLevel(_) => {
                AppError::with_message(ErrorCode::ValueOutOfRange, err.to_string())
            }
            CatalogError::EmptyName => AppError::validation(err.to_string()),
        }
    }
}

/// Menu-wide price preview under a discount code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuPreview {
    /// Normalized code
    pub code: String,
    /// False when the code failed validation (all prices are then unchanged)
    pub valid: bool,
    pub percent: u32,
    pub dishes: Vec<DishPricePreview>,
}

/// In-memory menu
#[derive(Debug)]
pub struct MenuCatalog {
    dishes: RwLock<Vec<Dish>>,
}

impl MenuCatalog {
    pub fn new(dishes: Vec<Dish>) -> Self {
        Self {
            dishes: RwLock::new(dishes),
        }
    }

    pub fn get(&self, id: &str) -> Option<Dish> {
        self.dishes.read().iter().find(|d| d.id == id).cloned()
    }

    /// All dishes in menu order
    pub fn list(&self) -> Vec<Dish> {
        self.dishes.read().clone()
    }

    pub fn len(&self) -> usize {
        self.dishes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.read().is_empty()
    }

    /// Distinct categories, in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let dishes = self.dishes.read();
        let mut out: Vec<String> = Vec::new();
        for dish in dishes.iter() {
            if !out.contains(&dish.category) {
                out.push(dish.category.clone());
            }
        }
        out
    }

    /// Guest menu filter
    ///
    /// `category` matches exactly (`None` or `"all"` = any); `query` is a
    /// case-insensitive substring over name and description.
    pub fn search(&self, category: Option<&str>, query: Option<&str>) -> Vec<Dish> {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES));
        let query = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        self.dishes
            .read()
            .iter()
            .filter(|d| category.is_none_or(|c| d.category == c))
            .filter(|d| {
                query.as_deref().is_none_or(|q| {
                    d.name.to_lowercase().contains(q) || d.description.to_lowercase().contains(q)
                })
            })
            .cloned()
            .collect()
    }

    /// Create or replace a dish
    pub fn upsert(&self, id: &str, payload: DishUpsert) -> Result<Dish, CatalogError> {
        if payload.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if !(0..=MAX_UNIT_PRICE).contains(&payload.unit_price) {
            return Err(CatalogError::InvalidPrice(payload.unit_price));
        }
        if let Some(level) = payload.spicy_level
            && level > MAX_SPICY_LEVEL
        {
            return Err(CatalogError::InvalidSpicyLevel(level));
        }

        let dish = payload.into_dish(id);
        let mut dishes = self.dishes.write();
        match dishes.iter_mut().find(|d| d.id == id) {
            Some(existing) => *existing = dish.clone(),
            None => dishes.push(dish.clone()),
        }
        tracing::info!(dish_id = %id, price = dish.unit_price, "Dish saved");
        Ok(dish)
    }

    pub fn remove(&self, id: &str) -> Result<Dish, CatalogError> {
        let mut dishes = self.dishes.write();
        let idx = dishes
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| CatalogError::DishNotFound(id.to_string()))?;
        let removed = dishes.remove(idx);
        tracing::info!(dish_id = %id, "Dish removed");
        Ok(removed)
    }

    pub fn set_available(&self, id: &str, available: bool) -> Result<Dish, CatalogError> {
        let mut dishes = self.dishes.write();
        let dish = dishes
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| CatalogError::DishNotFound(id.to_string()))?;
        dish.is_available = available;
        tracing::info!(dish_id = %id, available, "Dish availability changed");
        Ok(dish.clone())
    }

    /// Discounted prices for every dish under `code`
    ///
    /// An invalid code is not an error here: the preview simply shows
    /// undiscounted prices with `valid = false`.
    pub fn preview_prices(&self, engine: &PromotionEngine, code: &str) -> MenuPreview {
        let validated = engine.validate_detailed(code);
        let (code, valid, percent, rate) = match validated {
            Some(v) => (v.code, true, v.percent, v.rate),
            None => (crate::pricing::promotion::normalize(code), false, 0, Decimal::ZERO),
        };

        let dishes = self
            .dishes
            .read()
            .iter()
            .map(|d| DishPricePreview {
                id: d.id.clone(),
                name: d.name.clone(),
                unit_price: d.unit_price,
                discounted_price: discounted_price(d.unit_price, rate),
            })
            .collect();

        MenuPreview {
            code,
            valid,
            percent,
            dishes,
        }
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self::new(crate::seed::default_menu())
    }
}
