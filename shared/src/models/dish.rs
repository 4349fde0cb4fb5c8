//! Dish Model

use serde::{Deserialize, Serialize};

/// Dish entity (món ăn)
///
/// Prices are integers in the smallest currency unit (đồng).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unit_price: i64,
    pub category: String,
    /// 0 (mild) ..= 3 (very hot)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spicy_level: Option<u8>,
    pub is_available: bool,
    #[serde(default)]
    pub is_popular: bool,
}

/// Highest accepted spicy level
pub const MAX_SPICY_LEVEL: u8 = 3;

/// Highest accepted unit price (100 triệu đồng)
pub const MAX_UNIT_PRICE: i64 = 100_000_000;

impl Dish {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            unit_price,
            category: category.into(),
            spicy_level: None,
            is_available: true,
            is_popular: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_spicy_level(mut self, level: u8) -> Self {
        self.spicy_level = Some(level.min(MAX_SPICY_LEVEL));
        self
    }

    pub fn popular(mut self) -> Self {
        self.is_popular = true;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.is_available = false;
        self
    }
}

/// Create-or-replace dish payload (admin edit)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishUpsert {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unit_price: i64,
    pub category: String,
    #[serde(default)]
    pub spicy_level: Option<u8>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_popular: bool,
}

fn default_true() -> bool {
    true
}

impl DishUpsert {
    pub fn into_dish(self, id: impl Into<String>) -> Dish {
        Dish {
            id: id.into(),
            name: self.name,
            description: self.description,
            unit_price: self.unit_price,
            category: self.category,
            spicy_level: self.spicy_level,
            is_available: self.is_available,
            is_popular: self.is_popular,
        }
    }
}

/// Dish price shown under a menu-wide promotion preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishPricePreview {
    pub id: String,
    pub name: String,
    pub unit_price: i64,
    pub discounted_price: i64,
}
