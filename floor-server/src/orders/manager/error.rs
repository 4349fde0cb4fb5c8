use super::super::cart::CartError;
use super::super::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use shared::types::TableId;
use thiserror::Error;

/// Manager errors
///
/// Everything except `Storage` is a local, recoverable rejection of the
/// command; the table is left exactly as it was.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid promotion code: {0}")]
    InvalidPromotionCode(String),

    #[error("Table not found: {0}")]
    TableNotFound(TableId),

    #[error("Table {0} has no open orders to check out")]
    CheckoutWithNoOrders(TableId),

    #[error("Dish not found: {0}")]
    DishNotFound(String),

    #[error("Dish is not available: {0}")]
    DishUnavailable(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Dish {dish_id} has an invalid price: {price}")]
    InvalidPrice { dish_id: String, price: i64 },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Item {index} not found in order {order_id}")]
    ItemNotFound { order_id: String, index: usize },

    #[error("Table {0} still has open orders")]
    TableHasOpenOrders(TableId),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

impl ManagerError {
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        ManagerError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ManagerError::EmptyCart => ErrorCode::CartEmpty,
            ManagerError::InvalidTransition { .. } => ErrorCode::InvalidStatusTransition,
            ManagerError::InvalidPromotionCode(_) => ErrorCode::InvalidPromotionCode,
            ManagerError::TableNotFound(_) => ErrorCode::TableNotFound,
            ManagerError::CheckoutWithNoOrders(_) => ErrorCode::CheckoutWithNoOrders,
            ManagerError::DishNotFound(_) => ErrorCode::DishNotFound,
            ManagerError::DishUnavailable(_) => ErrorCode::DishUnavailable,
            ManagerError::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            ManagerError::InvalidPrice { .. } => ErrorCode::DishInvalidPrice,
            ManagerError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            ManagerError::ItemNotFound { .. } => ErrorCode::OrderItemNotFound,
            ManagerError::TableHasOpenOrders(_) => ErrorCode::TableHasOrders,
            ManagerError::Storage(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<CartError> for ManagerError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::DishUnavailable(id) => ManagerError::DishUnavailable(id),
            CartError::InvalidQuantity(q) => ManagerError::InvalidQuantity(q),
            CartError::InvalidPrice { dish_id, price } => {
                ManagerError::InvalidPrice { dish_id, price }
            }
        }
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        let code = err.code();
        match err {
            ManagerError::Storage(e) => {
                tracing::error!(error = %e, "Storage error occurred");
                AppError::with_message(code, "Storage error")
            }
            ManagerError::InvalidPromotionCode(ref c) => {
                let detail = c.clone();
                AppError::with_message(code, err.to_string()).with_detail("code", detail)
            }
            ManagerError::TableNotFound(id)
            | ManagerError::CheckoutWithNoOrders(id)
            | ManagerError::TableHasOpenOrders(id) => {
                AppError::with_message(code, err.to_string()).with_detail("table_id", id)
            }
            other => AppError::with_message(code, other.to_string()),
        }
    }
}
