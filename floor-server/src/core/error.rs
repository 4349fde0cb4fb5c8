use crate::orders::ManagerError;
use thiserror::Error;

/// Startup and runtime errors of the server process
///
/// Request-level failures never use this type; handlers answer with
/// `AppError`.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Floor initialization failed: {0}")]
    Manager(#[from] ManagerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result alias for server lifecycle functions
pub type Result<T> = std::result::Result<T, ServerError>;
