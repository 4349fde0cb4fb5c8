//! Floor Server - table and order lifecycle engine for a single restaurant
//!
//! # Architecture
//!
//! - **Orders** (`orders`): cart, forward-only status rules, the `FloorManager`
//!   mutation authority, redb persistence and the kitchen simulator
//! - **Pricing** (`pricing`): promotion codes and bill calculation
//! - **Tables** (`tables`): floor queries and area summaries
//! - **Services** (`services`): menu catalog and the chat assistant
//! - **HTTP API** (`api`): thin JSON surface for the guest app and the console
//!
//! # Module layout
//!
//! ```text
//! floor-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # cart, manager, storage, simulator
//! ├── pricing/       # promotions, billing
//! ├── tables/        # table queries
//! ├── services/      # catalog, assistant
//! └── utils/         # logger, error re-exports
//! ```

pub mod api;
pub mod core;
pub mod orders;
pub mod pricing;
pub mod seed;
pub mod services;
pub mod tables;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use orders::{FloorManager, ManagerError, TableStore};
pub use pricing::PromotionEngine;
pub use services::{AssistantService, MenuCatalog};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, then install the tracing subscriber
///
/// `LOG_LEVEL` and `LOG_DIR` are read here, before `Config` exists, so that
/// configuration loading itself is logged.
pub fn setup_environment() -> anyhow::Result<()> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(anyhow::anyhow!("Failed to load .env: {e}"));
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ___ _
 | __| |___  ___ _ _
 | _|| / _ \/ _ \ '_|
 |_| |_\___/\___/_|   server
    "#
    );
}
