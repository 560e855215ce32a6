//! Court Server - campus food court ordering backend
//!
//! # Architecture overview
//!
//! This crate is the single node serving the food court hall:
//!
//! - **Sessions** (`sessions`): header-token identities and role checks
//! - **Catalog** (`catalog`): the four stalls and their menus
//! - **Cart** (`cart`): per-user carts, priced server-side
//! - **Orders** (`orders`): checkout, lifecycle, redb-backed storage
//! - **Notify** (`notify`): order events fanned out over SSE
//! - **Stats** (`stats`): admin dashboards and spending summaries
//! - **HTTP API** (`api`): RESTful API surface
//!
//! # Module structure
//!
//! ```text
//! court-server/src/
//! ├── core/      # config, server state, HTTP server loop
//! ├── api/       # HTTP routes and handlers
//! ├── sessions/  # session store and extractor
//! ├── cart/      # cart store
//! ├── catalog/   # vendor registry and menu catalog
//! ├── orders/    # money, checkout, lifecycle, storage, manager
//! ├── notify/    # order event broadcast
//! ├── stats/     # aggregation and reporting
//! └── utils/     # logging
//! ```

pub mod api;
pub mod cart;
pub mod catalog;
pub mod core;
pub mod notify;
pub mod orders;
pub mod sessions;
pub mod stats;
pub mod utils;

// Re-export public types
pub use cart::CartStore;
pub use catalog::Catalog;
pub use core::{Config, Server, ServerState};
pub use notify::{OrderNotifier, SubscribeScope};
pub use orders::{OrderStore, OrdersManager, StorageMode};
pub use sessions::SessionStore;

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

use anyhow::Context;

/// Prepare the process environment: .env file, working directory, logging.
///
/// Call once before anything logs. In production the log also goes to a
/// daily file under `{work_dir}/logs`.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)
        .with_context(|| format!("Failed to create work directory {}", config.work_dir))?;

    if config.is_production() {
        let log_dir = std::path::Path::new(&config.work_dir).join("logs");
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
        init_logger_with_file(None, log_dir.to_str());
    } else {
        init_logger();
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ______                   __
   / ____/____   ____   ____/ /
  / /_   / __ \ / __ \ / __  /
 / __/  / /_/ // /_/ // /_/ /
/_/     \____/ \____/ \__,_/
   ______                     __
  / ____/____   __  __ _____ / /_
 / /    / __ \ / / / // ___// __/
/ /___ / /_/ // /_/ // /   / /_
\____/ \____/ \__,_//_/    \__/
    "#
    );
}
