//! Fiscal Print Server - HTTP front end for TFHKA fiscal terminals
//!
//! # Architecture
//!
//! Each point-of-sale terminal owns a directory under a configured
//! base path containing the vendor fiscal executable. A request flows
//! through:
//!
//! ```text
//! HTTP handler -> terminal dir resolution -> per-terminal lock
//!              -> command encoding (fiscal-protocol)
//!              -> durable write + verify
//!              -> executable invocation + retry/classification
//! ```
//!
//! # Module structure
//!
//! ```text
//! fiscal-server/src/
//! ├── core/          # config, state, server
//! ├── fiscal/        # terminal resolution, locks, writer, executor
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod fiscal;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use fiscal::{FiscalError, FiscalService};
pub use utils::{AppError, AppResult};
pub use utils::logger::init_logger;
