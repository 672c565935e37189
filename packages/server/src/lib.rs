//! Timechat relay server library.
//!
//! Aliases bind WebSocket connections to a name, contact requests turn two
//! aliases into mutual contacts, and contacts talk in two-party rooms whose
//! frames are relayed verbatim. The contact graph and pending requests are
//! stored in a JSON file; live connections are kept in memory only.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::{ServerArgs, ServerConfig};
pub use error::{ConfigError, ServerError};
pub use ui::run as run_server;
