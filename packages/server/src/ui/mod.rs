//! Timechat relay server: HTTP / WebSocket surface.

mod handler;
mod runner;
mod signal;
pub mod state; // UseCase 層からアクセスするため public

pub use runner::{build_router, run};
