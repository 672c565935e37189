//! Timechat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin timechat-server -- --port 8080 --data-file ./timechat-data.json
//! ```

use clap::Parser;
use timechat_server::ServerArgs;
use timechat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = timechat_server::run_server(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
