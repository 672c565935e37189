//! Logger setup shared by every Timechat binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. When it is unset, `default_level` is applied to
/// the calling binary's crate and to the Timechat libraries, and everything else
/// stays at `warn`.
///
/// # Arguments
///
/// * `bin_name` - Name of the binary (usually `env!("CARGO_BIN_NAME")`)
/// * `default_level` - Level used when `RUST_LOG` is not set (e.g. `"info"`)
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let crate_target = bin_name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,{crate_target}={default_level},timechat_server={default_level},timechat_shared={default_level},tower_http={default_level}"
        ))
    });

    // try_init so that tests which call this more than once do not panic
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
