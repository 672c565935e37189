//! Command line / environment configuration of the server binary.

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

use crate::error::ConfigError;

/// File name of the contact store when `--data-file` is not given
pub const DEFAULT_DATA_FILE_NAME: &str = "timechat-data.json";

/// Timechat relay server
#[derive(Parser, Debug, Clone)]
#[command(name = "timechat-server", version, about = "Timechat relay server")]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Path of the JSON contact store (default: next to the executable)
    #[arg(long, env = "TIMECHAT_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "TIMECHAT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub data_file: PathBuf,
}

impl TryFrom<ServerArgs> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: ServerArgs) -> Result<Self, Self::Error> {
        let ip: IpAddr = args
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(args.host.clone()))?;
        let data_file = match args.data_file {
            Some(path) if path.as_os_str().is_empty() => return Err(ConfigError::EmptyDataFile),
            Some(path) => path,
            None => default_data_file(),
        };

        Ok(Self {
            addr: SocketAddr::new(ip, args.port),
            data_file,
        })
    }
}

/// `timechat-data.json` in the directory of the running executable,
/// or in the working directory when that cannot be determined.
pub fn default_data_file() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_DATA_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE_NAME))
}
