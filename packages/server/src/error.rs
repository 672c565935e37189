//! Startup and runtime errors of the server process.

use std::{io, net::SocketAddr};

use thiserror::Error;

/// Invalid startup configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid host '{0}': expected an IP address")]
    InvalidHost(String),

    #[error("Data file path cannot be empty")]
    EmptyDataFile,
}

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Server stopped unexpectedly: {0}")]
    Serve(#[source] io::Error),
}
