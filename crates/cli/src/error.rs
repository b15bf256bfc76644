//! Errors surfaced by `apizza` commands.

use std::path::PathBuf;

use apizza_core::AddressError;
use apizza_vendor::order::ToppingError;
use apizza_vendor::{CacheError, ClientError};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Topping(#[from] ToppingError),

    #[error("no address to order to; use --address, set default-address-name or fill in the config address")]
    NoAddress,

    /// Flags that do not make sense together or are missing.
    #[error("{0}")]
    Usage(String),

    #[error("could not open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
