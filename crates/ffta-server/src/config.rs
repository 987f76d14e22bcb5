//! Server configuration.

use ffta_core::StoreConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Directory holding `races.csv`, `jobs.csv` and `abilities.csv`.
    pub data_dir: PathBuf,
}

impl ServerConfig {
    /// Creates a configuration serving the tables in `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            data_dir: data_dir.into(),
        }
    }

    /// Sets the bind address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Store configuration derived from the data directory.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::from_data_dir(&self.data_dir)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("data")
    }
}
