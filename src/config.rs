//! Application configuration.
//!
//! Built from defaults, then the environment, then command-line overrides.
//!
//! # Example
//!
//! ```
//! use chatloom::config::AppConfig;
//!
//! let config = AppConfig::default()
//!     .with_port(4000)
//!     .with_name_count(1_000)
//!     .with_memory_only();
//! assert!(config.data_dir.is_none());
//! ```

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::RunOptions;
use crate::names::DEFAULT_NAME_COUNT;
use crate::storage::{FileStore, MemoryStore, PersistenceStore};

pub const ENV_DATA_DIR: &str = "CHATLOOM_DATA_DIR";
pub const ENV_PORT: &str = "CHATLOOM_PORT";
pub const ENV_NAME_COUNT: &str = "CHATLOOM_NAME_COUNT";
pub const ENV_NO_SERVER: &str = "CHATLOOM_NO_SERVER";

/// Default mention server port.
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Where chats are saved; `None` keeps them in memory only
    pub data_dir: Option<PathBuf>,
    /// Mention server port (bound on localhost)
    pub port: u16,
    /// Size of the synthetic name set
    pub name_count: usize,
    /// Start the mention server
    pub mention_server: bool,
    /// Run the mention server without the chat driver
    pub server_only: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            port: DEFAULT_PORT,
            name_count: DEFAULT_NAME_COUNT,
            mention_server: true,
            server_only: false,
        }
    }
}

/// `<platform data dir>/chatloom`, if the platform has one.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("chatloom"))
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `CHATLOOM_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading variables through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup(ENV_PORT) {
            match raw.trim().parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid {}", ENV_PORT),
            }
        }
        if let Some(raw) = lookup(ENV_NAME_COUNT) {
            match raw.trim().parse::<usize>() {
                Ok(count) => config.name_count = count,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid {}", ENV_NAME_COUNT),
            }
        }
        if let Some(raw) = lookup(ENV_NO_SERVER) {
            config.mention_server = !is_truthy(&raw);
        }

        config
    }

    /// Apply command-line overrides.
    pub fn with_run_options(mut self, options: &RunOptions) -> Self {
        if let Some(port) = options.port {
            self.port = port;
        }
        if let Some(dir) = &options.data_dir {
            self.data_dir = Some(dir.clone());
        }
        if options.memory {
            self.data_dir = None;
        }
        if options.no_server {
            self.mention_server = false;
        }
        if options.serve_only {
            self.server_only = true;
            self.mention_server = true;
        }
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_memory_only(mut self) -> Self {
        self.data_dir = None;
        self
    }

    pub fn with_name_count(mut self, count: usize) -> Self {
        self.name_count = count;
        self
    }

    pub fn with_mention_server(mut self, enabled: bool) -> Self {
        self.mention_server = enabled;
        self
    }

    /// Localhost address for the mention server.
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }

    /// Open the configured storage.
    ///
    /// A data directory that cannot be created falls back to memory-only
    /// storage with a warning.
    pub fn persistence(&self) -> PersistenceStore {
        let Some(dir) = &self.data_dir else {
            tracing::info!("Chats are kept in memory only");
            return PersistenceStore::new(Arc::new(MemoryStore::new()));
        };
        match FileStore::open(dir) {
            Ok(store) => {
                tracing::info!(dir = %dir.display(), "Saving chats to disk");
                PersistenceStore::new(Arc::new(store))
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "Cannot use data dir, keeping chats in memory: {}", e);
                PersistenceStore::new(Arc::new(MemoryStore::new()))
            }
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
