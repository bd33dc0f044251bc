//! Configuration module for the catalog harvester
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables. Everything is resolved and validated once at startup.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvester::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("Listening on port {}", config.server.port);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, DatabaseConfig, ExtractorConfig, ServerConfig, StoreLocation,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{apply_env_overrides, load_config, parse_config};
pub use validation::validate;
