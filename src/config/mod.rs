//! Configuration module for Sitemapper
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file.
//!
//! # Example
//!
//! ```no_run
//! use sitemapper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitemapper.toml")).unwrap();
//! println!("Retries per page: {}", config.crawler.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
