//! Configuration module for Sitemap-Weaver
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Only the `[crawler]` section is required; `[user-agent]` and `[output]`
//! fall back to defaults.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_weaver::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("weaver.toml")).unwrap();
//! println!("Crawling {} to depth {}", config.crawler.seed, config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_FETCH_TIMEOUT_MS};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
