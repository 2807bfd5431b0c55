//! Sitemap-Weaver: a depth-bounded single-site crawler
//!
//! This crate crawls one website from a seed address, fetching each depth level
//! in parallel, and assembles the discovered pages into a loop-free sitemap tree.
//! Links are kept only when they share the seed's registrable domain, so
//! subdomains are part of the site while other sites are not.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Weaver operations
#[derive(Debug, Error)]
pub enum WeaverError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Structural errors raised while inserting edges into a sitemap
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("No root node has been set")]
    NoRoot,

    #[error("Source page {0} is not in the sitemap")]
    UnknownSource(String),

    #[error("Could not resolve link {address}: {source}")]
    InvalidAddress {
        address: String,
        source: ::url::ParseError,
    },
}

/// Reasons a host has no registrable domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("URL has no host")]
    MissingHost,

    #[error("Host '{0}' has no registrable domain")]
    Unregistrable(String),
}

/// Result type alias for Sitemap-Weaver operations
pub type Result<T> = std::result::Result<T, WeaverError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{build_sitemap, crawl, Coordinator, FetchEngine, LinkFetcher, PageLinks};
pub use sitemap::{EdgeOutcome, Node, NodeId, Sitemap};
pub use crate::url::{clean, filter_to_site, is_part_of_site, registrable_domain};
