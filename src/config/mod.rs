//! Configuration module for Seed-Harvest
//!
//! This module loads a seed configuration file (JSON or TOML), merges each
//! seed over the shared defaults, validates the result, and compiles URL
//! patterns and extraction selectors into immutable [`CrawlTarget`]s.
//!
//! # Example
//!
//! ```no_run
//! use seed_harvest::config::load_targets;
//! use std::path::Path;
//!
//! let targets = load_targets(Path::new("seed_config.json")).unwrap();
//! for target in &targets {
//!     println!("{} -> {} (depth {})", target.label, target.start_url, target.max_depth);
//! }
//! ```

mod parser;
mod target;
mod types;
mod validation;

pub use types::{SeedConfig, SeedEntry};

pub use target::{build_targets, CrawlTarget, DEFAULT_RATE_LIMIT_SECONDS, DEFAULT_USER_AGENT};

pub use parser::{
    compute_config_hash, load_seed_config, load_targets, load_targets_with_hash,
    parse_seed_config, ConfigFormat,
};
