use crate::config::target::{build_targets, CrawlTarget};
use crate::config::types::SeedConfig;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Supported seed configuration encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Picks the format from the file extension; anything but `.toml` is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Parses seed configuration text in the given format
pub fn parse_seed_config(content: &str, format: ConfigFormat) -> Result<SeedConfig, ConfigError> {
    let config = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(config)
}

/// Loads a seed configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to a JSON (`seed_config.json`) or TOML (`*.toml`) file
///
/// # Returns
///
/// * `Ok(SeedConfig)` - Successfully parsed configuration
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_seed_config(path: &Path) -> Result<SeedConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_seed_config(&content, ConfigFormat::from_path(path))
}

/// Loads a seed configuration file and builds validated crawl targets
///
/// Targets are returned in seed order; priority ordering happens when the
/// corpus is assembled.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use seed_harvest::config::load_targets;
///
/// let targets = load_targets(Path::new("seed_config.json")).unwrap();
/// println!("{} targets", targets.len());
/// ```
pub fn load_targets(path: &Path) -> Result<Vec<CrawlTarget>, ConfigError> {
    let config = load_seed_config(path)?;
    build_targets(&config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is recorded in the corpus manifest so an index can be traced
/// back to the seed file that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}

/// Loads targets and returns them with the configuration file's hash
pub fn load_targets_with_hash(path: &Path) -> Result<(Vec<CrawlTarget>, String), ConfigError> {
    let targets = load_targets(path)?;
    let hash = compute_config_hash(path)?;
    Ok((targets, hash))
}
