use serde::Deserialize;

/// Seed configuration file: shared defaults plus one entry per seed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// Values applied to every seed that does not set the field itself
    #[serde(default)]
    pub defaults: Option<SeedEntry>,

    /// One entry per crawl target, in seed order
    #[serde(default)]
    pub seeds: Option<Vec<SeedEntry>>,
}

impl SeedConfig {
    /// The defaults record, or an empty one
    pub fn defaults(&self) -> SeedEntry {
        self.defaults.clone().unwrap_or_default()
    }

    /// The seed entries, or an empty slice
    pub fn seeds(&self) -> &[SeedEntry] {
        self.seeds.as_deref().unwrap_or(&[])
    }
}

/// A partial crawl target record
///
/// Every field is optional so the same shape serves both `defaults` and
/// individual seeds. A field counts as set when it is present and not null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedEntry {
    /// Human-readable identity of the seed
    pub label: Option<String>,

    /// Optional grouping recorded in document metadata
    pub category: Option<String>,

    /// Start URL of the crawl
    pub url: Option<String>,

    /// Host suffixes the crawl may visit (empty means any host)
    pub allowed_domains: Option<Vec<String>>,

    /// Regexes a discovered link must match to be followed
    pub follow_patterns: Option<Vec<String>>,

    /// Regexes that exclude a URL from fetching and following
    pub exclude_patterns: Option<Vec<String>>,

    /// Maximum link depth from the start URL
    pub max_depth: Option<u32>,

    /// User-Agent header sent with every request
    pub user_agent: Option<String>,

    /// Pause after each fetched page, in seconds
    pub rate_limit_seconds: Option<f64>,

    /// Advisory only; pages are always fetched without a browser
    pub use_headless: Option<bool>,

    /// Higher priorities are crawled first
    pub priority: Option<i64>,

    /// CSS selectors for the main content, first match wins
    pub content_selectors: Option<Vec<String>>,

    /// CSS selectors for the title, first match wins
    pub title_selectors: Option<Vec<String>>,

    /// CSS selectors for boilerplate removed before extraction
    pub strip_selectors: Option<Vec<String>>,

    /// CSS selectors for the publication date, first match wins
    pub date_selectors: Option<Vec<String>>,
}
