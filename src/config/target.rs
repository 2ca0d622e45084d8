use crate::config::types::{SeedConfig, SeedEntry};
use crate::config::validation::{
    validate_allowed_domains, validate_label, validate_rate_limit, validate_start_url,
    validate_user_agent,
};
use crate::crawler::ExtractionRules;
use crate::url::PatternSet;
use crate::ConfigError;

/// User agent sent when neither the seed nor the defaults name one
pub const DEFAULT_USER_AGENT: &str = concat!("seed-harvest/", env!("CARGO_PKG_VERSION"));

/// Pause after each fetched page when neither the seed nor the defaults set one
pub const DEFAULT_RATE_LIMIT_SECONDS: f64 = 1.0;

/// One seed's crawl rules, fully resolved and compiled
///
/// Pattern and selector lists are compiled once when the target is built
/// and never change during a crawl.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    pub label: String,
    pub category: Option<String>,
    pub start_url: String,
    pub allowed_domains: Vec<String>,
    pub follow_patterns: PatternSet,
    pub exclude_patterns: PatternSet,
    pub max_depth: u32,
    pub user_agent: String,
    pub rate_limit_seconds: f64,
    /// Advisory; the fetch path never renders JavaScript
    pub use_headless: bool,
    pub priority: Option<i64>,
    pub extraction: ExtractionRules,
}

impl CrawlTarget {
    /// Creates a target with built-in defaults: open domain list, no
    /// follow patterns, depth 0 and no rate limit
    pub fn new(label: impl Into<String>, start_url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            category: None,
            start_url: start_url.into(),
            allowed_domains: Vec::new(),
            follow_patterns: PatternSet::default(),
            exclude_patterns: PatternSet::default(),
            max_depth: 0,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            rate_limit_seconds: 0.0,
            use_headless: false,
            priority: None,
            extraction: ExtractionRules::default(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_allowed_domains<S: AsRef<str>>(mut self, domains: &[S]) -> Self {
        self.allowed_domains = domains.iter().map(|d| d.as_ref().to_string()).collect();
        self
    }

    pub fn with_follow_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.follow_patterns = PatternSet::compile(patterns);
        self
    }

    pub fn with_exclude_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.exclude_patterns = PatternSet::compile(patterns);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_rate_limit(mut self, seconds: f64) -> Self {
        self.rate_limit_seconds = seconds;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_extraction(mut self, extraction: ExtractionRules) -> Self {
        self.extraction = extraction;
        self
    }

    /// Priority used for ordering; unset counts as 0
    pub fn effective_priority(&self) -> i64 {
        self.priority.unwrap_or(0)
    }
}

/// Seed value if present, otherwise the defaults value
fn pick<T: Clone>(seed: &Option<T>, defaults: &Option<T>) -> Option<T> {
    seed.clone().or_else(|| defaults.clone())
}

/// Builds validated crawl targets from a seed configuration, in seed order
///
/// Each seed field overrides the matching `defaults` field by presence.
/// Patterns and selectors that fail to compile are dropped and logged at
/// `warn` level; every other problem is a validation error.
pub fn build_targets(config: &SeedConfig) -> Result<Vec<CrawlTarget>, ConfigError> {
    let defaults = config.defaults();
    config
        .seeds()
        .iter()
        .enumerate()
        .map(|(index, seed)| build_target(index, seed, &defaults))
        .collect()
}

fn build_target(
    index: usize,
    seed: &SeedEntry,
    defaults: &SeedEntry,
) -> Result<CrawlTarget, ConfigError> {
    let label = seed.label.clone().ok_or_else(|| {
        ConfigError::Validation(format!("seed #{} is missing 'label'", index))
    })?;
    validate_label(&label)?;

    let start_url = seed
        .url
        .clone()
        .ok_or_else(|| ConfigError::Validation(format!("seed '{}' is missing 'url'", label)))?;
    validate_start_url(&label, &start_url)?;

    let allowed_domains =
        pick(&seed.allowed_domains, &defaults.allowed_domains).unwrap_or_default();
    validate_allowed_domains(&label, &allowed_domains)?;

    let user_agent = pick(&seed.user_agent, &defaults.user_agent)
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
    validate_user_agent(&label, &user_agent)?;

    let rate_limit_seconds = pick(&seed.rate_limit_seconds, &defaults.rate_limit_seconds)
        .unwrap_or(DEFAULT_RATE_LIMIT_SECONDS);
    validate_rate_limit(&label, rate_limit_seconds)?;

    let follow_patterns = compile_patterns(
        &label,
        "follow",
        &pick(&seed.follow_patterns, &defaults.follow_patterns).unwrap_or_default(),
    );
    let exclude_patterns = compile_patterns(
        &label,
        "exclude",
        &pick(&seed.exclude_patterns, &defaults.exclude_patterns).unwrap_or_default(),
    );

    let (extraction, rejected) = ExtractionRules::compile_reporting(
        &pick(&seed.content_selectors, &defaults.content_selectors).unwrap_or_default(),
        &pick(&seed.title_selectors, &defaults.title_selectors).unwrap_or_default(),
        &pick(&seed.strip_selectors, &defaults.strip_selectors).unwrap_or_default(),
        &pick(&seed.date_selectors, &defaults.date_selectors).unwrap_or_default(),
    );
    for rejection in rejected {
        tracing::warn!(
            "Seed '{}': dropping invalid selector '{}': {}",
            label,
            rejection.selector,
            rejection.reason
        );
    }

    Ok(CrawlTarget {
        category: pick(&seed.category, &defaults.category),
        start_url,
        allowed_domains,
        follow_patterns,
        exclude_patterns,
        max_depth: pick(&seed.max_depth, &defaults.max_depth).unwrap_or(0),
        user_agent,
        rate_limit_seconds,
        use_headless: pick(&seed.use_headless, &defaults.use_headless).unwrap_or(false),
        priority: pick(&seed.priority, &defaults.priority),
        extraction,
        label,
    })
}

fn compile_patterns(label: &str, kind: &str, patterns: &[String]) -> PatternSet {
    let (set, rejected) = PatternSet::compile_reporting(patterns);
    for rejection in rejected {
        tracing::warn!(
            "Seed '{}': dropping invalid {} pattern '{}': {}",
            label,
            kind,
            rejection.pattern,
            rejection.reason
        );
    }
    set
}
