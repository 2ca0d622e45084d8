//! Crawler module for harvesting seed sites
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry and backoff
//! - Link extraction and selector-driven content extraction
//! - Per-target breadth-first scheduling and rate limiting
//! - Overall harvest coordination across targets

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{order_targets, rebuild_corpus, CrawlOptions, Coordinator, Harvest};
pub use extractor::{
    extract_text, visible_text, BodyStrategy, DateStrategy, ExtractedContent, ExtractionRules,
    RejectedSelector, Strategy, StrategyChain, TitleStrategy, UNTITLED,
};
pub use fetcher::{
    FetchClient, FetchError, FetchedPage, RetryPolicy, CONNECT_TIMEOUT, REQUEST_TIMEOUT,
    RETRY_STATUSES,
};
pub use parser::{extract_links, extract_links_simple};
pub use scheduler::{
    crawl_target, CrawlScheduler, Frontier, FrontierEntry, TargetReport, VisitedSet,
    MIN_BODY_WORDS,
};
