//! Per-target crawl scheduler
//!
//! This module handles:
//! - The FIFO frontier of (URL, depth) entries for one target
//! - The visited set that guarantees one fetch per URL per run
//! - The per-URL state machine from `Pending` to a terminal state
//! - Depth bounding and link expansion
//! - Per-target rate limiting between fetches
//!
//! A scheduler owns all of its mutable state. Nothing here is shared with
//! other targets, so targets can be crawled on separate tasks without locks.

use crate::config::CrawlTarget;
use crate::crawler::extractor::{ExtractedContent, ExtractionRules};
use crate::crawler::fetcher::{FetchClient, RetryPolicy};
use crate::crawler::parser::extract_links;
use crate::output::HarvestedDocument;
use crate::state::{PageState, SkipReason, TargetStats};
use crate::url::{admit, canonicalize_url, is_allowed, Admission};
use chrono::Utc;
use scraper::Html;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use url::Url;

/// Pages with fewer body words than this are skipped as thin content
pub const MIN_BODY_WORDS: usize = 50;

/// A URL waiting in a target's frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Canonical URL to fetch
    pub url: Url,

    /// Link distance from the target's start URL
    pub depth: u32,
}

/// Strict FIFO queue of frontier entries
///
/// A URL is held at most once while it waits; the first push wins, which
/// under breadth-first order is also the shallowest depth.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    pending: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the back of the queue
    ///
    /// Returns false, leaving the queue unchanged, if the URL is already waiting.
    pub fn push(&mut self, url: Url, depth: u32) -> bool {
        if !self.pending.insert(url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Takes the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        let entry = self.queue.pop_front()?;
        self.pending.remove(entry.url.as_str());
        Some(entry)
    }

    /// Returns true if the URL is waiting in the queue
    pub fn contains(&self, url: &Url) -> bool {
        self.pending.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Canonical URLs already taken from the frontier
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL visited, returning false if it already was
    pub fn insert(&mut self, url: &Url) -> bool {
        self.urls.insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Everything one target's crawl produced
#[derive(Debug, Clone)]
pub struct TargetReport {
    /// Label of the crawled target
    pub label: String,

    /// Configured priority, used for corpus ordering
    pub priority: Option<i64>,

    /// Harvested documents in harvest order
    pub documents: Vec<HarvestedDocument>,

    /// Per-state counters for this target
    pub stats: TargetStats,
}

impl TargetReport {
    /// An empty report for a target that could not be crawled at all
    pub fn empty(target: &CrawlTarget) -> Self {
        Self {
            label: target.label.clone(),
            priority: target.priority,
            documents: Vec::new(),
            stats: TargetStats::new(),
        }
    }
}

/// Owned result of parsing one fetched page
///
/// `Html` is not `Send`, so parsing finishes before the scheduler awaits
/// anything else.
#[derive(Debug)]
struct PageAnalysis {
    content: ExtractedContent,
    links: Vec<Url>,
}

/// Parses a page, collecting links before strip selectors remove anything
fn analyze_page(
    body: &str,
    base_url: &Url,
    rules: &ExtractionRules,
    collect_links: bool,
) -> PageAnalysis {
    let mut document = Html::parse_document(body);
    let links = if collect_links {
        extract_links(&document, base_url)
    } else {
        Vec::new()
    };
    let content = rules.extract_document(&mut document);

    PageAnalysis { content, links }
}

/// Pause after a successful fetch, or `None` when there is nothing to wait
///
/// Negative, NaN and out-of-range values yield `None`.
fn rate_limit_delay(seconds: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(seconds)
        .ok()
        .filter(|delay| !delay.is_zero())
}

/// Breadth-first crawler for a single target
pub struct CrawlScheduler<'t> {
    target: &'t CrawlTarget,
    client: FetchClient,
    frontier: Frontier,
    visited: VisitedSet,
    stats: TargetStats,
    documents: Vec<HarvestedDocument>,
}

impl<'t> CrawlScheduler<'t> {
    /// Creates a scheduler with the target's start URL at depth 0
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlScheduler)` - Ready to run
    /// * `Err(HarvestError)` - The start URL is not crawlable or the HTTP
    ///   client could not be built
    pub fn new(target: &'t CrawlTarget, retry_policy: RetryPolicy) -> crate::Result<Self> {
        let start = canonicalize_url(&target.start_url)?;
        let client = FetchClient::new(&target.user_agent)?.with_retry_policy(retry_policy);

        if target.rate_limit_seconds != 0.0 && rate_limit_delay(target.rate_limit_seconds).is_none()
        {
            warn!(
                "Ignoring unusable rate limit {} for '{}'",
                target.rate_limit_seconds, target.label
            );
        }

        let mut frontier = Frontier::new();
        frontier.push(start, 0);

        Ok(Self {
            target,
            client,
            frontier,
            visited: VisitedSet::new(),
            stats: TargetStats::new(),
            documents: Vec::new(),
        })
    }

    /// Crawls until the frontier is exhausted
    pub async fn run(mut self) -> TargetReport {
        info!(
            "Crawling '{}' from {} (max depth {})",
            self.target.label, self.target.start_url, self.target.max_depth
        );

        while let Some(entry) = self.frontier.pop() {
            let state = self.process_entry(entry).await;
            self.stats.record(state);
        }

        info!(
            "Finished '{}': {} harvested, {} skipped, {} failed",
            self.target.label,
            self.stats.harvested,
            self.stats.skipped(),
            self.stats.failed
        );

        TargetReport {
            label: self.target.label.clone(),
            priority: self.target.priority,
            documents: self.documents,
            stats: self.stats,
        }
    }

    /// Moves one frontier entry to its terminal state
    async fn process_entry(&mut self, entry: FrontierEntry) -> PageState {
        let target = self.target;
        let url = entry.url.as_str();

        if !self.visited.insert(&entry.url) {
            trace!("{} already visited", url);
            return PageState::Skipped(SkipReason::AlreadyVisited);
        }

        match admit(url, &target.allowed_domains, &target.exclude_patterns) {
            Admission::Admitted => {}
            Admission::DomainNotAllowed => {
                debug!("{} outside allowed domains", url);
                return PageState::Skipped(SkipReason::NotAdmitted);
            }
            Admission::Excluded => {
                debug!("{} excluded by pattern", url);
                return PageState::Skipped(SkipReason::Excluded);
            }
        }

        debug!("{} {} (depth {})", PageState::Fetching, url, entry.depth);
        let page = match self.client.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("[{}] {}", target.label, e);
                return PageState::Failed;
            }
        };

        let expand = entry.depth < target.max_depth;
        let analysis = analyze_page(&page.body, &entry.url, &target.extraction, expand);
        let words = analysis.content.word_count();

        let state = if words < MIN_BODY_WORDS {
            debug!("{} skipped: thin content, {} words", url, words);
            PageState::Skipped(SkipReason::ThinContent { words })
        } else {
            debug!("{} harvested ({} words)", url, words);
            self.documents.push(HarvestedDocument::new(
                target,
                &entry.url,
                analysis.content,
                Utc::now(),
            ));
            PageState::Harvested
        };

        if state.is_harvested() && expand {
            self.enqueue_links(analysis.links, entry.depth + 1);
        }

        self.pause().await;
        state
    }

    /// Appends followable links to the back of the frontier
    fn enqueue_links(&mut self, links: Vec<Url>, depth: u32) {
        let target = self.target;

        for link in links {
            let candidate = link.as_str();

            if self.visited.contains(&link) {
                trace!("Not enqueuing {}: already visited", candidate);
                continue;
            }
            if !target.follow_patterns.matches_any(candidate) {
                trace!("Not enqueuing {}: no follow pattern matches", candidate);
                continue;
            }
            if target.exclude_patterns.matches_any(candidate) {
                trace!("Not enqueuing {}: excluded", candidate);
                continue;
            }
            if !is_allowed(candidate, &target.allowed_domains) {
                trace!("Not enqueuing {}: domain not allowed", candidate);
                continue;
            }
            if self.frontier.contains(&link) {
                trace!("Not enqueuing {}: already queued", candidate);
                continue;
            }

            trace!("{} {} (depth {})", PageState::Pending, candidate, depth);
            self.frontier.push(link, depth);
            self.stats.links_enqueued += 1;
        }
    }

    /// Waits out the target's rate limit after a successful fetch
    async fn pause(&self) {
        if let Some(delay) = rate_limit_delay(self.target.rate_limit_seconds) {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Crawls one target to completion
///
/// A target whose scheduler cannot be created contributes nothing; the
/// problem is logged and the run continues with the next target.
pub async fn crawl_target(target: &CrawlTarget, retry_policy: RetryPolicy) -> TargetReport {
    match CrawlScheduler::new(target, retry_policy) {
        Ok(scheduler) => scheduler.run().await,
        Err(e) => {
            warn!("Skipping target '{}': {}", target.label, e);
            TargetReport::empty(target)
        }
    }
}
