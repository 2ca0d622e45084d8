//! Crawler coordinator - orchestrates the crawl across all targets
//!
//! This module decides the order in which targets are crawled, runs each
//! target's scheduler (one after another, or one task per target), and hands
//! the reports to the corpus assembler.

use crate::config::CrawlTarget;
use crate::crawler::fetcher::RetryPolicy;
use crate::crawler::scheduler::{crawl_target, TargetReport};
use crate::output::{assemble_corpus, Corpus, HarvestStats};
use crate::HarvestError;
use std::cmp::Reverse;

/// Knobs for a whole harvest run
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Crawl every target on its own task instead of one after another
    pub parallel: bool,

    /// Retry policy given to every target's fetch client
    pub retry_policy: RetryPolicy,
}

impl CrawlOptions {
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }
}

/// Result of a successful rebuild
#[derive(Debug)]
pub struct Harvest {
    /// Ordered documents ready for the indexing collaborator
    pub corpus: Corpus,

    /// Per-target and total counters
    pub stats: HarvestStats,
}

/// Sorts targets by descending priority, keeping seed order for ties
///
/// Targets without a priority sort as priority 0.
pub fn order_targets(mut targets: Vec<CrawlTarget>) -> Vec<CrawlTarget> {
    targets.sort_by_key(|target| Reverse(target.effective_priority()));
    targets
}

/// Main crawler coordinator structure
pub struct Coordinator {
    targets: Vec<CrawlTarget>,
    options: CrawlOptions,
}

impl Coordinator {
    /// Creates a coordinator over targets in seed order
    pub fn new(targets: Vec<CrawlTarget>, options: CrawlOptions) -> Self {
        Self {
            targets: order_targets(targets),
            options,
        }
    }

    /// Targets in the order they will be crawled
    pub fn targets(&self) -> &[CrawlTarget] {
        &self.targets
    }

    /// Crawls every target, returning reports in priority order
    ///
    /// Fetch failures never surface here; the only error is a crawl task
    /// that panicked or was cancelled in parallel mode.
    pub async fn run(self) -> Result<Vec<TargetReport>, HarvestError> {
        tracing::info!(
            "Harvesting {} target(s){}",
            self.targets.len(),
            if self.options.parallel { " in parallel" } else { "" }
        );

        if self.options.parallel {
            self.run_parallel().await
        } else {
            Ok(self.run_sequential().await)
        }
    }

    async fn run_sequential(self) -> Vec<TargetReport> {
        let mut reports = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            reports.push(crawl_target(target, self.options.retry_policy.clone()).await);
        }
        reports
    }

    async fn run_parallel(self) -> Result<Vec<TargetReport>, HarvestError> {
        let handles: Vec<_> = self
            .targets
            .into_iter()
            .map(|target| {
                let label = target.label.clone();
                let policy = self.options.retry_policy.clone();
                let handle = tokio::spawn(async move { crawl_target(&target, policy).await });
                (label, handle)
            })
            .collect();

        // Joined in spawn order, which is already priority order
        let mut reports = Vec::with_capacity(handles.len());
        for (label, handle) in handles {
            let report = handle.await.map_err(|e| HarvestError::Task {
                label,
                message: e.to_string(),
            })?;
            reports.push(report);
        }
        Ok(reports)
    }
}

/// Crawls all targets and assembles the corpus
///
/// # Returns
///
/// * `Ok(Harvest)` - At least one document was harvested
/// * `Err(HarvestError::EmptyCorpus)` - Nothing was harvested from any target
///
/// # Example
///
/// ```no_run
/// use seed_harvest::config::load_targets;
/// use seed_harvest::crawler::{rebuild_corpus, CrawlOptions};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let targets = load_targets(Path::new("seed_config.json"))?;
/// let harvest = rebuild_corpus(targets, CrawlOptions::default()).await?;
/// println!("{} documents", harvest.corpus.len());
/// # Ok(())
/// # }
/// ```
pub async fn rebuild_corpus(
    targets: Vec<CrawlTarget>,
    options: CrawlOptions,
) -> Result<Harvest, HarvestError> {
    let reports = Coordinator::new(targets, options).run().await?;
    let stats = HarvestStats::from_reports(&reports);
    let corpus = assemble_corpus(reports)?;

    tracing::info!(
        "Corpus assembled: {} documents from {} target(s)",
        corpus.len(),
        stats.targets.len()
    );

    Ok(Harvest { corpus, stats })
}
